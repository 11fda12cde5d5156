use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};

use trivia_core::{Clock, NavigationPolicy, Question, QuizSession};

use crate::error::{QuizLoadError, SourceError};
use crate::normalize::normalize_question;
use crate::source::{QuestionSource, SourceConfig};

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Tunables for one quiz lifecycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuizConfig {
    pub source: SourceConfig,
    pub navigation: NavigationPolicy,
}

//
// ─── LOAD BOOKKEEPING ──────────────────────────────────────────────────────────
//

/// Token identifying one load attempt.
///
/// Only the most recently issued token may install its batch: a restart
/// requested while an earlier load is still in flight issues a newer token,
/// and the stale batch is dropped instead of merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadGeneration(u64);

/// What happened to a fetched batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Installed,
    Superseded,
}

//
// ─── QUIZ LOADER ───────────────────────────────────────────────────────────────
//

/// Fetches, normalizes and installs question batches for a session slot.
///
/// The slot (`Option<QuizSession>`) belongs to the presentation driver: an
/// empty slot renders as loading. The loader never mutates an installed
/// session's questions; a load replaces the whole session object, so a
/// restart leaves nothing of the previous batch referenced.
pub struct QuizLoader {
    clock: Clock,
    source: Arc<dyn QuestionSource>,
    config: QuizConfig,
    generation: u64,
}

impl QuizLoader {
    #[must_use]
    pub fn new(clock: Clock, source: Arc<dyn QuestionSource>, config: QuizConfig) -> Self {
        Self {
            clock,
            source,
            config,
            generation: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    /// Current time according to the loader's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Start a new load attempt, superseding any still in flight.
    pub fn begin_load(&mut self) -> LoadGeneration {
        self.generation += 1;
        LoadGeneration(self.generation)
    }

    #[must_use]
    pub fn is_current(&self, generation: LoadGeneration) -> bool {
        generation.0 == self.generation
    }

    /// Fetch one batch and normalize it.
    ///
    /// Malformed records are skipped with a warning rather than aborting the
    /// batch; surviving questions are positioned `1..=n` in source order.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` when the source cannot deliver a batch at all.
    pub async fn fetch_questions(&self) -> Result<Vec<Question>, SourceError> {
        let records = self
            .source
            .fetch_batch(self.config.source.question_count)
            .await?;
        let fetched = records.len();

        let mut questions = Vec::with_capacity(records.len());
        for record in records {
            let position = questions.len() + 1;
            match normalize_question(record, position) {
                Ok(question) => questions.push(question),
                Err(err) => warn!("skipping malformed question record: {err}"),
            }
        }
        info!("normalized {}/{fetched} fetched questions", questions.len());
        Ok(questions)
    }

    /// Install a fetched batch into the slot, unless superseded.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoadError::Session` if the batch violates position
    /// ordering; `fetch_questions` never produces such a batch.
    pub fn apply(
        &self,
        generation: LoadGeneration,
        questions: Vec<Question>,
        slot: &mut Option<QuizSession>,
    ) -> Result<LoadOutcome, QuizLoadError> {
        if !self.is_current(generation) {
            return Ok(LoadOutcome::Superseded);
        }
        let session = QuizSession::new(questions, self.config.navigation, self.clock.now())?;
        *slot = Some(session);
        Ok(LoadOutcome::Installed)
    }

    /// One full load cycle: the initial load at startup and every restart.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoadError::Source` when the fetch fails; the slot is left
    /// untouched and the user may retry via restart.
    pub async fn start_session(
        &mut self,
        slot: &mut Option<QuizSession>,
    ) -> Result<LoadOutcome, QuizLoadError> {
        let generation = self.begin_load();
        let questions = self.fetch_questions().await?;
        self.apply(generation, questions, slot)
    }

    /// Discard the current session and load a fresh batch.
    pub async fn restart(
        &mut self,
        slot: &mut Option<QuizSession>,
    ) -> Result<LoadOutcome, QuizLoadError> {
        *slot = None;
        self.start_session(slot).await
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
