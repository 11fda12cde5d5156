use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors that can occur when constructing a question.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("a question needs at least two answer options, got {0}")]
    NotEnoughOptions(usize),

    #[error("no answer option is flagged correct")]
    NoCorrectOption,

    #[error("{0} answer options are flagged correct, expected exactly one")]
    MultipleCorrectOptions(usize),

    #[error("question position is 1-based, got 0")]
    InvalidPosition,
}

//
// ─── INTENT OUTCOME ────────────────────────────────────────────────────────────
//

/// What happened to a user intent applied against session state.
///
/// Intents arriving in a state where they are documented no-ops come back as
/// `Ignored`, never as errors. The presentation layer is expected to withhold
/// illegal intents via disabled controls; the core guards anyway because it
/// cannot trust the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentOutcome {
    Applied,
    Ignored,
}

impl IntentOutcome {
    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, IntentOutcome::Applied)
    }
}

//
// ─── ANSWER OPTION ─────────────────────────────────────────────────────────────
//

/// One displayable answer choice, tagged with whether it is the correct one.
///
/// Immutable once created. The tag never reaches display logic directly; the
/// view layer derives styling flags from it only after confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    text: String,
    is_correct: bool,
}

impl AnswerOption {
    #[must_use]
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question within a session.
///
/// The option order is fixed at construction (the normalizer shuffles exactly
/// once); an option's identity is its index in that order. `confirmed` is
/// terminal for the question: once an answer is locked in, further selection
/// intents are ignored until a session restart produces fresh questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    answer_options: Vec<AnswerOption>,
    selected: Option<usize>,
    confirmed: bool,
    position: usize,
}

impl Question {
    /// Create a question from sanitized text and an already-shuffled option
    /// list. `position` is the 1-based index within the session batch.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is blank, fewer than two options
    /// are given, the correct flag is not set on exactly one option, or
    /// `position` is zero.
    pub fn new(
        text: impl Into<String>,
        answer_options: Vec<AnswerOption>,
        position: usize,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if answer_options.len() < 2 {
            return Err(QuestionError::NotEnoughOptions(answer_options.len()));
        }
        match answer_options.iter().filter(|o| o.is_correct()).count() {
            0 => return Err(QuestionError::NoCorrectOption),
            1 => {}
            n => return Err(QuestionError::MultipleCorrectOptions(n)),
        }
        if position == 0 {
            return Err(QuestionError::InvalidPosition);
        }

        Ok(Self {
            text,
            answer_options,
            selected: None,
            confirmed: false,
            position,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn answer_options(&self) -> &[AnswerOption] {
        &self.answer_options
    }

    /// Index of the currently selected option, if any.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn selected_answer_text(&self) -> Option<&str> {
        self.selected.map(|i| self.answer_options[i].text())
    }

    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// 1-based position within the session batch.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The single option flagged correct.
    #[must_use]
    pub fn correct_option(&self) -> &AnswerOption {
        self.answer_options
            .iter()
            .find(|o| o.is_correct())
            .expect("constructor guarantees exactly one correct option")
    }

    /// Whether the current selection is the correct option.
    ///
    /// Resolved through the selected option's own flag, never by comparing
    /// text against the correct answer: upstream records occasionally carry
    /// an incorrect answer whose text duplicates the correct one, and a text
    /// comparison would make the outcome depend on shuffle order.
    #[must_use]
    pub fn is_selected_correct(&self) -> Option<bool> {
        self.selected.map(|i| self.answer_options[i].is_correct())
    }

    /// Select the option at `index`. Ignored once confirmed or when the index
    /// is out of range. Re-selection before confirmation is always allowed.
    pub fn select_option(&mut self, index: usize) -> IntentOutcome {
        if self.confirmed || index >= self.answer_options.len() {
            return IntentOutcome::Ignored;
        }
        self.selected = Some(index);
        IntentOutcome::Applied
    }

    /// Select by display text. Ignored for empty text or text matching no
    /// option. Duplicated texts resolve to the first occurrence.
    pub fn select_answer(&mut self, text: &str) -> IntentOutcome {
        if text.is_empty() {
            return IntentOutcome::Ignored;
        }
        match self.answer_options.iter().position(|o| o.text() == text) {
            Some(index) => self.select_option(index),
            None => IntentOutcome::Ignored,
        }
    }

    /// Lock in the current selection and reveal correctness.
    ///
    /// Returns `None` when the intent is a no-op (nothing selected, or
    /// already confirmed), otherwise `Some(is_correct)` exactly once.
    pub fn confirm(&mut self) -> Option<bool> {
        if self.confirmed {
            return None;
        }
        let correct = self.is_selected_correct()?;
        self.confirmed = true;
        Some(correct)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
