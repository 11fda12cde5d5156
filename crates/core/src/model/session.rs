use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::question::{IntentOutcome, Question};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("question at index {index} carries position {position}, expected {expected}")]
    PositionMismatch {
        index: usize,
        position: usize,
        expected: usize,
    },
}

//
// ─── NAVIGATION POLICY ─────────────────────────────────────────────────────────
//

/// How a session treats the advance intent.
///
/// `ConfirmToAdvance` is the contract: the current question must be confirmed
/// before moving on, so no question is skipped or repeated. `FreeAdvance` is
/// the lenient variant some upstream revisions shipped (answer everything,
/// submit once); it is an explicit configuration choice, never a silent mix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationPolicy {
    #[default]
    ConfirmToAdvance,
    FreeAdvance,
}

//
// ─── PHASE & PROGRESS ──────────────────────────────────────────────────────────
//

/// Session-level state, derived from the question list and cursor.
///
/// `NoQuestions` is terminal and distinct from `Finished`: the source yielded
/// nothing usable, and every question-directed intent is ignored. Loading is
/// not a phase here: a session only exists once its batch has arrived, and
/// the service layer owns the gap in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    NoQuestions,
    InProgress,
    Finished,
}

/// Aggregated counters for presentation use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub score: u32,
    pub is_complete: bool,
}

//
// ─── QUIZ SESSION ──────────────────────────────────────────────────────────────
//

/// One playthrough of a question batch.
///
/// Owns the ordered questions, the cursor, and the running score, and applies
/// user intents under single-writer discipline. Restart is not an operation
/// on this type: the loader replaces the whole session with a freshly fetched
/// one, so nothing from the previous batch stays referenced.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    score: u32,
    navigation: NavigationPolicy,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Create a session over an ordered, normalized batch.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic. An empty batch is allowed and yields the terminal
    /// `NoQuestions` phase.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::PositionMismatch` if the questions do not carry
    /// contiguous 1-based positions in batch order.
    pub fn new(
        questions: Vec<Question>,
        navigation: NavigationPolicy,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        for (index, question) in questions.iter().enumerate() {
            let expected = index + 1;
            if question.position() != expected {
                return Err(SessionError::PositionMismatch {
                    index,
                    position: question.position(),
                    expected,
                });
            }
        }

        Ok(Self {
            questions,
            current: 0,
            score: 0,
            navigation,
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        if self.questions.is_empty() {
            QuizPhase::NoQuestions
        } else if self.current >= self.questions.len() {
            QuizPhase::Finished
        } else {
            QuizPhase::InProgress
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Total number of questions in the batch.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Zero-based cursor; equals `total_questions()` once finished.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn navigation(&self) -> NavigationPolicy {
        self.navigation
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase() == QuizPhase::Finished
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.questions.len();
        let answered = self.questions.iter().filter(|q| q.is_confirmed()).count();
        QuizProgress {
            total,
            answered,
            remaining: total - answered,
            score: self.score,
            is_complete: self.is_finished(),
        }
    }

    /// Select an option on the current question by index.
    ///
    /// Ignored when no question is current (finished or empty session) or
    /// when the current question is already confirmed.
    pub fn select_option(&mut self, index: usize) -> IntentOutcome {
        match self.questions.get_mut(self.current) {
            Some(question) => question.select_option(index),
            None => IntentOutcome::Ignored,
        }
    }

    /// Select an option on the current question by display text.
    pub fn select_answer(&mut self, text: &str) -> IntentOutcome {
        match self.questions.get_mut(self.current) {
            Some(question) => question.select_answer(text),
            None => IntentOutcome::Ignored,
        }
    }

    /// Lock in the current question's selection and score it.
    ///
    /// The score increments by exactly 1 when the confirmed selection is the
    /// correct option; the question's own confirm guard makes a second
    /// confirmation a no-op, so the score can never double-count.
    pub fn confirm_answer(&mut self) -> IntentOutcome {
        let Some(question) = self.questions.get_mut(self.current) else {
            return IntentOutcome::Ignored;
        };
        match question.confirm() {
            Some(correct) => {
                if correct {
                    self.score += 1;
                }
                IntentOutcome::Applied
            }
            None => IntentOutcome::Ignored,
        }
    }

    /// Move the cursor to the next question.
    ///
    /// Under `ConfirmToAdvance` the current question must be confirmed first.
    /// Reaching the end records `completed_at` from `now`, which should come
    /// from the services layer clock.
    pub fn advance(&mut self, now: DateTime<Utc>) -> IntentOutcome {
        let Some(question) = self.questions.get(self.current) else {
            return IntentOutcome::Ignored;
        };
        if self.navigation == NavigationPolicy::ConfirmToAdvance && !question.is_confirmed() {
            return IntentOutcome::Ignored;
        }

        self.current += 1;
        if self.current >= self.questions.len() {
            self.completed_at = Some(now);
        }
        IntentOutcome::Applied
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::question::AnswerOption;
    use crate::time::fixed_now;

    fn build_question(position: usize, correct: &str, wrong: &[&str]) -> Question {
        let mut options = vec![AnswerOption::new(correct, true)];
        options.extend(wrong.iter().map(|w| AnswerOption::new(*w, false)));
        Question::new(format!("Question {position}"), options, position).unwrap()
    }

    fn two_question_session(navigation: NavigationPolicy) -> QuizSession {
        let questions = vec![
            build_question(1, "Paris", &["Lyon", "Nice"]),
            build_question(2, "Oslo", &["Bergen", "Narvik"]),
        ];
        QuizSession::new(questions, navigation, fixed_now()).unwrap()
    }

    fn score_matches_confirmed_correct(session: &QuizSession) -> bool {
        let recount = session
            .questions()
            .iter()
            .filter(|q| q.is_confirmed() && q.is_selected_correct() == Some(true))
            .count() as u32;
        recount == session.score()
    }

    #[test]
    fn rejects_non_contiguous_positions() {
        let questions = vec![
            build_question(1, "Paris", &["Lyon"]),
            build_question(3, "Oslo", &["Bergen"]),
        ];
        let err =
            QuizSession::new(questions, NavigationPolicy::default(), fixed_now()).unwrap_err();
        assert_eq!(
            err,
            SessionError::PositionMismatch {
                index: 1,
                position: 3,
                expected: 2
            }
        );
    }

    #[test]
    fn empty_batch_is_terminal_no_questions() {
        let mut session =
            QuizSession::new(Vec::new(), NavigationPolicy::default(), fixed_now()).unwrap();
        assert_eq!(session.phase(), QuizPhase::NoQuestions);
        assert_eq!(session.select_option(0), IntentOutcome::Ignored);
        assert_eq!(session.select_answer("Paris"), IntentOutcome::Ignored);
        assert_eq!(session.confirm_answer(), IntentOutcome::Ignored);
        assert_eq!(session.advance(fixed_now()), IntentOutcome::Ignored);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn advance_is_blocked_until_confirmed() {
        let mut session = two_question_session(NavigationPolicy::ConfirmToAdvance);
        assert_eq!(session.advance(fixed_now()), IntentOutcome::Ignored);
        session.select_answer("Paris");
        assert_eq!(session.advance(fixed_now()), IntentOutcome::Ignored);
        session.confirm_answer();
        assert!(session.advance(fixed_now()).is_applied());
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn free_advance_policy_allows_skipping() {
        let mut session = two_question_session(NavigationPolicy::FreeAdvance);
        assert!(session.advance(fixed_now()).is_applied());
        assert!(session.advance(fixed_now()).is_applied());
        assert!(session.is_finished());
        assert_eq!(session.score(), 0);
        assert!(score_matches_confirmed_correct(&session));
    }

    #[test]
    fn confirm_without_selection_is_ignored() {
        let mut session = two_question_session(NavigationPolicy::default());
        assert_eq!(session.confirm_answer(), IntentOutcome::Ignored);
        assert!(!session.current_question().unwrap().is_confirmed());
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn confirm_is_idempotent_on_score() {
        let mut session = two_question_session(NavigationPolicy::default());
        session.select_answer("Paris");
        assert!(session.confirm_answer().is_applied());
        assert_eq!(session.score(), 1);
        assert_eq!(session.confirm_answer(), IntentOutcome::Ignored);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn selection_after_confirm_never_changes_the_answer() {
        let mut session = two_question_session(NavigationPolicy::default());
        session.select_answer("Lyon");
        session.confirm_answer();
        assert_eq!(session.select_answer("Paris"), IntentOutcome::Ignored);
        assert_eq!(
            session.current_question().unwrap().selected_answer_text(),
            Some("Lyon")
        );
    }

    #[test]
    fn full_playthrough_scores_one_of_two() {
        let mut session = two_question_session(NavigationPolicy::default());

        session.select_answer("Paris");
        assert!(session.confirm_answer().is_applied());
        assert_eq!(session.score(), 1);
        assert!(session.current_question().unwrap().is_confirmed());
        assert!(session.advance(fixed_now()).is_applied());
        assert_eq!(session.current_index(), 1);
        assert!(score_matches_confirmed_correct(&session));

        session.select_answer("Bergen");
        assert!(session.confirm_answer().is_applied());
        assert_eq!(session.score(), 1);
        assert!(session.advance(fixed_now()).is_applied());

        assert_eq!(session.current_index(), 2);
        assert!(session.is_finished());
        assert_eq!(session.phase(), QuizPhase::Finished);
        assert_eq!(session.completed_at(), Some(fixed_now()));
        assert_eq!(session.score(), 1);
        assert_eq!(session.total_questions(), 2);
        assert!(score_matches_confirmed_correct(&session));

        // Finished sessions ignore everything.
        assert_eq!(session.advance(fixed_now()), IntentOutcome::Ignored);
        assert_eq!(session.select_option(0), IntentOutcome::Ignored);
        assert_eq!(session.confirm_answer(), IntentOutcome::Ignored);
    }

    #[test]
    fn progress_reflects_confirmations() {
        let mut session = two_question_session(NavigationPolicy::default());
        assert_eq!(
            session.progress(),
            QuizProgress {
                total: 2,
                answered: 0,
                remaining: 2,
                score: 0,
                is_complete: false,
            }
        );

        session.select_answer("Paris");
        session.confirm_answer();
        session.advance(fixed_now());
        let progress = session.progress();
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 1);
        assert_eq!(progress.score, 1);
        assert!(!progress.is_complete);
    }
}
