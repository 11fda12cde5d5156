mod question;
mod session;

pub use question::{AnswerOption, IntentOutcome, Question, QuestionError};
pub use session::{
    NavigationPolicy, QuizPhase, QuizProgress, QuizSession, SessionError,
};
