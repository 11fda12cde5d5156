#![forbid(unsafe_code)]

pub mod model;
pub mod time;

pub use model::{
    AnswerOption, IntentOutcome, NavigationPolicy, Question, QuestionError, QuizPhase,
    QuizProgress, QuizSession, SessionError,
};
pub use time::Clock;
