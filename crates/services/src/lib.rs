#![forbid(unsafe_code)]

pub mod error;
pub mod normalize;
pub mod quiz;
pub mod source;

pub use trivia_core::Clock;

pub use error::{NormalizeError, QuizLoadError, SourceError};
pub use normalize::{clean_text, normalize_question};
pub use quiz::{
    AnswerOptionView, FinishedView, LoadGeneration, LoadOutcome, OptionStyle, QuestionView,
    QuizConfig, QuizIntent, QuizLoader, QuizViewState, view_state,
};
pub use source::{OpenTriviaClient, QuestionSource, RawQuestion, SourceConfig, SourceResponse};
