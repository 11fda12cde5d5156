mod loader;
mod view;

// Public API of the quiz subsystem.
pub use crate::error::QuizLoadError;
pub use loader::{LoadGeneration, LoadOutcome, QuizConfig, QuizLoader};
pub use view::{
    AnswerOptionView, FinishedView, OptionStyle, QuestionView, QuizIntent, QuizViewState,
    view_state,
};
