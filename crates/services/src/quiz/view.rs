use trivia_core::{NavigationPolicy, QuizPhase, QuizSession};

//
// ─── INTENTS ───────────────────────────────────────────────────────────────────
//

/// The complete set of writes a presentation layer may emit.
///
/// Selection is by option index; an option's identity is its slot in the
/// shuffled order, which keeps duplicate-text records unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizIntent {
    SelectOption(usize),
    Confirm,
    Advance,
    Restart,
}

//
// ─── VIEW MODELS ───────────────────────────────────────────────────────────────
//

/// Styling claim for one rendered option.
///
/// `Correct`/`Incorrect` only ever appear on confirmed questions; before
/// confirmation every option is `Neutral`, so display logic never learns
/// where the correct answer sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionStyle {
    Neutral,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOptionView {
    pub text: String,
    pub selected: bool,
    pub style: OptionStyle,
}

/// Snapshot of the current question for rendering.
///
/// Intentionally presentation-agnostic: no pre-formatted strings, no
/// framework types. The front end formats as it sees fit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub position: usize,
    pub total: usize,
    pub text: String,
    pub score: u32,
    pub confirmed: bool,
    pub can_confirm: bool,
    pub can_advance: bool,
    pub options: Vec<AnswerOptionView>,
}

/// Terminal summary once every question has been played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishedView {
    pub score: u32,
    pub total: usize,
}

/// Everything a front end needs to render one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizViewState {
    Loading,
    NoQuestions,
    Question(QuestionView),
    Finished(FinishedView),
}

/// Derive the view state from the session slot; an empty slot is a load in
/// flight.
#[must_use]
pub fn view_state(session: Option<&QuizSession>) -> QuizViewState {
    let Some(session) = session else {
        return QuizViewState::Loading;
    };

    match session.phase() {
        QuizPhase::NoQuestions => QuizViewState::NoQuestions,
        QuizPhase::Finished => QuizViewState::Finished(FinishedView {
            score: session.score(),
            total: session.total_questions(),
        }),
        QuizPhase::InProgress => {
            let question = session
                .current_question()
                .expect("in-progress session has a current question");
            let confirmed = question.is_confirmed();

            let options = question
                .answer_options()
                .iter()
                .enumerate()
                .map(|(index, option)| {
                    let selected = question.selected() == Some(index);
                    let style = if !confirmed {
                        OptionStyle::Neutral
                    } else if option.is_correct() {
                        OptionStyle::Correct
                    } else if selected {
                        OptionStyle::Incorrect
                    } else {
                        OptionStyle::Neutral
                    };
                    AnswerOptionView {
                        text: option.text().to_string(),
                        selected,
                        style,
                    }
                })
                .collect();

            QuizViewState::Question(QuestionView {
                position: question.position(),
                total: session.total_questions(),
                text: question.text().to_string(),
                score: session.score(),
                confirmed,
                can_confirm: question.selected().is_some() && !confirmed,
                can_advance: confirmed
                    || session.navigation() == NavigationPolicy::FreeAdvance,
                options,
            })
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
