//! Turns raw source records into session-ready questions.
//!
//! Source text is third-party content rendered to the user, so every text
//! field passes through `clean_text` before it reaches the model: markup is
//! stripped (script and style bodies removed wholesale) and HTML entities are
//! decoded to plain display text. Answer options are shuffled exactly once
//! here; nothing downstream may reorder them.

use std::collections::HashSet;

use rand::rng;
use rand::seq::SliceRandom;

use trivia_core::{AnswerOption, Question};

use crate::error::NormalizeError;
use crate::source::RawQuestion;

/// Strip markup and decode HTML entities into plain display text.
#[must_use]
pub fn clean_text(input: &str) -> String {
    let stripped = ammonia::Builder::new()
        .tags(HashSet::new())
        .clean(input)
        .to_string();
    html_escape::decode_html_entities(&stripped).trim().to_string()
}

/// Normalize one raw record into a `Question` at the given 1-based position.
///
/// # Errors
///
/// Returns `NormalizeError` when the record is missing a correct answer, has
/// no incorrect answers, sanitizes down to an empty question text, or fails
/// question construction.
pub fn normalize_question(
    raw: RawQuestion,
    position: usize,
) -> Result<Question, NormalizeError> {
    if raw.correct_answer.trim().is_empty() {
        return Err(NormalizeError::MissingCorrectAnswer);
    }
    if raw.incorrect_answers.is_empty() {
        return Err(NormalizeError::NoIncorrectAnswers);
    }

    let text = clean_text(&raw.question);
    if text.is_empty() {
        return Err(NormalizeError::EmptyQuestionText);
    }

    let mut options: Vec<AnswerOption> = raw
        .incorrect_answers
        .iter()
        .map(|answer| AnswerOption::new(clean_text(answer), false))
        .collect();
    options.push(AnswerOption::new(clean_text(&raw.correct_answer), true));

    let mut rng = rng();
    options.as_mut_slice().shuffle(&mut rng);

    Ok(Question::new(text, options, position)?)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(question: &str, correct: &str, incorrect: &[&str]) -> RawQuestion {
        RawQuestion {
            question: question.to_string(),
            correct_answer: correct.to_string(),
            incorrect_answers: incorrect.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn decodes_html_entities() {
        assert_eq!(
            clean_text("Who wrote &quot;Hamlet&quot; &amp; &quot;Macbeth&quot;?"),
            "Who wrote \"Hamlet\" & \"Macbeth\"?"
        );
        assert_eq!(clean_text("It&#039;s a trap"), "It's a trap");
    }

    #[test]
    fn strips_markup_but_keeps_display_text() {
        assert_eq!(clean_text("The <b>answer</b> is <i>here</i>"), "The answer is here");
    }

    #[test]
    fn removes_script_bodies_entirely() {
        let cleaned = clean_text("safe<script>alert('pwned')</script> text");
        assert_eq!(cleaned, "safe text");
    }

    #[test]
    fn normalized_question_carries_all_options_once() {
        let question = normalize_question(
            raw("Capital of France?", "Paris", &["Lyon", "Nice", "Marseille"]),
            1,
        )
        .unwrap();

        assert_eq!(question.position(), 1);
        assert_eq!(question.answer_options().len(), 4);
        assert_eq!(
            question
                .answer_options()
                .iter()
                .filter(|o| o.is_correct())
                .count(),
            1
        );
        let mut texts: Vec<_> = question
            .answer_options()
            .iter()
            .map(|o| o.text().to_string())
            .collect();
        texts.sort();
        assert_eq!(texts, vec!["Lyon", "Marseille", "Nice", "Paris"]);
        assert_eq!(question.selected(), None);
        assert!(!question.is_confirmed());
    }

    #[test]
    fn options_are_shuffled_at_construction_not_appended() {
        // The correct answer goes in last before the shuffle; if it stayed in
        // that slot on every build, the shuffle would not be happening.
        let correct_always_last = (0..32).all(|_| {
            let question = normalize_question(
                raw("Q?", "right", &["wrong-1", "wrong-2", "wrong-3", "wrong-4"]),
                1,
            )
            .unwrap();
            question.answer_options().last().unwrap().is_correct()
        });
        assert!(!correct_always_last);
    }

    #[test]
    fn option_order_is_fixed_after_normalization() {
        let question =
            normalize_question(raw("Q?", "right", &["wrong-1", "wrong-2"]), 1).unwrap();
        let first: Vec<_> = question.answer_options().to_vec();
        let second: Vec<_> = question.answer_options().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_blank_correct_answer() {
        let err = normalize_question(raw("Q?", "  ", &["wrong"]), 1).unwrap_err();
        assert_eq!(err, NormalizeError::MissingCorrectAnswer);
    }

    #[test]
    fn rejects_empty_incorrect_answers() {
        let err = normalize_question(raw("Q?", "right", &[]), 1).unwrap_err();
        assert_eq!(err, NormalizeError::NoIncorrectAnswers);
    }

    #[test]
    fn rejects_question_that_sanitizes_to_nothing() {
        let err = normalize_question(raw("<p>   </p>", "right", &["wrong"]), 1).unwrap_err();
        assert_eq!(err, NormalizeError::EmptyQuestionText);
    }

    #[test]
    fn sanitizes_answer_texts_too() {
        let question = normalize_question(
            raw("Q?", "Tom &amp; Jerry", &["<b>Bonnie</b> and Clyde"]),
            1,
        )
        .unwrap();
        let mut texts: Vec<_> = question
            .answer_options()
            .iter()
            .map(|o| o.text().to_string())
            .collect();
        texts.sort();
        assert_eq!(texts, vec!["Bonnie and Clyde", "Tom & Jerry"]);
    }
}
