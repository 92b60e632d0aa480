//! Quiz schema types and element-wise repair of model output.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One answer choice of a [`QuizQuestion`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizAnswer {
    /// The answer text shown to the user.
    pub text: String,
    /// Whether this is the correct choice.
    pub is_correct: bool,
}

/// A validated multiple-choice question.
///
/// Invariant: `answers` has at least two entries and exactly one of them
/// has `is_correct == true`. Every question emitted by this crate —
/// including repaired ones — satisfies it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizQuestion {
    /// The question text.
    pub question: String,
    /// The answer choices.
    pub answers: Vec<QuizAnswer>,
    /// Why the correct answer is right.
    pub explanation: String,
}

impl QuizQuestion {
    /// Position of the correct answer.
    pub fn correct_position(&self) -> Option<usize> {
        self.answers.iter().position(|a| a.is_correct)
    }
}

/// A generated quiz: a fresh id plus its validated questions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quiz {
    /// Server-generated quiz identifier.
    pub quiz_id: Uuid,
    /// The validated questions.
    pub questions: Vec<QuizQuestion>,
}

/// Explanations shorter than this (after trimming) count as missing.
const MIN_EXPLANATION_LEN: usize = 10;

/// Repair a raw `questions` array element-wise.
///
/// Well-formed elements are kept (surplus `is_correct` flags after the
/// first are cleared). Malformed elements — missing question text,
/// missing or short explanation, answers missing, not a list, fewer than
/// two, or none marked correct — are replaced by a deterministic
/// placeholder rather than discarded, so the output length always equals
/// the input length.
pub fn repair_questions(raw: &[Value]) -> Vec<QuizQuestion> {
    raw.iter()
        .enumerate()
        .map(|(index, value)| parse_question(value).unwrap_or_else(|| placeholder_question(index)))
        .collect()
}

/// Parse one raw element into a valid question, or `None` if malformed.
fn parse_question(value: &Value) -> Option<QuizQuestion> {
    let question = value.get("question")?.as_str()?.trim();
    if question.is_empty() {
        return None;
    }

    let explanation = value.get("explanation")?.as_str()?.trim();
    if explanation.len() < MIN_EXPLANATION_LEN {
        return None;
    }

    let raw_answers = value.get("answers")?.as_array()?;
    if raw_answers.len() < 2 {
        return None;
    }

    let mut answers = Vec::with_capacity(raw_answers.len());
    for raw_answer in raw_answers {
        let text = raw_answer.get("text")?.as_str()?.to_string();
        let is_correct = raw_answer.get("is_correct").and_then(Value::as_bool).unwrap_or(false);
        answers.push(QuizAnswer { text, is_correct });
    }

    if !answers.iter().any(|a| a.is_correct) {
        return None;
    }

    // Exactly one correct answer: the first flagged one wins.
    let mut seen_correct = false;
    for answer in &mut answers {
        if answer.is_correct {
            if seen_correct {
                answer.is_correct = false;
            }
            seen_correct = true;
        }
    }

    Some(QuizQuestion {
        question: question.to_string(),
        answers,
        explanation: explanation.to_string(),
    })
}

/// Deterministic stand-in for a malformed element: four generic options,
/// the first marked correct.
fn placeholder_question(index: usize) -> QuizQuestion {
    QuizQuestion {
        question: format!("Question {} could not be generated from the document.", index + 1),
        answers: vec![
            QuizAnswer { text: "Option A".into(), is_correct: true },
            QuizAnswer { text: "Option B".into(), is_correct: false },
            QuizAnswer { text: "Option C".into(), is_correct: false },
            QuizAnswer { text: "Option D".into(), is_correct: false },
        ],
        explanation: "The generated content for this question was incomplete and was replaced."
            .into(),
    }
}
