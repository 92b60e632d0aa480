//! Pure quiz grading.
//!
//! No I/O and no randomness: identical inputs always produce identical
//! reports.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::schema::QuizQuestion;

/// Whether one submitted answer was right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeResult {
    /// The selected answer is the one marked correct.
    Correct,
    /// Wrong selection, out-of-range index, or no answer submitted.
    Incorrect,
}

/// Per-question grading detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionFeedback {
    /// Index of the question in the submitted quiz.
    pub question_index: usize,
    /// Whether the submission was right.
    pub result: GradeResult,
    /// The submitted answer index, if any.
    pub selected_answer: Option<usize>,
    /// The index of the answer marked correct.
    pub correct_answer: usize,
}

/// The outcome of grading one quiz submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizReport {
    /// Number of correctly answered questions.
    pub score: usize,
    /// Number of questions graded.
    pub total: usize,
    /// `100 * score / total`; `0.0` when there are no questions.
    pub percentage: f64,
    /// One entry per question, in question order.
    pub feedback: Vec<QuestionFeedback>,
}

/// Grade a submission against the quiz's questions.
///
/// `answers` maps question index → selected answer index. Unanswered
/// questions and out-of-range indices count as incorrect; extra entries
/// beyond the question list are ignored.
pub fn grade_quiz(questions: &[QuizQuestion], answers: &HashMap<usize, usize>) -> QuizReport {
    let mut score = 0;
    let mut feedback = Vec::with_capacity(questions.len());

    for (question_index, question) in questions.iter().enumerate() {
        let correct_answer = question.correct_position().unwrap_or(usize::MAX);
        let selected_answer = answers.get(&question_index).copied();

        let result = match selected_answer {
            Some(selected) if selected < question.answers.len() && selected == correct_answer => {
                score += 1;
                GradeResult::Correct
            }
            _ => GradeResult::Incorrect,
        };

        feedback.push(QuestionFeedback { question_index, result, selected_answer, correct_answer });
    }

    let total = questions.len();
    let percentage = if total > 0 { 100.0 * score as f64 / total as f64 } else { 0.0 };

    QuizReport { score, total, percentage, feedback }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::QuizAnswer;

    fn question(correct: usize) -> QuizQuestion {
        QuizQuestion {
            question: "Which option?".into(),
            answers: (0..4)
                .map(|i| QuizAnswer { text: format!("Option {i}"), is_correct: i == correct })
                .collect(),
            explanation: "Because that option is the right one.".into(),
        }
    }

    #[test]
    fn single_correct_submission_scores_full() {
        let questions = vec![question(1)];
        let answers = HashMap::from([(0, 1)]);

        let report = grade_quiz(&questions, &answers);
        assert_eq!(report.score, 1);
        assert_eq!(report.total, 1);
        assert_eq!(report.percentage, 100.0);
        assert_eq!(report.feedback.len(), 1);
        assert_eq!(report.feedback[0].question_index, 0);
        assert_eq!(report.feedback[0].result, GradeResult::Correct);
        assert_eq!(report.feedback[0].selected_answer, Some(1));
        assert_eq!(report.feedback[0].correct_answer, 1);
    }

    #[test]
    fn unanswered_and_out_of_range_count_as_incorrect() {
        let questions = vec![question(0), question(2), question(3)];
        // Question 0 unanswered; question 1 answered out of range;
        // question 2 answered correctly.
        let answers = HashMap::from([(1, 9), (2, 3)]);

        let report = grade_quiz(&questions, &answers);
        assert_eq!(report.score, 1);
        assert_eq!(report.total, 3);
        assert_eq!(report.feedback[0].result, GradeResult::Incorrect);
        assert_eq!(report.feedback[0].selected_answer, None);
        assert_eq!(report.feedback[1].result, GradeResult::Incorrect);
        assert_eq!(report.feedback[2].result, GradeResult::Correct);
    }

    #[test]
    fn empty_quiz_grades_to_zero_percentage() {
        let report = grade_quiz(&[], &HashMap::new());
        assert_eq!(report.score, 0);
        assert_eq!(report.total, 0);
        assert_eq!(report.percentage, 0.0);
        assert!(report.feedback.is_empty());
    }

    #[test]
    fn grading_is_pure_and_idempotent() {
        let questions = vec![question(0), question(1)];
        let answers = HashMap::from([(0, 0), (1, 3)]);

        let first = grade_quiz(&questions, &answers);
        let second = grade_quiz(&questions, &answers);
        assert_eq!(first, second);
    }

    #[test]
    fn submissions_beyond_question_list_are_ignored() {
        let questions = vec![question(0)];
        let answers = HashMap::from([(0, 0), (7, 1)]);

        let report = grade_quiz(&questions, &answers);
        assert_eq!(report.total, 1);
        assert_eq!(report.score, 1);
    }

    #[test]
    fn percentage_is_proportional() {
        let questions = vec![question(0), question(0), question(0), question(0)];
        let answers = HashMap::from([(0, 0), (1, 0), (2, 1)]);

        let report = grade_quiz(&questions, &answers);
        assert_eq!(report.score, 2);
        assert_eq!(report.percentage, 50.0);
    }
}
