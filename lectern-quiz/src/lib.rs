//! # lectern-quiz
//!
//! Study features over lectern's retrieval core: quiz generation with a
//! guaranteed-valid schema, grounded question answering, and pure quiz
//! grading.
//!
//! The centerpiece is the structured generation adapter
//! ([`StructuredGenerator`]): it asks the model for strict JSON, falls
//! back once to an explicit textual instruction, recovers JSON from
//! fenced or loosely quoted replies, and repairs schema-invalid quiz
//! questions element-wise — every emitted [`QuizQuestion`] has at least
//! two answers and exactly one marked correct.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lectern_quiz::{QuizService, grade_quiz};
//!
//! let service = QuizService::new(retriever, model);
//! let quiz = service.generate_quiz(document_id, 5).await?;
//! let report = grade_quiz(&quiz.questions, &answers);
//! ```

pub mod error;
pub mod extract;
pub mod generate;
pub mod grade;
pub mod schema;
pub mod service;

pub use error::{QuizError, Result};
pub use extract::{ParseOutcome, extract_json};
pub use generate::{StructuredGenerator, StructuredReply};
pub use grade::{GradeResult, QuestionFeedback, QuizReport, grade_quiz};
pub use schema::{Quiz, QuizAnswer, QuizQuestion, repair_questions};
pub use service::{GroundedAnswer, QuizService};
