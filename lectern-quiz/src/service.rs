//! Quiz generation and grounded question answering over one document.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use lectern_model::{ChatModel, ChatRequest};
use lectern_rag::{Retriever, SearchResult};

use crate::error::{QuizError, Result};
use crate::extract::{RAW_RESPONSE_PREVIEW, preview};
use crate::generate::{StructuredGenerator, StructuredReply};
use crate::schema::{Quiz, repair_questions};

const QUIZ_SYSTEM_PROMPT: &str = "You are an expert quiz creator. Your task is to create \
multiple-choice questions based on the provided document content. Each question should test \
understanding of key concepts from the document.";

const ANSWER_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant answering questions about PDF documents.";

/// Temperature used for grounded answer synthesis.
const ANSWER_TEMPERATURE: f32 = 0.3;

/// Output token cap for grounded answer synthesis.
const ANSWER_MAX_TOKENS: u32 = 1000;

/// An answer grounded in retrieved document chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundedAnswer {
    /// The generated answer text.
    pub answer: String,
    /// The chunks the answer was grounded in, ranked by relevance.
    pub sources: Vec<SearchResult>,
}

/// Study features over ingested documents: quiz generation and grounded
/// question answering.
///
/// Built from an injected [`Retriever`] and [`ChatModel`]; quiz grading
/// lives in [`crate::grade`] and needs no service state.
pub struct QuizService {
    retriever: Arc<Retriever>,
    generator: StructuredGenerator,
    model: Arc<dyn ChatModel>,
}

impl QuizService {
    /// Create a service over the given retriever and chat model.
    pub fn new(retriever: Arc<Retriever>, model: Arc<dyn ChatModel>) -> Self {
        let generator = StructuredGenerator::new(Arc::clone(&model));
        Self { retriever, generator, model }
    }

    /// Generate a multiple-choice quiz from one document's content.
    ///
    /// Feeds the document's full chunk list to the model and repairs the
    /// reply element-wise, so the returned quiz always has
    /// schema-valid questions (exactly one correct answer each).
    ///
    /// # Errors
    ///
    /// - [`QuizError::Rag`] with a not-found cause for an unknown id.
    /// - [`QuizError::Model`] if the backend stays unreachable after the
    ///   fallback attempt.
    /// - [`QuizError::MalformedResponse`] if the reply carried no usable
    ///   `questions` array; the truncated raw reply rides along for
    ///   diagnostics.
    pub async fn generate_quiz(&self, document_id: Uuid, num_questions: usize) -> Result<Quiz> {
        let chunks = self.retriever.chunks(document_id).await?;
        let content: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let combined = content.join("\n\n");

        info!(
            document.id = %document_id,
            num_questions,
            content_len = combined.len(),
            "generating quiz"
        );

        let user_prompt = quiz_user_prompt(document_id, num_questions, &combined);
        let reply = self.generator.generate(QUIZ_SYSTEM_PROMPT, &user_prompt).await?;

        let value = match reply {
            StructuredReply::Object(value) => value,
            StructuredReply::Malformed { message, raw_response } => {
                return Err(QuizError::MalformedResponse { message, raw_response });
            }
        };

        let Some(raw_questions) = value.get("questions").and_then(|q| q.as_array()) else {
            error!(document.id = %document_id, "generation reply lacks a questions array");
            return Err(QuizError::MalformedResponse {
                message: "missing or invalid 'questions' field".into(),
                raw_response: preview(&value.to_string(), RAW_RESPONSE_PREVIEW),
            });
        };

        let questions = repair_questions(raw_questions);
        let quiz = Quiz { quiz_id: Uuid::new_v4(), questions };

        info!(
            document.id = %document_id,
            quiz.id = %quiz.quiz_id,
            question_count = quiz.questions.len(),
            "generated quiz"
        );
        Ok(quiz)
    }

    /// Answer a question using the document's most relevant chunks.
    ///
    /// Retrieves the top-k chunks for the question, assembles them into a
    /// context block, and asks the model to answer from that context
    /// alone. The retrieved chunks ride along as sources.
    ///
    /// # Errors
    ///
    /// - [`QuizError::Rag`] with a not-found cause for an unknown id.
    /// - [`QuizError::Model`] on backend failure.
    pub async fn answer_question(
        &self,
        document_id: Uuid,
        question: &str,
    ) -> Result<GroundedAnswer> {
        let top_k = self.retriever.config().top_k;
        let sources = self.retriever.search(document_id, question, top_k).await?;

        let request = ChatRequest::new(ANSWER_SYSTEM_PROMPT, answer_prompt(question, &sources))
            .with_temperature(ANSWER_TEMPERATURE)
            .with_max_tokens(ANSWER_MAX_TOKENS);

        let answer = self.model.complete(&request).await?;

        info!(
            document.id = %document_id,
            source_count = sources.len(),
            answer_len = answer.len(),
            "answered question"
        );
        Ok(GroundedAnswer { answer, sources })
    }
}

/// Assemble the quiz generation prompt around the document content.
fn quiz_user_prompt(document_id: Uuid, num_questions: usize, content: &str) -> String {
    let title = format!("Document {}", &document_id.to_string()[..8]);
    format!(
        "Create a quiz with {num_questions} multiple-choice questions based on this document \
titled \"{title}\".\n\n\
DOCUMENT CONTENT:\n{content}\n\n\
INSTRUCTIONS:\n\
1. Each question should have 4 answer choices\n\
2. Exactly one answer should be marked as correct\n\
3. Include an explanation for why the correct answer is right\n\
4. Questions should cover key concepts from throughout the document\n\
5. Questions should test understanding, not just memorization\n\n\
FORMAT YOUR RESPONSE AS A JSON OBJECT with this structure:\n\
{{\n\
    \"questions\": [\n\
        {{\n\
            \"question\": \"Question text goes here?\",\n\
            \"answers\": [\n\
                {{ \"text\": \"Option A\", \"is_correct\": false }},\n\
                {{ \"text\": \"Option B\", \"is_correct\": true }},\n\
                {{ \"text\": \"Option C\", \"is_correct\": false }},\n\
                {{ \"text\": \"Option D\", \"is_correct\": false }}\n\
            ],\n\
            \"explanation\": \"Explanation of why the correct answer is right\"\n\
        }}\n\
    ]\n\
}}"
    )
}

/// Format retrieved chunks into a numbered context block.
fn format_context(sources: &[SearchResult]) -> String {
    sources
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            format!("[DOCUMENT CHUNK {}] Page {}\n{}\n", i + 1, chunk.page_number, chunk.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assemble the grounded-answer prompt.
fn answer_prompt(question: &str, sources: &[SearchResult]) -> String {
    format!(
        "You are a helpful AI assistant tasked with answering questions about a PDF document.\n\
Answer the question based ONLY on the provided document chunks below. Be concise and accurate.\n\
If the information to answer the question is not contained in the document chunks, respond with\n\
\"I cannot answer this question based on the provided document.\"\n\n\
Document chunks for context:\n{}\n\n\
Question: {question}\n\n\
Answer:",
        format_context(sources)
    )
}
