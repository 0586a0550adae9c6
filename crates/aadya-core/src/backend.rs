//! Backend API abstraction.
//!
//! The assessment backend owns identities, the question bank, answer
//! recording, and scoring. The session only needs four calls, described by
//! [`AssessmentBackend`]. The HTTP implementation lives in `aadya-client`;
//! tests use scripted in-memory backends.
//!
//! Methods return `impl Future + Send` so the session runner can spawn each
//! call as its own task and keep accepting input while it is outstanding.

use std::future::Future;

use aadya_types::{Ack, ChildId, OptionId, Question, QuestionId, Student};

/// Errors reported by a backend call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The request never produced a response (connect failure, timeout).
    #[error("transport error: {message}")]
    Transport {
        /// Description of the failure.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response: {message}")]
    Decode {
        /// Description of the mismatch.
        message: String,
    },
}

/// The four backend operations the assessment depends on.
pub trait AssessmentBackend: Send + Sync + 'static {
    /// Log a child in.
    ///
    /// With a name, registers (or re-finds) the child by name. Without one,
    /// looks up the student the backend already associates with this client.
    fn resolve_or_create_student(
        &self,
        name: Option<&str>,
    ) -> impl Future<Output = Result<Student, BackendError>> + Send;

    /// Fetch the next unanswered question, or `None` when the quiz is
    /// exhausted.
    fn fetch_next_question(
        &self,
        child_id: &ChildId,
    ) -> impl Future<Output = Result<Option<Question>, BackendError>> + Send;

    /// Record the chosen option. Success means the backend stored it.
    fn submit_answer(
        &self,
        child_id: &ChildId,
        question_id: &QuestionId,
        option_id: &OptionId,
    ) -> impl Future<Output = Result<Ack, BackendError>> + Send;

    /// Fetch the raw score payload (a list or a keyed map).
    fn fetch_scores(
        &self,
        child_id: &ChildId,
    ) -> impl Future<Output = Result<serde_json::Value, BackendError>> + Send;
}
