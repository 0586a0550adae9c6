//! Quiz controller: one question at a time.
//!
//! The controller does no I/O itself. The session asks it to *begin* a fetch
//! or a submit, performs the backend call, and hands the outcome back to the
//! matching *finish* method. At most one call is outstanding at a time, so a
//! fetch can never overtake a submit and two answers can never be attributed
//! to overlapping questions.

use aadya_types::{Ack, OptionId, Question, QuestionId};
use tracing::debug;

use crate::backend::BackendError;

/// The backend call currently outstanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InFlight {
    /// Waiting for the next question.
    Fetch,
    /// Waiting for an answer to be recorded.
    Submit {
        /// Question being answered.
        question_id: QuestionId,
        /// Chosen option.
        option_id: OptionId,
    },
}

/// Errors returned when the quiz cannot accept a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    /// Another backend call has not resolved yet.
    #[error("still waiting for the server")]
    Busy,

    /// No question is being shown.
    #[error("there is no question to answer")]
    NoQuestion,

    /// The option does not belong to the current question.
    #[error("option {option_id} is not part of this question")]
    UnknownOption {
        /// The rejected option.
        option_id: OptionId,
    },
}

/// Result of a completed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A new question is now current.
    Question,
    /// The backend has no more questions.
    Exhausted,
}

/// Submit parameters handed back to the caller by [`QuizController::begin_submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    /// Question being answered.
    pub question_id: QuestionId,
    /// Chosen option.
    pub option_id: OptionId,
}

/// Quiz state for one pass through the question bank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizController {
    current: Option<Question>,
    in_flight: Option<InFlight>,
    fetch_failed: bool,
    answered: u32,
}

impl QuizController {
    /// An empty quiz with nothing fetched yet.
    pub const fn new() -> Self {
        Self {
            current: None,
            in_flight: None,
            fetch_failed: false,
            answered: 0,
        }
    }

    /// Mark a fetch as outstanding.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::Busy`] while any call is outstanding.
    pub fn begin_fetch(&mut self) -> Result<(), QuizError> {
        if self.in_flight.is_some() {
            return Err(QuizError::Busy);
        }
        self.in_flight = Some(InFlight::Fetch);
        self.fetch_failed = false;
        Ok(())
    }

    /// Apply the outcome of the outstanding fetch.
    ///
    /// `Ok(None)` from the backend means the quiz is exhausted. A failure
    /// keeps whatever was current and allows [`Self::begin_fetch`] again.
    ///
    /// # Errors
    ///
    /// Passes the backend failure through.
    pub fn finish_fetch(
        &mut self,
        result: Result<Option<Question>, BackendError>,
    ) -> Result<FetchOutcome, BackendError> {
        self.in_flight = None;
        match result {
            Ok(Some(question)) => {
                debug!(question_id = %question.id, options = question.options.len(), "question received");
                self.current = Some(question);
                Ok(FetchOutcome::Question)
            }
            Ok(None) => {
                self.current = None;
                Ok(FetchOutcome::Exhausted)
            }
            Err(err) => {
                self.fetch_failed = true;
                Err(err)
            }
        }
    }

    /// Mark a submit of `option_id` for the current question as outstanding.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::Busy`] while any call is outstanding,
    /// [`QuizError::NoQuestion`] when nothing is shown, or
    /// [`QuizError::UnknownOption`] when the option is not offered.
    pub fn begin_submit(&mut self, option_id: OptionId) -> Result<SubmitRequest, QuizError> {
        if self.in_flight.is_some() {
            return Err(QuizError::Busy);
        }
        let question = self.current.as_ref().ok_or(QuizError::NoQuestion)?;
        if !question.options.iter().any(|option| option.id == option_id) {
            return Err(QuizError::UnknownOption { option_id });
        }
        let request = SubmitRequest {
            question_id: question.id.clone(),
            option_id,
        };
        self.in_flight = Some(InFlight::Submit {
            question_id: request.question_id.clone(),
            option_id: request.option_id.clone(),
        });
        Ok(request)
    }

    /// Apply the outcome of the outstanding submit.
    ///
    /// Success consumes the current question. Failure leaves it current so
    /// the child can answer again.
    ///
    /// # Errors
    ///
    /// Passes the backend failure through.
    pub fn finish_submit(&mut self, result: Result<Ack, BackendError>) -> Result<Ack, BackendError> {
        self.in_flight = None;
        let ack = result?;
        self.current = None;
        self.answered = self.answered.saturating_add(1);
        Ok(ack)
    }

    /// The question being shown.
    pub const fn current(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    /// The outstanding call, if any.
    pub const fn in_flight(&self) -> Option<&InFlight> {
        self.in_flight.as_ref()
    }

    /// Whether a backend call is outstanding.
    pub const fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the last fetch failed and may be retried.
    pub const fn fetch_failed(&self) -> bool {
        self.fetch_failed
    }

    /// Answers recorded in this pass.
    pub const fn answered(&self) -> u32 {
        self.answered
    }
}
