//! REST implementation of [`AssessmentBackend`].
//!
//! Endpoints, relative to the configured base URL:
//!
//! | Call                          | Request                                  |
//! |-------------------------------|------------------------------------------|
//! | register child                | `POST /children {name}`                  |
//! | look up current student       | `GET /responses/user`                    |
//! | next question                 | `GET /responses/question?childId=..`     |
//! | record answer                 | `POST /responses {childId, questionId, optionId}` |
//! | score profile                 | `GET /responses/score/{childId}`         |

use std::time::Duration;

use aadya_core::backend::{AssessmentBackend, BackendError};
use aadya_core::config::BackendConfig;
use aadya_types::{Ack, ChildId, OptionId, Question, QuestionId, Student};
use reqwest::Url;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::parse;

/// Longest error body kept in [`BackendError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Body of `POST /children`.
#[derive(Serialize)]
struct NewChild<'a> {
    name: &'a str,
}

/// Body of `POST /responses`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnswerSubmission<'a> {
    child_id: &'a ChildId,
    question_id: &'a QuestionId,
    option_id: &'a OptionId,
}

/// Assessment backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base: Url,
}

impl HttpBackend {
    /// Create a backend for `config.api_url` with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the URL cannot be parsed or
    /// cannot carry a path, or [`ClientError::Build`] if the HTTP client
    /// fails to initialize.
    pub fn new(config: &BackendConfig) -> Result<Self, ClientError> {
        let base = Url::parse(config.api_url.trim()).map_err(|e| ClientError::InvalidUrl {
            url: config.api_url.clone(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl {
                url: config.api_url.clone(),
                reason: "URL cannot have a path".to_owned(),
            });
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self { client, base })
    }

    /// The base URL every endpoint is resolved against.
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    /// Build the URL for `segments` below the base URL. Segments are
    /// percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::Transport {
                message: format!("base URL {} cannot have a path", self.base),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and return the response text of a success status.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, BackendError> {
        let response = request.send().await.map_err(|e| transport(&e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| transport(&e))?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "backend returned an error status");
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: truncate(body),
            });
        }
        Ok(body)
    }
}

impl AssessmentBackend for HttpBackend {
    async fn resolve_or_create_student(&self, name: Option<&str>) -> Result<Student, BackendError> {
        let request = match name {
            Some(name) => {
                let url = self.endpoint(&["children"])?;
                debug!(%url, "registering child");
                self.client.post(url).json(&NewChild { name })
            }
            None => {
                let url = self.endpoint(&["responses", "user"])?;
                debug!(%url, "looking up current student");
                self.client.get(url)
            }
        };
        let body = self.send(request).await?;
        parse::parse_student(&body, name)
    }

    async fn fetch_next_question(&self, child_id: &ChildId) -> Result<Option<Question>, BackendError> {
        let url = self.endpoint(&["responses", "question"])?;
        debug!(%url, %child_id, "fetching next question");
        let request = self.client.get(url).query(&[("childId", child_id.as_str())]);
        let body = self.send(request).await?;
        parse::parse_question(&body)
    }

    async fn submit_answer(
        &self,
        child_id: &ChildId,
        question_id: &QuestionId,
        option_id: &OptionId,
    ) -> Result<Ack, BackendError> {
        let url = self.endpoint(&["responses"])?;
        debug!(%url, %child_id, %question_id, %option_id, "submitting answer");
        let request = self.client.post(url).json(&AnswerSubmission {
            child_id,
            question_id,
            option_id,
        });
        let body = self.send(request).await?;
        Ok(parse::parse_ack(&body))
    }

    async fn fetch_scores(&self, child_id: &ChildId) -> Result<serde_json::Value, BackendError> {
        let url = self.endpoint(&["responses", "score", child_id.as_str()])?;
        debug!(%url, "fetching scores");
        let body = self.send(self.client.get(url)).await?;
        parse::parse_scores(&body)
    }
}

fn transport(err: &reqwest::Error) -> BackendError {
    let message = if err.is_timeout() {
        format!("request timed out: {err}")
    } else {
        err.to_string()
    };
    BackendError::Transport { message }
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut = cut.saturating_sub(1);
        }
        body.truncate(cut);
    }
    body
}
