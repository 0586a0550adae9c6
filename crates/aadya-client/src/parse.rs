//! Response body parsing.
//!
//! The backend replies with raw JSON and is loose about empty results: the
//! next-question endpoint may answer with an empty body, `null`, or `{}`
//! once the bank is exhausted. These helpers turn response text into typed
//! values and report shape mismatches as [`BackendError::Decode`].

use aadya_core::backend::BackendError;
use aadya_types::{Ack, Question, Student};
use serde_json::Value;

/// Parse the body of a login or student lookup.
///
/// `requested_name` fills in the name when the backend only returns an id.
pub fn parse_student(body: &str, requested_name: Option<&str>) -> Result<Student, BackendError> {
    let mut student: Student = serde_json::from_str(body).map_err(|e| decode("student", &e))?;
    if student.name.is_none() {
        student.name = requested_name.map(str::to_owned);
    }
    Ok(student)
}

/// Parse the body of a next-question request. Any empty reply means the
/// quiz is exhausted.
pub fn parse_question(body: &str) -> Result<Option<Question>, BackendError> {
    let value = parse_value(body).map_err(|e| decode("question", &e))?;
    match value {
        Value::Null => Ok(None),
        Value::Object(ref fields) if fields.is_empty() => Ok(None),
        value => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| decode("question", &e)),
    }
}

/// Wrap the body of an answer submission. Bodies that are not JSON are kept
/// as a string.
pub fn parse_ack(body: &str) -> Ack {
    let body = parse_value(body).unwrap_or_else(|_| Value::String(body.to_owned()));
    Ack { body }
}

/// Parse the body of a score request. An empty body becomes `null`.
pub fn parse_scores(body: &str) -> Result<Value, BackendError> {
    parse_value(body).map_err(|e| decode("scores", &e))
}

fn parse_value(body: &str) -> Result<Value, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body)
}

fn decode(what: &str, err: &serde_json::Error) -> BackendError {
    BackendError::Decode {
        message: format!("{what}: {err}"),
    }
}
