//! Core entity structs: questions, score entries, notifications, and the
//! read-only session view handed to front ends.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{NotificationLevel, Stage, Step};
use crate::ids::{ChildId, OptionId, QuestionId, SessionId};

// ---------------------------------------------------------------------------
// Backend payloads
// ---------------------------------------------------------------------------

/// One answer option of a quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AnswerOption {
    /// Option identifier, echoed back on submit.
    pub id: OptionId,
    /// Text shown on the button.
    pub text: String,
    /// Scoring weight. Owned by the backend; the client never reads it.
    #[serde(default)]
    #[ts(as = "String")]
    pub weight: Decimal,
}

/// A quiz question as served by the backend.
///
/// Immutable once fetched; the quiz replaces it wholesale on the next fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Question {
    /// Question identifier.
    pub id: QuestionId,
    /// Question text (also the text spoken aloud).
    pub text: String,
    /// Answer options in display order.
    #[serde(default)]
    pub options: Vec<AnswerOption>,
}

/// A student record returned by login or lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Student {
    /// Backend-assigned child identifier.
    pub id: ChildId,
    /// Display name, when the backend returns one.
    #[serde(default)]
    pub name: Option<String>,
}

/// Backend acknowledgement of a recorded answer.
///
/// The body is kept verbatim; the client trusts the acknowledgement and does
/// not inspect it further.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Ack {
    /// Raw response body.
    pub body: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// One bar of the intelligence profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ScoreEntry {
    /// Intelligence dimension name.
    pub label: String,
    /// Raw score. Usually in `0..=100` but never clamped here.
    #[ts(as = "String")]
    pub value: Decimal,
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

/// Ball position inside the motor game's play area, in whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BallPosition {
    /// Distance from the top edge.
    pub top: u8,
    /// Distance from the left edge.
    pub left: u8,
}

/// A human-readable message for the child or operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Message text.
    pub message: String,
}

impl Notification {
    /// Neutral notification.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    /// Positive feedback.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    /// Recoverable problem.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    /// Backend failure.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Motor game progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MotorView {
    /// Balls caught so far.
    pub hits: u8,
    /// Balls needed to finish.
    pub target: u8,
    /// Whole seconds spent playing.
    pub elapsed_seconds: u32,
    /// Where the ball is now.
    pub ball: BallPosition,
    /// Whether the target has been reached.
    pub finished: bool,
}

/// Read-only snapshot of the session for rendering.
///
/// Only the fields belonging to the active stage are populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SessionView {
    /// Orchestrator run identifier.
    pub session_id: SessionId,
    /// When the orchestrator was created.
    pub created_at: DateTime<Utc>,
    /// Active stage.
    pub stage: Stage,
    /// Resolved child, once logged in.
    pub child_id: Option<ChildId>,
    /// Whether the session stopped after a fatal failure.
    pub halted: bool,
    /// Whether a backend call issued by this stage is outstanding.
    pub busy: bool,
    /// Current quiz question.
    pub question: Option<Question>,
    /// Sequence cards tapped so far.
    pub selected_order: Vec<Step>,
    /// Motor game progress.
    pub motor: Option<MotorView>,
    /// Normalized profile, in the results stage.
    pub scores: Vec<ScoreEntry>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn question_parses_backend_shape() {
        let json = r#"{
            "id": "q1",
            "text": "Which do you enjoy most?",
            "options": [
                {"id": "o1", "text": "Puzzles", "weight": 3},
                {"id": 2, "text": "Singing", "weight": 1.5}
            ]
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.id, QuestionId::new("q1"));
        assert_eq!(question.options.len(), 2);
        assert_eq!(question.options[1].id, OptionId::new("2"));
        assert_eq!(question.options[1].weight, Decimal::new(15, 1));
    }

    #[test]
    fn option_weight_defaults_to_zero() {
        let option: AnswerOption = serde_json::from_str(r#"{"id": "o", "text": "t"}"#).unwrap();
        assert_eq!(option.weight, Decimal::ZERO);
    }

    #[test]
    fn student_name_is_optional() {
        let student: Student = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(student.id, ChildId::new("7"));
        assert!(student.name.is_none());
    }
}
