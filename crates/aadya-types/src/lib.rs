//! Shared type definitions for the Aadya assessment.
//!
//! This crate is the single source of truth for the types that cross the
//! boundary between the session core, the backend client, and the front
//! ends. Types flow downstream to `TypeScript` via `ts-rs` for the web UI.
//!
//! # Modules
//!
//! - [`ids`] -- Backend key wrappers and the local session identifier
//! - [`enums`] -- Stages, sequence steps, emotion choices, notification levels
//! - [`structs`] -- Questions, score entries, notifications, session view

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Emotion, NotificationLevel, Stage, Step};
pub use ids::{ChildId, OptionId, QuestionId, SessionId};
pub use structs::{
    Ack, AnswerOption, BallPosition, MotorView, Notification, Question, ScoreEntry, SessionView,
    Student,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Files are written to `bindings/` relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::ChildId::export_all();
        let _ = crate::ids::QuestionId::export_all();
        let _ = crate::ids::OptionId::export_all();
        let _ = crate::ids::SessionId::export_all();

        let _ = crate::enums::Stage::export_all();
        let _ = crate::enums::Step::export_all();
        let _ = crate::enums::Emotion::export_all();
        let _ = crate::enums::NotificationLevel::export_all();

        let _ = crate::structs::Question::export_all();
        let _ = crate::structs::ScoreEntry::export_all();
        let _ = crate::structs::Notification::export_all();
        let _ = crate::structs::SessionView::export_all();
    }
}
