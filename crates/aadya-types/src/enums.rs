//! Enumeration types for the Aadya assessment.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// One phase of the fixed assessment sequence.
///
/// Stages run strictly in declaration order. The only backward edge is
/// `Results -> Quiz` on an explicit restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Stage {
    /// No child identity has been resolved yet.
    LoggedOut,
    /// Multiple-choice quiz, one question at a time.
    Quiz,
    /// Activity 1: put the tooth-brushing routine in order.
    Sequence,
    /// Activity 2: recognise an emotion from a face.
    Emotion,
    /// Activity 3: catch the moving ball.
    Motor,
    /// Intelligence profile chart.
    Results,
}

impl Stage {
    /// Short lowercase name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoggedOut => "logged_out",
            Self::Quiz => "quiz",
            Self::Sequence => "sequence",
            Self::Emotion => "emotion",
            Self::Motor => "motor",
            Self::Results => "results",
        }
    }
}

impl core::fmt::Display for Stage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Sequence game vocabulary
// ---------------------------------------------------------------------------

/// A step card in the tooth-brushing sequence game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Step {
    /// Put paste on the brush.
    Paste,
    /// Brush.
    Brush,
    /// Rinse the mouth.
    Rinse,
    /// Clean teeth.
    Teeth,
}

impl Step {
    /// Every card, in the order the game presents them (shuffled on purpose).
    pub const DISPLAY_ORDER: [Self; 4] = [Self::Teeth, Self::Rinse, Self::Brush, Self::Paste];

    /// Card label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Paste => "Paste",
            Self::Brush => "Brush",
            Self::Rinse => "Rinse",
            Self::Teeth => "Teeth",
        }
    }

    /// Look up a card by its label, ignoring case.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::DISPLAY_ORDER
            .into_iter()
            .find(|step| step.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl core::fmt::Display for Step {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Emotion game choices
// ---------------------------------------------------------------------------

/// A feeling offered as an answer in the emotion game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Emotion {
    /// 😂
    Happy,
    /// 😤
    Frustrated,
    /// 😴
    Tired,
}

impl Emotion {
    /// Choices in presentation order.
    pub const CHOICES: [Self; 3] = [Self::Happy, Self::Frustrated, Self::Tired];

    /// Choice label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Happy => "Happy",
            Self::Frustrated => "Frustrated",
            Self::Tired => "Tired",
        }
    }

    /// Emoji shown on the choice button.
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Happy => "😂",
            Self::Frustrated => "😤",
            Self::Tired => "😴",
        }
    }

    /// Look up a choice by its label, ignoring case.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::CHOICES
            .into_iter()
            .find(|emotion| emotion.label().eq_ignore_ascii_case(label.trim()))
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum NotificationLevel {
    /// Neutral feedback.
    Info,
    /// The child got something right.
    Success,
    /// Something the child can fix or retry.
    Warning,
    /// A failure reported by the backend.
    Error,
}
