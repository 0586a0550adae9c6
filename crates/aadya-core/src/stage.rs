//! Stage transition table.
//!
//! ```text
//! LoggedOut -> Quiz -> Sequence -> Emotion -> Motor -> Results
//!               ^                                        |
//!               +---------------- restart ---------------+
//! ```
//!
//! [`next_stage`] is the whole table. It is pure: the session decides which
//! [`Trigger`] fired and applies whatever stage this function returns.

use aadya_types::Stage;

/// An event that may move the session to another stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Login or student lookup produced a child id.
    IdentityResolved,
    /// The backend ran out of questions.
    QuizExhausted,
    /// The child chose to skip the rest of the quiz.
    Skip,
    /// The sequence game was solved.
    SequenceSolved,
    /// The emotion game was answered (right or wrong).
    EmotionAnswered,
    /// The motor game finished and its scores were loaded and normalized.
    ScoresLoaded,
    /// The child asked to start over from the results chart.
    Restart,
}

/// The stage reached from `stage` when `trigger` fires, or `None` if the
/// trigger does not apply there.
pub const fn next_stage(stage: Stage, trigger: Trigger) -> Option<Stage> {
    match (stage, trigger) {
        (Stage::LoggedOut, Trigger::IdentityResolved) | (Stage::Results, Trigger::Restart) => {
            Some(Stage::Quiz)
        }
        (Stage::Quiz, Trigger::QuizExhausted | Trigger::Skip) => Some(Stage::Sequence),
        (Stage::Sequence, Trigger::SequenceSolved) => Some(Stage::Emotion),
        (Stage::Emotion, Trigger::EmotionAnswered) => Some(Stage::Motor),
        (Stage::Motor, Trigger::ScoresLoaded) => Some(Stage::Results),
        _ => None,
    }
}
