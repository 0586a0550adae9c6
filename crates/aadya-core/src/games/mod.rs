//! The three activity mini-games played after the quiz.
//!
//! Each game is a small state machine that owns its transient state and
//! reports completion through [`MiniGame::is_complete`]. The session creates
//! a fresh game on stage entry and drops it on exit, so nothing carries over
//! between attempts.
//!
//! - [`sequence`] -- order the tooth-brushing steps (retry until correct)
//! - [`emotion`] -- name the feeling on a face (always advances)
//! - [`motor`] -- catch a moving ball a fixed number of times (timed)

pub mod emotion;
pub mod motor;
pub mod sequence;

pub use emotion::{EmotionGame, EmotionVerdict};
pub use motor::{HitOutcome, MotorGame, MotorPhase};
pub use sequence::{SequenceGame, SequenceVerdict};

/// Errors returned when a game receives input it cannot accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The game already reached its completion condition.
    #[error("this activity is already finished")]
    AlreadyComplete,
}

/// Common surface of every mini-game.
pub trait MiniGame {
    /// Whether the completion condition has been met.
    fn is_complete(&self) -> bool;

    /// Discard all progress and start over.
    fn reset(&mut self);
}
