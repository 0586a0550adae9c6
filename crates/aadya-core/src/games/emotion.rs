//! Emotional IQ: pick the feeling shown on a face.
//!
//! Single shot. Whatever the child picks, the game completes; correctness
//! only changes the feedback message. This differs from the sequence game on
//! purpose and must stay that way.

use aadya_types::Emotion;

use super::{GameError, MiniGame};

/// The face shown to the child.
pub const FACE: &str = "😤";

/// The feeling the face shows.
pub const TARGET: Emotion = Emotion::Frustrated;

/// Feedback for an answer. Both variants complete the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmotionVerdict {
    /// The child named the right feeling.
    Correct,
    /// The child picked another feeling.
    Incorrect,
}

impl EmotionVerdict {
    /// Message shown to the child.
    pub const fn feedback(self) -> &'static str {
        match self {
            Self::Correct => "Great job! 😃",
            Self::Incorrect => "Not quite.",
        }
    }
}

/// Emotion game state: the verdict once answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmotionGame {
    verdict: Option<EmotionVerdict>,
}

impl EmotionGame {
    /// A fresh, unanswered game.
    pub const fn new() -> Self {
        Self { verdict: None }
    }

    /// Record an answer. Completes the game regardless of `is_correct`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::AlreadyComplete`] if an answer was already given.
    pub fn answer(&mut self, is_correct: bool) -> Result<EmotionVerdict, GameError> {
        if self.verdict.is_some() {
            return Err(GameError::AlreadyComplete);
        }
        let verdict = if is_correct {
            EmotionVerdict::Correct
        } else {
            EmotionVerdict::Incorrect
        };
        self.verdict = Some(verdict);
        Ok(verdict)
    }

    /// Answer by choosing one of the offered feelings.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::AlreadyComplete`] if an answer was already given.
    pub fn choose(&mut self, emotion: Emotion) -> Result<EmotionVerdict, GameError> {
        self.answer(emotion == TARGET)
    }

    /// The recorded verdict, if answered.
    pub const fn verdict(&self) -> Option<EmotionVerdict> {
        self.verdict
    }
}

impl MiniGame for EmotionGame {
    fn is_complete(&self) -> bool {
        self.verdict.is_some()
    }

    fn reset(&mut self) {
        self.verdict = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_answer_still_completes() {
        let mut game = EmotionGame::new();
        assert_eq!(game.answer(false), Ok(EmotionVerdict::Incorrect));
        assert!(game.is_complete());
    }

    #[test]
    fn right_answer_completes() {
        let mut game = EmotionGame::new();
        assert_eq!(game.answer(true), Ok(EmotionVerdict::Correct));
        assert!(game.is_complete());
    }

    #[test]
    fn choosing_maps_to_target() {
        let mut game = EmotionGame::new();
        assert_eq!(game.choose(Emotion::Frustrated), Ok(EmotionVerdict::Correct));

        let mut game = EmotionGame::new();
        assert_eq!(game.choose(Emotion::Happy), Ok(EmotionVerdict::Incorrect));
    }

    #[test]
    fn second_answer_is_rejected() {
        let mut game = EmotionGame::new();
        let _ = game.answer(false);
        assert_eq!(game.answer(true), Err(GameError::AlreadyComplete));
        assert_eq!(game.verdict(), Some(EmotionVerdict::Incorrect));
    }

    #[test]
    fn feedback_differs_by_verdict() {
        assert_ne!(
            EmotionVerdict::Correct.feedback(),
            EmotionVerdict::Incorrect.feedback()
        );
    }

    #[test]
    fn reset_allows_a_new_answer() {
        let mut game = EmotionGame::new();
        let _ = game.answer(true);
        game.reset();
        assert!(!game.is_complete());
        assert!(game.answer(false).is_ok());
    }
}
