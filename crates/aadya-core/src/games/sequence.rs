//! Routine logic: tap the tooth-brushing steps in the right order.
//!
//! Taps are collected into `selected_order`. A step that is already selected
//! is ignored, so the order never holds duplicates and never grows past the
//! four cards. Checking compares the whole order against
//! [`CORRECT_ORDER`]: a match completes the game, anything else clears the
//! selection for another try. Retries are unlimited and not counted.

use aadya_types::Step;

use super::{GameError, MiniGame};

/// The only accepted answer.
pub const CORRECT_ORDER: [Step; 4] = [Step::Paste, Step::Brush, Step::Rinse, Step::Teeth];

/// Hint shown after a wrong check.
pub const HINT: &str = "Paste -> Brush -> Rinse -> Teeth";

/// Result of checking the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceVerdict {
    /// The order matched; the game is complete.
    Correct,
    /// The order did not match; the selection was cleared.
    TryAgain,
}

/// Sequence game state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceGame {
    selected_order: Vec<Step>,
    solved: bool,
}

impl SequenceGame {
    /// Start with nothing selected.
    pub const fn new() -> Self {
        Self {
            selected_order: Vec::new(),
            solved: false,
        }
    }

    /// Append a step to the selection.
    ///
    /// Returns `Ok(false)` when the step was already selected (repeat taps
    /// are no-ops).
    ///
    /// # Errors
    ///
    /// Returns [`GameError::AlreadyComplete`] once the game is solved.
    pub fn select(&mut self, step: Step) -> Result<bool, GameError> {
        if self.solved {
            return Err(GameError::AlreadyComplete);
        }
        if self.selected_order.contains(&step) {
            return Ok(false);
        }
        self.selected_order.push(step);
        Ok(true)
    }

    /// Compare the selection with [`CORRECT_ORDER`].
    ///
    /// # Errors
    ///
    /// Returns [`GameError::AlreadyComplete`] once the game is solved.
    pub fn check(&mut self) -> Result<SequenceVerdict, GameError> {
        if self.solved {
            return Err(GameError::AlreadyComplete);
        }
        if self.selected_order == CORRECT_ORDER {
            self.solved = true;
            Ok(SequenceVerdict::Correct)
        } else {
            self.selected_order.clear();
            Ok(SequenceVerdict::TryAgain)
        }
    }

    /// Steps tapped so far, in tap order.
    pub fn selected_order(&self) -> &[Step] {
        &self.selected_order
    }
}

impl MiniGame for SequenceGame {
    fn is_complete(&self) -> bool {
        self.solved
    }

    fn reset(&mut self) {
        self.selected_order.clear();
        self.solved = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select_all(game: &mut SequenceGame, steps: &[Step]) {
        for &step in steps {
            let _ = game.select(step);
        }
    }

    #[test]
    fn correct_order_completes() {
        let mut game = SequenceGame::new();
        select_all(&mut game, &[Step::Paste, Step::Brush, Step::Rinse, Step::Teeth]);
        assert_eq!(game.check(), Ok(SequenceVerdict::Correct));
        assert!(game.is_complete());
    }

    #[test]
    fn wrong_order_clears_and_keeps_collecting() {
        let mut game = SequenceGame::new();
        select_all(&mut game, &[Step::Brush, Step::Paste, Step::Rinse, Step::Teeth]);
        assert_eq!(game.check(), Ok(SequenceVerdict::TryAgain));
        assert!(!game.is_complete());
        assert!(game.selected_order().is_empty());

        // Unlimited retries.
        select_all(&mut game, &CORRECT_ORDER);
        assert_eq!(game.check(), Ok(SequenceVerdict::Correct));
    }

    #[test]
    fn partial_selection_is_wrong() {
        let mut game = SequenceGame::new();
        select_all(&mut game, &[Step::Paste, Step::Brush, Step::Rinse]);
        assert_eq!(game.check(), Ok(SequenceVerdict::TryAgain));
        assert!(game.selected_order().is_empty());
    }

    #[test]
    fn repeated_select_is_a_no_op() {
        let mut game = SequenceGame::new();
        assert_eq!(game.select(Step::Paste), Ok(true));
        assert_eq!(game.select(Step::Paste), Ok(false));
        assert_eq!(game.selected_order(), &[Step::Paste]);
    }

    #[test]
    fn selection_never_exceeds_vocabulary() {
        let mut game = SequenceGame::new();
        for _ in 0..3 {
            select_all(&mut game, &Step::DISPLAY_ORDER);
        }
        assert_eq!(game.selected_order().len(), 4);
    }

    #[test]
    fn reset_clears_selection() {
        let mut game = SequenceGame::new();
        select_all(&mut game, &[Step::Teeth, Step::Rinse]);
        game.reset();
        assert!(game.selected_order().is_empty());
        assert!(!game.is_complete());
    }

    #[test]
    fn solved_game_rejects_input() {
        let mut game = SequenceGame::new();
        select_all(&mut game, &CORRECT_ORDER);
        let _ = game.check();
        assert_eq!(game.select(Step::Paste), Err(GameError::AlreadyComplete));
        assert_eq!(game.check(), Err(GameError::AlreadyComplete));
    }
}
