//! Response time: catch a ball that jumps around the play area.
//!
//! The game starts in [`MotorPhase::Playing`] with the ball at a random
//! spot. Each catch counts one hit and moves the ball; the catch that
//! reaches the target switches to [`MotorPhase::Finished`] and reports the
//! elapsed seconds. Elapsed time only advances through [`MotorGame::tick`]
//! while playing. It is shown to the child and never scored.
//!
//! Ball coordinates are whole percentages drawn independently and uniformly
//! from `0..spawn_range`. With a range below 100 the ball never touches the
//! right or bottom edge.

use aadya_types::{BallPosition, MotorView};
use rand::Rng;
use rand::rngs::SmallRng;

use super::{GameError, MiniGame};

/// Whether the child is still catching balls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorPhase {
    /// Timer running, ball catchable.
    Playing,
    /// Target reached, timer stopped.
    Finished,
}

/// What a catch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Counted; the ball jumped to a new spot.
    Moved(BallPosition),
    /// The final catch. Carries the time taken.
    Finished {
        /// Whole seconds spent playing.
        elapsed_seconds: u32,
    },
}

/// Motor game state.
#[derive(Debug, Clone)]
pub struct MotorGame {
    hits: u8,
    target: u8,
    elapsed_seconds: u32,
    ball: BallPosition,
    spawn_range: u8,
    phase: MotorPhase,
    rng: SmallRng,
}

impl MotorGame {
    /// Start a game needing `target` catches, with ball coordinates drawn
    /// from `0..spawn_range`.
    ///
    /// A zero target or range is raised to 1.
    pub fn new(target: u8, spawn_range: u8, rng: SmallRng) -> Self {
        let mut game = Self {
            hits: 0,
            target: target.max(1),
            elapsed_seconds: 0,
            ball: BallPosition { top: 0, left: 0 },
            spawn_range: spawn_range.max(1),
            phase: MotorPhase::Playing,
            rng,
        };
        game.ball = game.random_position();
        game
    }

    /// Count one second of play. Ignored once finished.
    ///
    /// Returns whether the tick was counted.
    pub const fn tick(&mut self) -> bool {
        match self.phase {
            MotorPhase::Playing => {
                self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
                true
            }
            MotorPhase::Finished => false,
        }
    }

    /// Register a catch.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::AlreadyComplete`] after the target was reached,
    /// so the hit count never passes the target.
    pub fn hit(&mut self) -> Result<HitOutcome, GameError> {
        if self.phase == MotorPhase::Finished {
            return Err(GameError::AlreadyComplete);
        }
        self.hits = self.hits.saturating_add(1);
        if self.hits >= self.target {
            self.phase = MotorPhase::Finished;
            return Ok(HitOutcome::Finished {
                elapsed_seconds: self.elapsed_seconds,
            });
        }
        self.ball = self.random_position();
        Ok(HitOutcome::Moved(self.ball))
    }

    /// Catches so far.
    pub const fn hits(&self) -> u8 {
        self.hits
    }

    /// Catches needed.
    pub const fn target(&self) -> u8 {
        self.target
    }

    /// Whole seconds spent playing.
    pub const fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    /// Current ball position.
    pub const fn ball(&self) -> BallPosition {
        self.ball
    }

    /// Current phase.
    pub const fn phase(&self) -> MotorPhase {
        self.phase
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> MotorView {
        MotorView {
            hits: self.hits,
            target: self.target,
            elapsed_seconds: self.elapsed_seconds,
            ball: self.ball,
            finished: self.is_complete(),
        }
    }

    fn random_position(&mut self) -> BallPosition {
        BallPosition {
            top: self.rng.random_range(0..self.spawn_range),
            left: self.rng.random_range(0..self.spawn_range),
        }
    }
}

impl MiniGame for MotorGame {
    fn is_complete(&self) -> bool {
        self.phase == MotorPhase::Finished
    }

    fn reset(&mut self) {
        self.hits = 0;
        self.elapsed_seconds = 0;
        self.phase = MotorPhase::Playing;
        self.ball = self.random_position();
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn game(target: u8) -> MotorGame {
        MotorGame::new(target, 80, SmallRng::seed_from_u64(7))
    }

    #[test]
    fn fifth_hit_finishes_and_not_before() {
        let mut game = game(5);
        for _ in 0..4 {
            let outcome = game.hit();
            assert!(matches!(outcome, Ok(HitOutcome::Moved(_))));
            assert!(!game.is_complete());
        }
        assert_eq!(game.hit(), Ok(HitOutcome::Finished { elapsed_seconds: 0 }));
        assert!(game.is_complete());
        assert_eq!(game.hits(), 5);
    }

    #[test]
    fn hits_never_exceed_target() {
        let mut game = game(5);
        for _ in 0..5 {
            let _ = game.hit();
        }
        assert_eq!(game.hit(), Err(GameError::AlreadyComplete));
        assert_eq!(game.hits(), 5);
    }

    #[test]
    fn ticks_count_only_while_playing() {
        let mut game = game(2);
        assert!(game.tick());
        assert!(game.tick());
        let _ = game.hit();
        assert!(game.tick());
        assert_eq!(game.hit(), Ok(HitOutcome::Finished { elapsed_seconds: 3 }));
        assert!(!game.tick());
        assert_eq!(game.elapsed_seconds(), 3);
    }

    #[test]
    fn ball_stays_inside_spawn_range() {
        let mut game = MotorGame::new(u8::MAX, 80, SmallRng::seed_from_u64(99));
        for _ in 0..200 {
            let ball = game.ball();
            assert!(ball.top < 80 && ball.left < 80, "ball escaped: {ball:?}");
            let _ = game.hit();
        }
    }

    #[test]
    fn ball_moves_between_hits() {
        let mut game = game(50);
        let mut positions = Vec::new();
        for _ in 0..20 {
            if let Ok(HitOutcome::Moved(ball)) = game.hit() {
                positions.push(ball);
            }
        }
        positions.dedup();
        assert!(positions.len() > 1);
    }

    #[test]
    fn reset_starts_over() {
        let mut game = game(1);
        let _ = game.tick();
        let _ = game.hit();
        game.reset();
        assert_eq!(game.hits(), 0);
        assert_eq!(game.elapsed_seconds(), 0);
        assert_eq!(game.phase(), MotorPhase::Playing);
    }

    #[test]
    fn zero_target_is_raised_to_one() {
        let mut game = game(0);
        assert_eq!(game.target(), 1);
        assert!(matches!(game.hit(), Ok(HitOutcome::Finished { .. })));
    }
}
