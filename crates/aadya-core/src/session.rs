//! Assessment session orchestrator.
//!
//! [`Session`] is the state machine for one child's run through the
//! assessment. It performs no I/O. Front ends feed it [`Action`]s (taps and
//! clicks) and [`Completion`]s (backend results and timer ticks); each call
//! runs to completion and returns the [`Effect`]s the caller must carry out:
//! backend requests, timer start/stop, notifications, speech.
//!
//! # Stage state
//!
//! Exactly one stage is active, and only the active stage has state: the
//! quiz controller, a mini-game, or the score chart live inside the stage
//! variant and are dropped on exit. Nothing from a finished mini-game can
//! leak into a later stage or a restarted run.
//!
//! # Stale responses
//!
//! Every stage entry bumps a [`Generation`]. Effects that start background
//! work carry the generation they were issued under, and completions must
//! echo it back. A completion from an earlier generation belongs to a stage
//! the session already left and is dropped unapplied. This covers rapid
//! skip and restart sequences where several responses can still be in
//! flight.

use std::time::Duration;

use aadya_types::{
    Ack, ChildId, Emotion, Notification, NotificationLevel, OptionId, Question, QuestionId,
    ScoreEntry, SessionId, SessionView, Stage, Step, Student,
};
use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, error, info, warn};

use crate::backend::BackendError;
use crate::config::AssessmentConfig;
use crate::games::sequence::HINT;
use crate::games::{
    EmotionGame, EmotionVerdict, GameError, HitOutcome, MiniGame, MotorGame, SequenceGame,
    SequenceVerdict,
};
use crate::quiz::{FetchOutcome, InFlight, QuizController, QuizError};
use crate::score;
use crate::stage::{Trigger, next_stage};

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

/// Counter identifying the stage entry that issued a background request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

impl Generation {
    /// The generation after this one.
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl core::fmt::Display for Generation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Something the child did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Start: register by name, or look up the existing student.
    Login {
        /// Child's name. `None` looks up the student the backend already knows.
        name: Option<String>,
    },
    /// Answer the current quiz question.
    Answer {
        /// Chosen option.
        option_id: OptionId,
    },
    /// Skip the rest of the quiz and go to the activities.
    Skip,
    /// Read the current question aloud.
    SpeakQuestion,
    /// Tap a card in the sequence game.
    SelectStep(Step),
    /// Check the tapped sequence.
    CheckSequence,
    /// Clear the tapped sequence.
    ResetSequence,
    /// Pick a feeling in the emotion game.
    ChooseEmotion(Emotion),
    /// Catch the ball in the motor game.
    HitBall,
    /// Re-issue a failed question or score fetch.
    Retry,
    /// Start over from the results chart.
    Restart,
}

impl Action {
    /// Short name used in logs and error messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "log in",
            Self::Answer { .. } => "answer",
            Self::Skip => "skip",
            Self::SpeakQuestion => "read the question",
            Self::SelectStep(_) => "select a step",
            Self::CheckSequence => "check the order",
            Self::ResetSequence => "reset the order",
            Self::ChooseEmotion(_) => "choose a feeling",
            Self::HitBall => "catch the ball",
            Self::Retry => "retry",
            Self::Restart => "start over",
        }
    }
}

/// The result of background work started by an [`Effect`].
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Outcome of [`Effect::ResolveStudent`].
    StudentResolved(Result<Student, BackendError>),
    /// Outcome of [`Effect::FetchQuestion`].
    QuestionFetched(Result<Option<Question>, BackendError>),
    /// Outcome of [`Effect::SubmitAnswer`].
    AnswerSubmitted(Result<Ack, BackendError>),
    /// Outcome of [`Effect::FetchScores`].
    ScoresFetched(Result<serde_json::Value, BackendError>),
    /// One period of the motor timer elapsed.
    TimerTick,
}

/// Work the caller must perform on behalf of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Call `resolve_or_create_student`.
    ResolveStudent {
        /// Generation to echo back.
        generation: Generation,
        /// Name to register, if any.
        name: Option<String>,
    },
    /// Call `fetch_next_question`.
    FetchQuestion {
        /// Generation to echo back.
        generation: Generation,
        /// Child being assessed.
        child_id: ChildId,
    },
    /// Call `submit_answer`.
    SubmitAnswer {
        /// Generation to echo back.
        generation: Generation,
        /// Child being assessed.
        child_id: ChildId,
        /// Question answered.
        question_id: QuestionId,
        /// Chosen option.
        option_id: OptionId,
    },
    /// Call `fetch_scores`.
    FetchScores {
        /// Generation to echo back.
        generation: Generation,
        /// Child being assessed.
        child_id: ChildId,
    },
    /// Start the motor timer, delivering [`Completion::TimerTick`] every
    /// `interval`.
    StartMotorTimer {
        /// Generation to echo back with every tick.
        generation: Generation,
        /// Tick period.
        interval: Duration,
    },
    /// Stop the motor timer. Harmless when it is not running.
    StopMotorTimer,
    /// Show a message.
    Notify(Notification),
    /// Read text aloud. Fire and forget.
    Speak(String),
}

/// A backend failure the session surfaced to the child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// Login failed. The session is halted.
    IdentityResolution(BackendError),
    /// A quiz or score call failed. The stage is unchanged and the action
    /// can be retried.
    TransientNetwork(BackendError),
}

/// Reasons an [`Action`] was rejected. The session state is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Login was attempted with a blank name.
    #[error("Name required!")]
    NameRequired,

    /// Login failed earlier; this session cannot continue.
    #[error("this session has stopped after a failed login; start a new one")]
    Halted,

    /// The action does not apply to the active stage.
    #[error("cannot {action} during the {stage} stage")]
    NotAllowed {
        /// The rejected action.
        action: &'static str,
        /// The active stage.
        stage: Stage,
    },

    /// A backend call issued by this stage is still outstanding.
    #[error("still waiting for the server")]
    Busy,

    /// Retry was requested but nothing has failed.
    #[error("there is nothing to retry")]
    NothingToRetry,

    /// The quiz rejected the request.
    #[error(transparent)]
    Quiz(#[from] QuizError),

    /// The active mini-game rejected the input.
    #[error(transparent)]
    Game(#[from] GameError),
}

// ---------------------------------------------------------------------------
// Stage state
// ---------------------------------------------------------------------------

/// Progress of the score fetch that ends the motor stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScoreRequest {
    /// Still playing.
    Idle,
    /// Game finished, scores requested.
    InFlight,
    /// Game finished, fetch failed; waiting for a retry.
    Failed,
}

#[derive(Debug, Clone)]
struct MotorStage {
    game: MotorGame,
    scores: ScoreRequest,
}

/// State owned by the active stage.
#[derive(Debug, Clone)]
enum StageState {
    LoggedOut { resolving: bool },
    Quiz(QuizController),
    Sequence(SequenceGame),
    Emotion(EmotionGame),
    Motor(MotorStage),
    Results(Vec<ScoreEntry>),
}

impl StageState {
    const fn stage(&self) -> Stage {
        match self {
            Self::LoggedOut { .. } => Stage::LoggedOut,
            Self::Quiz(_) => Stage::Quiz,
            Self::Sequence(_) => Stage::Sequence,
            Self::Emotion(_) => Stage::Emotion,
            Self::Motor(_) => Stage::Motor,
            Self::Results(_) => Stage::Results,
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One child's assessment run.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    created_at: DateTime<Utc>,
    child_id: Option<ChildId>,
    generation: Generation,
    state: StageState,
    halted: bool,
    last_failure: Option<Failure>,
    hit_target: u8,
    spawn_range: u8,
    tick_interval: Duration,
    fallback_labels: Vec<String>,
    rng: SmallRng,
}

impl Session {
    /// Create a logged-out session.
    pub fn new(config: &AssessmentConfig) -> Self {
        let rng = config
            .motor
            .seed
            .map_or_else(SmallRng::from_os_rng, SmallRng::seed_from_u64);
        let session = Self {
            id: SessionId::new(),
            created_at: Utc::now(),
            child_id: None,
            generation: Generation::default(),
            state: StageState::LoggedOut { resolving: false },
            halted: false,
            last_failure: None,
            hit_target: config.motor.hit_target,
            spawn_range: config.motor.spawn_range_percent,
            tick_interval: Duration::from_millis(config.motor.tick_interval_ms),
            fallback_labels: config.scoring.fallback_labels.clone(),
            rng,
        };
        info!(session_id = %session.id, "session created");
        session
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Apply a user action.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the action is rejected; the session is
    /// left exactly as it was.
    pub fn apply(&mut self, action: Action) -> Result<Vec<Effect>, SessionError> {
        if self.halted {
            return Err(SessionError::Halted);
        }
        let name = action.name();
        debug!(session_id = %self.id, stage = %self.stage(), action = name, "action");
        match action {
            Action::Login { name: child_name } => self.login(child_name),
            Action::Answer { option_id } => self.answer(option_id),
            Action::Skip => match self.state {
                StageState::Quiz(_) => Ok(self.advance(Trigger::Skip)),
                _ => Err(self.not_allowed(name)),
            },
            Action::SpeakQuestion => match &self.state {
                StageState::Quiz(quiz) => {
                    let question = quiz.current().ok_or(QuizError::NoQuestion)?;
                    Ok(vec![Effect::Speak(question.text.clone())])
                }
                _ => Err(self.not_allowed(name)),
            },
            Action::SelectStep(step) => match &mut self.state {
                StageState::Sequence(game) => {
                    game.select(step)?;
                    Ok(Vec::new())
                }
                _ => Err(self.not_allowed(name)),
            },
            Action::CheckSequence => self.check_sequence(),
            Action::ResetSequence => match &mut self.state {
                StageState::Sequence(game) => {
                    game.reset();
                    Ok(Vec::new())
                }
                _ => Err(self.not_allowed(name)),
            },
            Action::ChooseEmotion(emotion) => self.choose_emotion(emotion),
            Action::HitBall => self.hit_ball(),
            Action::Retry => self.retry(),
            Action::Restart => match self.state {
                StageState::Results(_) => Ok(self.advance(Trigger::Restart)),
                _ => Err(self.not_allowed(name)),
            },
        }
    }

    /// Apply the result of background work issued under `generation`.
    ///
    /// Results from an earlier generation are dropped.
    pub fn complete(&mut self, generation: Generation, completion: Completion) -> Vec<Effect> {
        if generation != self.generation {
            debug!(
                session_id = %self.id,
                issued = %generation,
                current = %self.generation,
                completion = completion_name(&completion),
                "dropping stale completion"
            );
            return Vec::new();
        }
        if self.halted {
            return Vec::new();
        }
        match completion {
            Completion::StudentResolved(result) => self.on_student(result),
            Completion::QuestionFetched(result) => self.on_question(result),
            Completion::AnswerSubmitted(result) => self.on_submitted(result),
            Completion::ScoresFetched(result) => self.on_scores(result),
            Completion::TimerTick => {
                if let StageState::Motor(motor) = &mut self.state {
                    motor.game.tick();
                }
                Vec::new()
            }
        }
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    fn login(&mut self, name: Option<String>) -> Result<Vec<Effect>, SessionError> {
        match self.state {
            StageState::LoggedOut { resolving: false } => {}
            StageState::LoggedOut { resolving: true } => return Err(SessionError::Busy),
            _ => return Err(self.not_allowed("log in")),
        }
        let name = match name {
            Some(name) if name.trim().is_empty() => return Err(SessionError::NameRequired),
            Some(name) => Some(name.trim().to_owned()),
            None => None,
        };
        self.state = StageState::LoggedOut { resolving: true };
        Ok(vec![Effect::ResolveStudent {
            generation: self.generation,
            name,
        }])
    }

    fn answer(&mut self, option_id: OptionId) -> Result<Vec<Effect>, SessionError> {
        let rejected = self.not_allowed("answer");
        let StageState::Quiz(quiz) = &mut self.state else {
            return Err(rejected);
        };
        let child_id = self.child_id.clone().ok_or(rejected)?;
        let request = quiz.begin_submit(option_id)?;
        debug!(question_id = %request.question_id, option_id = %request.option_id, "submitting answer");
        Ok(vec![Effect::SubmitAnswer {
            generation: self.generation,
            child_id,
            question_id: request.question_id,
            option_id: request.option_id,
        }])
    }

    fn check_sequence(&mut self) -> Result<Vec<Effect>, SessionError> {
        let StageState::Sequence(game) = &mut self.state else {
            return Err(self.not_allowed("check the order"));
        };
        match game.check()? {
            SequenceVerdict::Correct => {
                let mut effects = vec![Effect::Notify(Notification::success("Correct! 🎉"))];
                effects.extend(self.advance(Trigger::SequenceSolved));
                Ok(effects)
            }
            SequenceVerdict::TryAgain => Ok(vec![Effect::Notify(Notification::warning(format!(
                "Try again! Hint: {HINT}"
            )))]),
        }
    }

    fn choose_emotion(&mut self, emotion: Emotion) -> Result<Vec<Effect>, SessionError> {
        let StageState::Emotion(game) = &mut self.state else {
            return Err(self.not_allowed("choose a feeling"));
        };
        let verdict = game.choose(emotion)?;
        let level = match verdict {
            EmotionVerdict::Correct => NotificationLevel::Success,
            EmotionVerdict::Incorrect => NotificationLevel::Info,
        };
        let mut effects = vec![Effect::Notify(Notification {
            level,
            message: verdict.feedback().to_owned(),
        })];
        effects.extend(self.advance(Trigger::EmotionAnswered));
        Ok(effects)
    }

    fn hit_ball(&mut self) -> Result<Vec<Effect>, SessionError> {
        let StageState::Motor(motor) = &mut self.state else {
            return Err(self.not_allowed("catch the ball"));
        };
        match motor.game.hit()? {
            HitOutcome::Moved(_) => Ok(Vec::new()),
            HitOutcome::Finished { elapsed_seconds } => {
                info!(session_id = %self.id, elapsed_seconds, "motor game finished");
                motor.scores = ScoreRequest::InFlight;
                let mut effects = vec![
                    Effect::StopMotorTimer,
                    Effect::Notify(Notification::success(format!(
                        "Finished in {elapsed_seconds} seconds! ⚡"
                    ))),
                ];
                effects.extend(self.score_request());
                Ok(effects)
            }
        }
    }

    fn retry(&mut self) -> Result<Vec<Effect>, SessionError> {
        match &mut self.state {
            StageState::Quiz(quiz) if quiz.fetch_failed() => {
                quiz.begin_fetch()?;
                Ok(self.question_request())
            }
            StageState::Quiz(quiz) if quiz.is_busy() => Err(SessionError::Busy),
            StageState::Motor(motor) if motor.scores == ScoreRequest::Failed => {
                motor.scores = ScoreRequest::InFlight;
                Ok(self.score_request())
            }
            StageState::Motor(motor) if motor.scores == ScoreRequest::InFlight => {
                Err(SessionError::Busy)
            }
            _ => Err(SessionError::NothingToRetry),
        }
    }

    // -----------------------------------------------------------------------
    // Completions
    // -----------------------------------------------------------------------

    fn on_student(&mut self, result: Result<Student, BackendError>) -> Vec<Effect> {
        if !matches!(self.state, StageState::LoggedOut { resolving: true }) {
            debug!("ignoring login response outside a login attempt");
            return Vec::new();
        }
        match result {
            Ok(student) => {
                info!(session_id = %self.id, child_id = %student.id, "child identified");
                self.child_id = Some(student.id);
                self.advance(Trigger::IdentityResolved)
            }
            Err(err) => {
                error!(session_id = %self.id, error = %err, "login failed, halting session");
                self.state = StageState::LoggedOut { resolving: false };
                self.halted = true;
                self.last_failure = Some(Failure::IdentityResolution(err));
                vec![Effect::Notify(Notification::error("Login failed."))]
            }
        }
    }

    fn on_question(&mut self, result: Result<Option<Question>, BackendError>) -> Vec<Effect> {
        let StageState::Quiz(quiz) = &mut self.state else {
            return Vec::new();
        };
        if quiz.in_flight() != Some(&InFlight::Fetch) {
            debug!("ignoring question without a fetch in flight");
            return Vec::new();
        }
        match quiz.finish_fetch(result) {
            Ok(FetchOutcome::Question) => Vec::new(),
            Ok(FetchOutcome::Exhausted) => {
                info!(session_id = %self.id, answered = quiz.answered(), "quiz exhausted");
                let mut effects = vec![Effect::Notify(Notification::info(
                    "Quiz complete! Time for some activities.",
                ))];
                effects.extend(self.advance(Trigger::QuizExhausted));
                effects
            }
            Err(err) => {
                warn!(session_id = %self.id, error = %err, "question fetch failed");
                self.last_failure = Some(Failure::TransientNetwork(err));
                vec![Effect::Notify(Notification::error(
                    "Could not load the next question. Please try again.",
                ))]
            }
        }
    }

    fn on_submitted(&mut self, result: Result<Ack, BackendError>) -> Vec<Effect> {
        let StageState::Quiz(quiz) = &mut self.state else {
            return Vec::new();
        };
        if !matches!(quiz.in_flight(), Some(InFlight::Submit { .. })) {
            debug!("ignoring submit response without a submit in flight");
            return Vec::new();
        }
        match quiz.finish_submit(result) {
            Ok(_) => {
                if quiz.begin_fetch().is_err() {
                    return Vec::new();
                }
                self.question_request()
            }
            Err(err) => {
                warn!(session_id = %self.id, error = %err, "answer submit failed");
                self.last_failure = Some(Failure::TransientNetwork(err));
                vec![Effect::Notify(Notification::error(
                    "Could not save your answer. Please try again.",
                ))]
            }
        }
    }

    fn on_scores(&mut self, result: Result<serde_json::Value, BackendError>) -> Vec<Effect> {
        let StageState::Motor(motor) = &mut self.state else {
            return Vec::new();
        };
        if motor.scores != ScoreRequest::InFlight {
            debug!("ignoring scores without a fetch in flight");
            return Vec::new();
        }
        match result {
            Ok(raw) => {
                let entries = score::normalize(&raw, &self.fallback_labels);
                info!(session_id = %self.id, entries = entries.len(), "scores loaded");
                let effects = self.advance(Trigger::ScoresLoaded);
                if let StageState::Results(scores) = &mut self.state {
                    *scores = entries;
                }
                effects
            }
            Err(err) => {
                warn!(session_id = %self.id, error = %err, "score fetch failed");
                motor.scores = ScoreRequest::Failed;
                self.last_failure = Some(Failure::TransientNetwork(err));
                vec![Effect::Notify(Notification::error("Could not load chart."))]
            }
        }
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Leave the active stage along the edge for `trigger` and enter the
    /// next one with fresh state.
    fn advance(&mut self, trigger: Trigger) -> Vec<Effect> {
        let from = self.stage();
        let Some(to) = next_stage(from, trigger) else {
            warn!(%from, ?trigger, "no transition for trigger");
            return Vec::new();
        };

        let mut effects = Vec::new();
        if from == Stage::Motor {
            effects.push(Effect::StopMotorTimer);
        }

        self.generation = self.generation.next();
        self.last_failure = None;
        info!(session_id = %self.id, %from, %to, generation = %self.generation, "stage transition");

        self.state = match to {
            Stage::LoggedOut => StageState::LoggedOut { resolving: false },
            Stage::Quiz => StageState::Quiz(QuizController::new()),
            Stage::Sequence => StageState::Sequence(SequenceGame::new()),
            Stage::Emotion => StageState::Emotion(EmotionGame::new()),
            Stage::Motor => StageState::Motor(MotorStage {
                game: MotorGame::new(
                    self.hit_target,
                    self.spawn_range,
                    SmallRng::from_rng(&mut self.rng),
                ),
                scores: ScoreRequest::Idle,
            }),
            Stage::Results => StageState::Results(Vec::new()),
        };

        match &mut self.state {
            StageState::Quiz(quiz) => {
                if quiz.begin_fetch().is_ok() {
                    effects.extend(self.question_request());
                }
            }
            StageState::Motor(_) => effects.push(Effect::StartMotorTimer {
                generation: self.generation,
                interval: self.tick_interval,
            }),
            _ => {}
        }
        effects
    }

    fn question_request(&self) -> Vec<Effect> {
        self.child_id
            .clone()
            .map(|child_id| Effect::FetchQuestion {
                generation: self.generation,
                child_id,
            })
            .into_iter()
            .collect()
    }

    fn score_request(&self) -> Vec<Effect> {
        self.child_id
            .clone()
            .map(|child_id| Effect::FetchScores {
                generation: self.generation,
                child_id,
            })
            .into_iter()
            .collect()
    }

    const fn not_allowed(&self, action: &'static str) -> SessionError {
        SessionError::NotAllowed {
            action,
            stage: self.state.stage(),
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Session identifier.
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// When the session was created.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Active stage.
    pub const fn stage(&self) -> Stage {
        self.state.stage()
    }

    /// Generation of the active stage entry.
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// The resolved child, once logged in.
    pub const fn child_id(&self) -> Option<&ChildId> {
        self.child_id.as_ref()
    }

    /// Whether a failed login stopped the session.
    pub const fn is_halted(&self) -> bool {
        self.halted
    }

    /// The most recent backend failure in the active stage.
    pub const fn last_failure(&self) -> Option<&Failure> {
        self.last_failure.as_ref()
    }

    /// Whether a backend call issued by the active stage is outstanding.
    pub const fn is_busy(&self) -> bool {
        match &self.state {
            StageState::LoggedOut { resolving } => *resolving,
            StageState::Quiz(quiz) => quiz.is_busy(),
            StageState::Motor(motor) => matches!(motor.scores, ScoreRequest::InFlight),
            _ => false,
        }
    }

    /// The question on screen, in the quiz stage.
    pub const fn question(&self) -> Option<&Question> {
        match &self.state {
            StageState::Quiz(quiz) => quiz.current(),
            _ => None,
        }
    }

    /// Sequence cards tapped so far, in the sequence stage.
    pub fn selected_order(&self) -> &[Step] {
        match &self.state {
            StageState::Sequence(game) => game.selected_order(),
            _ => &[],
        }
    }

    /// The motor game, in the motor stage.
    pub const fn motor(&self) -> Option<&MotorGame> {
        match &self.state {
            StageState::Motor(motor) => Some(&motor.game),
            _ => None,
        }
    }

    /// The normalized profile, in the results stage.
    pub fn scores(&self) -> &[ScoreEntry] {
        match &self.state {
            StageState::Results(scores) => scores,
            _ => &[],
        }
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.id,
            created_at: self.created_at,
            stage: self.stage(),
            child_id: self.child_id.clone(),
            halted: self.halted,
            busy: self.is_busy(),
            question: self.question().cloned(),
            selected_order: self.selected_order().to_vec(),
            motor: self.motor().map(MotorGame::view),
            scores: self.scores().to_vec(),
        }
    }
}

const fn completion_name(completion: &Completion) -> &'static str {
    match completion {
        Completion::StudentResolved(_) => "student",
        Completion::QuestionFetched(_) => "question",
        Completion::AnswerSubmitted(_) => "submit",
        Completion::ScoresFetched(_) => "scores",
        Completion::TimerTick => "timer_tick",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use aadya_types::AnswerOption;
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn config() -> AssessmentConfig {
        let mut config = AssessmentConfig::default();
        config.motor.seed = Some(11);
        config
    }

    fn student(id: &str) -> Student {
        Student {
            id: ChildId::new(id),
            name: Some("Asha".to_owned()),
        }
    }

    fn question(id: &str) -> Question {
        Question {
            id: QuestionId::new(id),
            text: format!("What do you like, {id}?"),
            options: vec![AnswerOption {
                id: OptionId::new("yes"),
                text: "Yes".to_owned(),
                weight: Decimal::ONE,
            }],
        }
    }

    fn offline() -> BackendError {
        BackendError::Transport {
            message: "offline".to_owned(),
        }
    }

    fn logged_in() -> Session {
        let mut session = Session::new(&config());
        session
            .apply(Action::Login {
                name: Some("Asha".to_owned()),
            })
            .unwrap();
        let generation = session.generation();
        session.complete(generation, Completion::StudentResolved(Ok(student("c1"))));
        session
    }

    fn with_question() -> Session {
        let mut session = logged_in();
        let generation = session.generation();
        session.complete(generation, Completion::QuestionFetched(Ok(Some(question("q1")))));
        session
    }

    fn at_stage(stage: Stage) -> Session {
        let mut session = logged_in();
        if stage == Stage::Quiz {
            return session;
        }
        session.apply(Action::Skip).unwrap();
        if stage == Stage::Sequence {
            return session;
        }
        for step in crate::games::sequence::CORRECT_ORDER {
            session.apply(Action::SelectStep(step)).unwrap();
        }
        session.apply(Action::CheckSequence).unwrap();
        if stage == Stage::Emotion {
            return session;
        }
        session.apply(Action::ChooseEmotion(Emotion::Tired)).unwrap();
        assert_eq!(session.stage(), Stage::Motor);
        session
    }

    fn finish_motor(session: &mut Session) -> Vec<Effect> {
        let mut last = Vec::new();
        for _ in 0..5 {
            last = session.apply(Action::HitBall).unwrap();
        }
        last
    }

    fn notifications(effects: &[Effect]) -> Vec<&Notification> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Notify(notification) => Some(notification),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn blank_name_is_rejected_without_halting() {
        let mut session = Session::new(&config());
        let result = session.apply(Action::Login {
            name: Some("   ".to_owned()),
        });
        assert_eq!(result, Err(SessionError::NameRequired));
        assert!(!session.is_halted());
        assert!(!session.is_busy());
    }

    #[test]
    fn login_enters_quiz_and_fetches_first_question() {
        let mut session = Session::new(&config());
        let effects = session
            .apply(Action::Login {
                name: Some(" Asha ".to_owned()),
            })
            .unwrap();
        assert_eq!(
            effects,
            vec![Effect::ResolveStudent {
                generation: Generation(0),
                name: Some("Asha".to_owned()),
            }]
        );
        assert!(session.is_busy());

        let effects = session.complete(Generation(0), Completion::StudentResolved(Ok(student("c1"))));
        assert_eq!(session.stage(), Stage::Quiz);
        assert_eq!(session.child_id(), Some(&ChildId::new("c1")));
        assert_eq!(
            effects,
            vec![Effect::FetchQuestion {
                generation: Generation(1),
                child_id: ChildId::new("c1"),
            }]
        );
    }

    #[test]
    fn lookup_login_sends_no_name() {
        let mut session = Session::new(&config());
        let effects = session.apply(Action::Login { name: None }).unwrap();
        assert!(matches!(
            effects.as_slice(),
            [Effect::ResolveStudent { name: None, .. }]
        ));
    }

    #[test]
    fn second_login_while_resolving_is_busy() {
        let mut session = Session::new(&config());
        session.apply(Action::Login { name: None }).unwrap();
        assert_eq!(
            session.apply(Action::Login { name: None }),
            Err(SessionError::Busy)
        );
    }

    #[test]
    fn failed_login_halts_session() {
        let mut session = Session::new(&config());
        session.apply(Action::Login { name: None }).unwrap();
        let effects = session.complete(Generation(0), Completion::StudentResolved(Err(offline())));

        assert_eq!(session.stage(), Stage::LoggedOut);
        assert!(session.is_halted());
        assert_eq!(
            session.last_failure(),
            Some(&Failure::IdentityResolution(offline()))
        );
        assert_eq!(notifications(&effects)[0].level, NotificationLevel::Error);
        assert_eq!(
            session.apply(Action::Login {
                name: Some("Asha".to_owned())
            }),
            Err(SessionError::Halted)
        );
    }

    #[test]
    fn answer_submits_then_fetches_next() {
        let mut session = with_question();
        let effects = session
            .apply(Action::Answer {
                option_id: OptionId::new("yes"),
            })
            .unwrap();
        assert!(matches!(effects.as_slice(), [Effect::SubmitAnswer { .. }]));

        // A second answer while the first is in flight is refused.
        assert_eq!(
            session.apply(Action::Answer {
                option_id: OptionId::new("yes")
            }),
            Err(SessionError::Quiz(QuizError::Busy))
        );

        let generation = session.generation();
        let effects = session.complete(generation, Completion::AnswerSubmitted(Ok(Ack::default())));
        assert!(matches!(effects.as_slice(), [Effect::FetchQuestion { .. }]));
        assert!(session.question().is_none());
    }

    #[test]
    fn failed_submit_keeps_question_for_retry() {
        let mut session = with_question();
        session
            .apply(Action::Answer {
                option_id: OptionId::new("yes"),
            })
            .unwrap();
        let generation = session.generation();
        let effects = session.complete(generation, Completion::AnswerSubmitted(Err(offline())));

        assert_eq!(session.stage(), Stage::Quiz);
        assert_eq!(session.question().map(|q| q.id.as_str()), Some("q1"));
        assert_eq!(notifications(&effects).len(), 1);
        assert!(matches!(
            session.last_failure(),
            Some(Failure::TransientNetwork(_))
        ));
        assert!(session
            .apply(Action::Answer {
                option_id: OptionId::new("yes")
            })
            .is_ok());
    }

    #[test]
    fn failed_fetch_stays_in_quiz_until_retry() {
        let mut session = logged_in();
        let generation = session.generation();
        session.complete(generation, Completion::QuestionFetched(Err(offline())));
        assert_eq!(session.stage(), Stage::Quiz);
        assert!(!session.is_busy());

        let effects = session.apply(Action::Retry).unwrap();
        assert!(matches!(effects.as_slice(), [Effect::FetchQuestion { .. }]));
        assert_eq!(session.apply(Action::Retry), Err(SessionError::Busy));
    }

    #[test]
    fn exhausted_quiz_moves_to_sequence() {
        let mut session = logged_in();
        let generation = session.generation();
        session.complete(generation, Completion::QuestionFetched(Ok(None)));
        assert_eq!(session.stage(), Stage::Sequence);
    }

    #[test]
    fn skip_drops_late_question() {
        let mut session = logged_in();
        let quiz_generation = session.generation();
        session.apply(Action::Skip).unwrap();
        assert_eq!(session.stage(), Stage::Sequence);

        let effects = session.complete(
            quiz_generation,
            Completion::QuestionFetched(Ok(Some(question("late")))),
        );
        assert!(effects.is_empty());
        assert_eq!(session.stage(), Stage::Sequence);
        assert!(session.question().is_none());
    }

    #[test]
    fn speak_reads_current_question() {
        let mut session = with_question();
        let effects = session.apply(Action::SpeakQuestion).unwrap();
        assert_eq!(effects, vec![Effect::Speak("What do you like, q1?".to_owned())]);

        let mut session = logged_in();
        assert_eq!(
            session.apply(Action::SpeakQuestion),
            Err(SessionError::Quiz(QuizError::NoQuestion))
        );
    }

    #[test]
    fn wrong_sequence_notifies_and_clears() {
        let mut session = at_stage(Stage::Sequence);
        for step in [Step::Brush, Step::Paste, Step::Rinse, Step::Teeth] {
            session.apply(Action::SelectStep(step)).unwrap();
        }
        let effects = session.apply(Action::CheckSequence).unwrap();
        assert_eq!(session.stage(), Stage::Sequence);
        assert!(session.selected_order().is_empty());
        assert_eq!(notifications(&effects)[0].level, NotificationLevel::Warning);
    }

    #[test]
    fn reset_sequence_clears_selection() {
        let mut session = at_stage(Stage::Sequence);
        session.apply(Action::SelectStep(Step::Paste)).unwrap();
        session.apply(Action::SelectStep(Step::Paste)).unwrap();
        assert_eq!(session.selected_order(), &[Step::Paste]);
        session.apply(Action::ResetSequence).unwrap();
        assert!(session.selected_order().is_empty());
    }

    #[test]
    fn both_emotion_answers_advance() {
        for emotion in Emotion::CHOICES {
            let mut session = at_stage(Stage::Emotion);
            let effects = session.apply(Action::ChooseEmotion(emotion)).unwrap();
            assert_eq!(session.stage(), Stage::Motor);
            assert!(effects
                .iter()
                .any(|e| matches!(e, Effect::StartMotorTimer { .. })));
        }
    }

    #[test]
    fn timer_ticks_only_count_for_current_generation() {
        let mut session = at_stage(Stage::Motor);
        let generation = session.generation();
        session.complete(generation, Completion::TimerTick);
        session.complete(generation, Completion::TimerTick);
        session.complete(Generation(0), Completion::TimerTick);
        assert_eq!(session.motor().map(MotorGame::elapsed_seconds), Some(2));
    }

    #[test]
    fn fifth_hit_stops_timer_and_requests_scores() {
        let mut session = at_stage(Stage::Motor);
        for _ in 0..4 {
            assert!(session.apply(Action::HitBall).unwrap().is_empty());
        }
        let effects = session.apply(Action::HitBall).unwrap();
        assert_eq!(effects.first(), Some(&Effect::StopMotorTimer));
        assert!(effects.iter().any(|e| matches!(e, Effect::FetchScores { .. })));
        assert_eq!(session.stage(), Stage::Motor);
        assert!(session.is_busy());
        assert_eq!(
            session.apply(Action::HitBall),
            Err(SessionError::Game(GameError::AlreadyComplete))
        );
    }

    #[test]
    fn score_failure_stays_in_motor_until_retry() {
        let mut session = at_stage(Stage::Motor);
        finish_motor(&mut session);
        let generation = session.generation();

        let effects = session.complete(generation, Completion::ScoresFetched(Err(offline())));
        assert_eq!(session.stage(), Stage::Motor);
        assert_eq!(notifications(&effects)[0].message, "Could not load chart.");
        assert!(session.scores().is_empty());

        let effects = session.apply(Action::Retry).unwrap();
        assert!(matches!(effects.as_slice(), [Effect::FetchScores { .. }]));

        let effects = session.complete(
            generation,
            Completion::ScoresFetched(Ok(json!({"Logical": 40}))),
        );
        assert_eq!(session.stage(), Stage::Results);
        assert!(effects.contains(&Effect::StopMotorTimer));
        assert_eq!(session.scores().len(), 1);
    }

    #[test]
    fn restart_returns_to_quiz_keeping_child() {
        let mut session = at_stage(Stage::Motor);
        finish_motor(&mut session);
        let generation = session.generation();
        session.complete(generation, Completion::ScoresFetched(Ok(json!([]))));
        assert_eq!(session.stage(), Stage::Results);

        let effects = session.apply(Action::Restart).unwrap();
        assert_eq!(session.stage(), Stage::Quiz);
        assert_eq!(session.child_id(), Some(&ChildId::new("c1")));
        assert!(session.generation() > generation);
        assert!(matches!(effects.as_slice(), [Effect::FetchQuestion { .. }]));
        assert!(session.question().is_none());
        assert!(session.scores().is_empty());
    }

    #[test]
    fn restart_outside_results_is_rejected() {
        let mut session = at_stage(Stage::Motor);
        assert_eq!(
            session.apply(Action::Restart),
            Err(SessionError::NotAllowed {
                action: "start over",
                stage: Stage::Motor,
            })
        );
    }

    #[test]
    fn actions_for_other_stages_are_rejected() {
        let mut session = with_question();
        assert!(matches!(
            session.apply(Action::HitBall),
            Err(SessionError::NotAllowed { .. })
        ));
        assert!(matches!(
            session.apply(Action::SelectStep(Step::Paste)),
            Err(SessionError::NotAllowed { .. })
        ));
        assert_eq!(session.apply(Action::Retry), Err(SessionError::NothingToRetry));
    }

    #[test]
    fn view_reflects_active_stage_only() {
        let mut session = at_stage(Stage::Sequence);
        session.apply(Action::SelectStep(Step::Rinse)).unwrap();
        let view = session.view();
        assert_eq!(view.stage, Stage::Sequence);
        assert_eq!(view.selected_order, vec![Step::Rinse]);
        assert!(view.question.is_none());
        assert!(view.motor.is_none());
        assert!(view.scores.is_empty());
    }
}
