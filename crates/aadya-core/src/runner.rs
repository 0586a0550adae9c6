//! Async session runner.
//!
//! [`run_session`] owns a [`Session`] and drives it from two sources: user
//! actions arriving on a channel, and completions produced by the work the
//! session asked for. Backend calls run as spawned tasks so input keeps
//! flowing while they are outstanding; every result is sent back tagged
//! with the generation that issued it. At most one motor timer exists, and
//! it is stopped whenever the session says so.
//!
//! Rendering is delegated to a [`Presenter`]. It receives a fresh
//! [`SessionView`] after every input, plus notifications and speech.

use std::sync::Arc;

use aadya_types::{ChildId, Notification, SessionId, SessionView, Stage};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::backend::AssessmentBackend;
use crate::session::{Action, Completion, Effect, Generation, Session};
use crate::timer::{MotorTimer, Tagged};

/// Buffer size of the internal completion channel.
const COMPLETION_BUFFER: usize = 32;

/// Receives session output for display.
pub trait Presenter: Send {
    /// Called after every action or completion with the current state.
    fn on_update(&mut self, view: &SessionView);

    /// Show a message to the child.
    fn notify(&mut self, notification: &Notification);

    /// Read text aloud. Front ends without speech ignore it.
    fn speak(&mut self, _text: &str) {}
}

/// A presenter that discards everything.
pub struct NoOpPresenter;

impl Presenter for NoOpPresenter {
    fn on_update(&mut self, _view: &SessionView) {}

    fn notify(&mut self, _notification: &Notification) {}
}

/// Why the runner stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The action channel closed (the front end quit).
    InputClosed,
    /// Login failed and the session halted.
    Halted,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    /// The session that ran.
    pub session_id: SessionId,
    /// Why the run ended.
    pub end_reason: EndReason,
    /// Stage active at the end.
    pub final_stage: Stage,
    /// The resolved child, if login succeeded.
    pub child_id: Option<ChildId>,
    /// Actions the session accepted.
    pub actions_applied: u64,
    /// Actions the session rejected.
    pub actions_rejected: u64,
}

/// Run `session` until the action channel closes or the session halts.
pub async fn run_session<B: AssessmentBackend>(
    mut session: Session,
    backend: Arc<B>,
    mut actions: mpsc::Receiver<Action>,
    presenter: &mut dyn Presenter,
) -> SessionSummary {
    let (tx, mut completions) = mpsc::channel::<Tagged>(COMPLETION_BUFFER);
    let mut executor = Executor {
        backend,
        tx,
        timer: None,
    };
    let mut actions_applied: u64 = 0;
    let mut actions_rejected: u64 = 0;

    info!(session_id = %session.id(), "session runner starting");
    presenter.on_update(&session.view());

    let end_reason = loop {
        tokio::select! {
            action = actions.recv() => {
                let Some(action) = action else {
                    break EndReason::InputClosed;
                };
                let name = action.name();
                match session.apply(action) {
                    Ok(effects) => {
                        actions_applied = actions_applied.saturating_add(1);
                        executor.run(effects, presenter);
                    }
                    Err(err) => {
                        actions_rejected = actions_rejected.saturating_add(1);
                        warn!(action = name, stage = %session.stage(), error = %err, "action rejected");
                        presenter.notify(&Notification::warning(err.to_string()));
                    }
                }
            }
            Some((generation, completion)) = completions.recv() => {
                let effects = session.complete(generation, completion);
                executor.run(effects, presenter);
            }
        }

        presenter.on_update(&session.view());
        if session.is_halted() {
            break EndReason::Halted;
        }
    };

    executor.stop_timer();
    let summary = SessionSummary {
        session_id: session.id(),
        end_reason,
        final_stage: session.stage(),
        child_id: session.child_id().cloned(),
        actions_applied,
        actions_rejected,
    };
    info!(
        session_id = %summary.session_id,
        end_reason = ?summary.end_reason,
        final_stage = %summary.final_stage,
        actions_applied,
        actions_rejected,
        "session runner finished"
    );
    summary
}

/// Carries out effects on behalf of the runner.
struct Executor<B> {
    backend: Arc<B>,
    tx: mpsc::Sender<Tagged>,
    timer: Option<MotorTimer>,
}

impl<B: AssessmentBackend> Executor<B> {
    fn run(&mut self, effects: Vec<Effect>, presenter: &mut dyn Presenter) {
        for effect in effects {
            match effect {
                Effect::ResolveStudent { generation, name } => {
                    self.spawn(generation, |backend| async move {
                        Completion::StudentResolved(
                            backend.resolve_or_create_student(name.as_deref()).await,
                        )
                    });
                }
                Effect::FetchQuestion {
                    generation,
                    child_id,
                } => {
                    self.spawn(generation, |backend| async move {
                        Completion::QuestionFetched(backend.fetch_next_question(&child_id).await)
                    });
                }
                Effect::SubmitAnswer {
                    generation,
                    child_id,
                    question_id,
                    option_id,
                } => {
                    self.spawn(generation, |backend| async move {
                        Completion::AnswerSubmitted(
                            backend
                                .submit_answer(&child_id, &question_id, &option_id)
                                .await,
                        )
                    });
                }
                Effect::FetchScores {
                    generation,
                    child_id,
                } => {
                    self.spawn(generation, |backend| async move {
                        Completion::ScoresFetched(backend.fetch_scores(&child_id).await)
                    });
                }
                Effect::StartMotorTimer {
                    generation,
                    interval,
                } => {
                    self.stop_timer();
                    self.timer = Some(MotorTimer::start(generation, interval, self.tx.clone()));
                }
                Effect::StopMotorTimer => self.stop_timer(),
                Effect::Notify(notification) => presenter.notify(&notification),
                Effect::Speak(text) => presenter.speak(&text),
            }
        }
    }

    /// Run a backend call as its own task and report the result.
    fn spawn<F, Fut>(&self, generation: Generation, call: F)
    where
        F: FnOnce(Arc<B>) -> Fut,
        Fut: Future<Output = Completion> + Send + 'static,
    {
        let tx = self.tx.clone();
        let fut = call(Arc::clone(&self.backend));
        tokio::spawn(async move {
            let completion = fut.await;
            if tx.send((generation, completion)).await.is_err() {
                debug!(%generation, "runner gone, dropping completion");
            }
        });
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use aadya_types::{Ack, OptionId, Question, QuestionId, Student};

    use super::*;
    use crate::backend::BackendError;
    use crate::config::AssessmentConfig;

    /// Backend whose every call fails.
    struct Offline;

    fn offline() -> BackendError {
        BackendError::Transport {
            message: "offline".to_owned(),
        }
    }

    impl AssessmentBackend for Offline {
        async fn resolve_or_create_student(&self, _name: Option<&str>) -> Result<Student, BackendError> {
            Err(offline())
        }

        async fn fetch_next_question(&self, _child_id: &ChildId) -> Result<Option<Question>, BackendError> {
            Err(offline())
        }

        async fn submit_answer(
            &self,
            _child_id: &ChildId,
            _question_id: &QuestionId,
            _option_id: &OptionId,
        ) -> Result<Ack, BackendError> {
            Err(offline())
        }

        async fn fetch_scores(&self, _child_id: &ChildId) -> Result<serde_json::Value, BackendError> {
            Err(offline())
        }
    }

    #[derive(Default)]
    struct Recorder {
        updates: usize,
        notifications: Vec<Notification>,
    }

    impl Presenter for Recorder {
        fn on_update(&mut self, _view: &SessionView) {
            self.updates = self.updates.saturating_add(1);
        }

        fn notify(&mut self, notification: &Notification) {
            self.notifications.push(notification.clone());
        }
    }

    #[tokio::test]
    async fn closed_input_ends_run() {
        let (tx, rx) = mpsc::channel(1);
        drop(tx);
        let session = Session::new(&AssessmentConfig::default());
        let summary = run_session(session, Arc::new(Offline), rx, &mut NoOpPresenter).await;

        assert_eq!(summary.end_reason, EndReason::InputClosed);
        assert_eq!(summary.final_stage, Stage::LoggedOut);
        assert_eq!(summary.actions_applied, 0);
    }

    #[tokio::test]
    async fn failed_login_halts_run() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(Action::Login { name: None }).await.unwrap();
        let session = Session::new(&AssessmentConfig::default());
        let mut recorder = Recorder::default();
        let summary = run_session(session, Arc::new(Offline), rx, &mut recorder).await;

        assert_eq!(summary.end_reason, EndReason::Halted);
        assert_eq!(summary.child_id, None);
        assert_eq!(recorder.notifications.len(), 1);
        assert_eq!(recorder.notifications[0].message, "Login failed.");
        assert!(recorder.updates >= 3);
    }

    #[tokio::test]
    async fn rejected_action_is_reported_as_warning() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(Action::HitBall).await.unwrap();
        drop(tx);
        let session = Session::new(&AssessmentConfig::default());
        let mut recorder = Recorder::default();
        let summary = run_session(session, Arc::new(Offline), rx, &mut recorder).await;

        assert_eq!(summary.actions_rejected, 1);
        assert_eq!(
            recorder.notifications[0].level,
            aadya_types::NotificationLevel::Warning
        );
    }
}
