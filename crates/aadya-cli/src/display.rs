//! Terminal rendering.
//!
//! [`TerminalPresenter`] prints a screen for each stage whenever the view
//! changes. Rendering is split into pure `render_*` functions that build
//! strings, so layout can be tested without a terminal.

use std::fmt::Write as _;

use aadya_core::games::emotion::FACE;
use aadya_core::runner::Presenter;
use aadya_types::{
    Emotion, MotorView, Notification, NotificationLevel, Question, ScoreEntry, SessionView, Stage,
    Step,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tokio::sync::watch;

/// Bars in the first colour group of the chart.
const PRIMARY_BARS: usize = 4;

/// Character cells for a score of 100.
const BAR_WIDTH: u32 = 25;

const RESET: &str = "\x1b[0m";
const CYAN: &str = "\x1b[36m";
const MAGENTA: &str = "\x1b[35m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";

/// Presenter that draws the session on stdout.
pub struct TerminalPresenter {
    last: Option<SessionView>,
    question_tx: watch::Sender<Option<Question>>,
}

impl TerminalPresenter {
    /// Create a presenter that publishes the on-screen question to
    /// `question_tx` so typed answer numbers can be resolved.
    pub const fn new(question_tx: watch::Sender<Option<Question>>) -> Self {
        Self {
            last: None,
            question_tx,
        }
    }
}

impl Presenter for TerminalPresenter {
    fn on_update(&mut self, view: &SessionView) {
        if self.last.as_ref() == Some(view) {
            return;
        }
        self.question_tx.send_replace(view.question.clone());
        println!("{}", render_view(view));
        self.last = Some(view.clone());
    }

    fn notify(&mut self, notification: &Notification) {
        println!("{}", render_notification(notification));
    }

    fn speak(&mut self, text: &str) {
        println!("🔊 {text}");
    }
}

/// Render the screen for the active stage.
pub fn render_view(view: &SessionView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{DIM}── {} ──{RESET}", stage_title(view.stage));
    match view.stage {
        Stage::LoggedOut => {
            if view.halted {
                out.push_str("Login failed. Restart the program to try again.");
            } else if view.busy {
                out.push_str("Logging in...");
            } else {
                out.push_str("Type `login <name>` to start, or `login` if you have been here before.");
            }
        }
        Stage::Quiz => match &view.question {
            Some(question) => out.push_str(&render_question(question)),
            None if view.busy => out.push_str("Loading the next question..."),
            None => out.push_str("No question loaded. Type `retry` or `skip`."),
        },
        Stage::Sequence => out.push_str(&render_sequence(&view.selected_order)),
        Stage::Emotion => out.push_str(&render_emotion()),
        Stage::Motor => {
            if let Some(motor) = &view.motor {
                out.push_str(&render_motor(motor, view.busy));
            }
        }
        Stage::Results => {
            out.push_str(&render_chart(&view.scores));
            out.push_str("\nType `restart` to play again or `quit` to leave.");
        }
    }
    out
}

const fn stage_title(stage: Stage) -> &'static str {
    match stage {
        Stage::LoggedOut => "Welcome",
        Stage::Quiz => "Quiz",
        Stage::Sequence => "Activity 1: Brushing Teeth",
        Stage::Emotion => "Activity 2: How does this face feel?",
        Stage::Motor => "Activity 3: Catch the Ball",
        Stage::Results => "Your Intelligence Profile",
    }
}

fn render_question(question: &Question) -> String {
    let mut out = format!("{}\n", question.text);
    for (number, option) in question.options.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", number.saturating_add(1), option.text);
    }
    out.push_str("(type a number, `say` to hear it, or `skip`)");
    out
}

fn render_sequence(selected: &[Step]) -> String {
    let cards: Vec<&str> = Step::DISPLAY_ORDER.iter().map(|step| step.label()).collect();
    let chosen: Vec<&str> = selected.iter().map(|step| step.label()).collect();
    format!(
        "Put the steps in order.\nCards: {}\nYour order: {}\n(type a card name, then `check`; `reset` to clear)",
        cards.join("  "),
        if chosen.is_empty() {
            "-".to_owned()
        } else {
            chosen.join(" -> ")
        }
    )
}

fn render_emotion() -> String {
    let choices: Vec<String> = Emotion::CHOICES
        .iter()
        .map(|emotion| format!("{} {}", emotion.emoji(), emotion.label()))
        .collect();
    format!("        {FACE}\nChoices: {}", choices.join("   "))
}

fn render_motor(motor: &MotorView, busy: bool) -> String {
    let mut out = format!(
        "Hits: {}/{}   Time: {}s\nBall at top {}%, left {}%",
        motor.hits, motor.target, motor.elapsed_seconds, motor.ball.top, motor.ball.left
    );
    if motor.finished {
        out.push_str(if busy {
            "\nLoading your chart..."
        } else {
            "\nChart not loaded. Type `retry`."
        });
    } else {
        out.push_str("\n(type `hit` to catch it)");
    }
    out
}

/// Render the score chart. Bars are capped at 100; the first four bars
/// use one colour and the rest another.
pub fn render_chart(scores: &[ScoreEntry]) -> String {
    if scores.is_empty() {
        return "No data yet.".to_owned();
    }
    let label_width = scores
        .iter()
        .map(|entry| entry.label.chars().count())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for (index, entry) in scores.iter().enumerate() {
        let colour = if index < PRIMARY_BARS { CYAN } else { MAGENTA };
        let _ = writeln!(
            out,
            "{:<label_width$}  {colour}{}{RESET} {}",
            entry.label,
            "█".repeat(bar_cells(entry.value)),
            entry.value
        );
    }
    out.truncate(out.trim_end().len());
    out
}

/// Number of cells for a score, after clamping it to `0..=100`.
pub fn bar_cells(value: Decimal) -> usize {
    let hundred = Decimal::ONE_HUNDRED;
    let clamped = value.clamp(Decimal::ZERO, hundred);
    clamped
        .checked_mul(Decimal::from(BAR_WIDTH))
        .and_then(|scaled| scaled.checked_div(hundred))
        .and_then(|cells| cells.round().to_usize())
        .unwrap_or(0)
}

fn render_notification(notification: &Notification) -> String {
    let (colour, marker) = match notification.level {
        NotificationLevel::Info => (DIM, "•"),
        NotificationLevel::Success => (GREEN, "✔"),
        NotificationLevel::Warning => (YELLOW, "!"),
        NotificationLevel::Error => (RED, "✖"),
    };
    format!("{colour}{marker} {}{RESET}", notification.message)
}
