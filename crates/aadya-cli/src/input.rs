//! Line-based command input.
//!
//! Each line typed at the prompt is parsed into a [`Command`]. Most
//! commands map one-to-one onto a session [`Action`]; answer numbers are
//! resolved against the question currently on screen.

use aadya_core::session::Action;
use aadya_types::{Emotion, OptionId, Question, Step};

use crate::error::InputError;

/// Help text printed for `help`.
pub const HELP: &str = "\
Commands:
  login [name]      register by name, or look up the known student
  1, 2, 3 ...       answer the current question
  say               read the question aloud
  skip              skip the rest of the quiz
  paste | brush | rinse | teeth
                    tap a card in the sequence game
  check | reset     check or clear the card order
  happy | frustrated | tired
                    name the feeling on the face
  hit               catch the ball
  retry             try a failed request again
  restart           start over from the results chart
  help              show this text
  quit              leave";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Log in, optionally by name.
    Login(Option<String>),
    /// Answer with the 1-based option number.
    Answer(usize),
    /// Read the question aloud.
    Say,
    /// Skip the quiz.
    Skip,
    /// Tap a sequence card.
    Step(Step),
    /// Check the sequence.
    Check,
    /// Clear the sequence.
    Reset,
    /// Choose a feeling.
    Emotion(Emotion),
    /// Catch the ball.
    Hit,
    /// Retry a failed request.
    Retry,
    /// Start over.
    Restart,
    /// Show help.
    Help,
    /// Leave the program.
    Quit,
}

impl Command {
    /// Parse one line of input.
    pub fn parse(line: &str) -> Result<Self, InputError> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));
        if word.is_empty() {
            return Err(InputError::Empty);
        }

        if let Ok(number) = word.parse::<usize>() {
            return Ok(Self::Answer(number));
        }
        if let Some(step) = Step::from_label(word) {
            return Ok(Self::Step(step));
        }
        if let Some(emotion) = Emotion::from_label(word) {
            return Ok(Self::Emotion(emotion));
        }

        let command = match word.to_ascii_lowercase().as_str() {
            "login" => Self::Login((!rest.is_empty()).then(|| rest.to_owned())),
            "say" | "speak" => Self::Say,
            "skip" => Self::Skip,
            "check" => Self::Check,
            "reset" => Self::Reset,
            "hit" | "catch" => Self::Hit,
            "retry" => Self::Retry,
            "restart" => Self::Restart,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => {
                return Err(InputError::Unknown {
                    input: word.to_owned(),
                });
            }
        };
        Ok(command)
    }

    /// The session action for this command, or `None` for commands the
    /// front end handles itself.
    pub fn into_action(self, question: Option<&Question>) -> Result<Option<Action>, InputError> {
        let action = match self {
            Self::Login(name) => Action::Login { name },
            Self::Answer(number) => Action::Answer {
                option_id: option_at(question, number)?,
            },
            Self::Say => Action::SpeakQuestion,
            Self::Skip => Action::Skip,
            Self::Step(step) => Action::SelectStep(step),
            Self::Check => Action::CheckSequence,
            Self::Reset => Action::ResetSequence,
            Self::Emotion(emotion) => Action::ChooseEmotion(emotion),
            Self::Hit => Action::HitBall,
            Self::Retry => Action::Retry,
            Self::Restart => Action::Restart,
            Self::Help | Self::Quit => return Ok(None),
        };
        Ok(Some(action))
    }
}

fn option_at(question: Option<&Question>, number: usize) -> Result<OptionId, InputError> {
    let question = question.ok_or(InputError::NoQuestion)?;
    number
        .checked_sub(1)
        .and_then(|index| question.options.get(index))
        .map(|option| option.id.clone())
        .ok_or(InputError::NoSuchOption {
            available: question.options.len(),
        })
}

#[cfg(test)]
mod tests {
    use aadya_types::{AnswerOption, QuestionId};
    use rust_decimal::Decimal;

    use super::*;

    fn question() -> Question {
        Question {
            id: QuestionId::new("q1"),
            text: "Pick one".to_owned(),
            options: vec![
                AnswerOption {
                    id: OptionId::new("first"),
                    text: "First".to_owned(),
                    weight: Decimal::ONE,
                },
                AnswerOption {
                    id: OptionId::new("second"),
                    text: "Second".to_owned(),
                    weight: Decimal::ONE,
                },
            ],
        }
    }

    #[test]
    fn login_with_and_without_name() {
        assert_eq!(Command::parse("login"), Ok(Command::Login(None)));
        assert_eq!(
            Command::parse("  login   Asha Rao "),
            Ok(Command::Login(Some("Asha Rao".to_owned())))
        );
    }

    #[test]
    fn game_words_are_case_insensitive() {
        assert_eq!(Command::parse("PASTE"), Ok(Command::Step(Step::Paste)));
        assert_eq!(Command::parse("Tired"), Ok(Command::Emotion(Emotion::Tired)));
        assert_eq!(Command::parse("Catch"), Ok(Command::Hit));
    }

    #[test]
    fn blank_and_unknown_lines_are_errors() {
        assert_eq!(Command::parse("   "), Err(InputError::Empty));
        assert_eq!(
            Command::parse("dance now"),
            Err(InputError::Unknown {
                input: "dance".to_owned()
            })
        );
    }

    #[test]
    fn answer_numbers_resolve_against_question() {
        let question = question();
        assert_eq!(
            Command::Answer(2).into_action(Some(&question)),
            Ok(Some(Action::Answer {
                option_id: OptionId::new("second")
            }))
        );
        assert_eq!(
            Command::Answer(0).into_action(Some(&question)),
            Err(InputError::NoSuchOption { available: 2 })
        );
        assert_eq!(
            Command::Answer(3).into_action(Some(&question)),
            Err(InputError::NoSuchOption { available: 2 })
        );
        assert_eq!(Command::Answer(1).into_action(None), Err(InputError::NoQuestion));
    }

    #[test]
    fn local_commands_have_no_action() {
        assert_eq!(Command::Help.into_action(None), Ok(None));
        assert_eq!(Command::Quit.into_action(None), Ok(None));
        assert_eq!(Command::Hit.into_action(None), Ok(Some(Action::HitBall)));
    }
}
