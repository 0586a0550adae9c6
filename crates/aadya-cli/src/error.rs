//! Error types for the terminal front end.

/// Top-level error for the `aadya` binary.
///
/// Wraps every startup failure so `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: aadya_core::config::ConfigError,
    },

    /// The HTTP backend could not be created.
    #[error("client error: {source}")]
    Client {
        /// The underlying client error.
        #[from]
        source: aadya_client::ClientError,
    },
}

/// Errors for a single line of user input. Reported and then ignored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// The line was blank.
    #[error("type a command, or `help`")]
    Empty,

    /// The first word is not a command.
    #[error("unknown command `{input}`; type `help`")]
    Unknown {
        /// What was typed.
        input: String,
    },

    /// An answer number was given with no question on screen.
    #[error("there is no question to answer yet")]
    NoQuestion,

    /// The answer number is out of range.
    #[error("pick an answer between 1 and {available}")]
    NoSuchOption {
        /// Options on screen.
        available: usize,
    },
}
