//! Custom error types for the emulator.
//!
//! Two layers of errors exist:
//!
//! - **`EmulatorError`** is the application error. It covers configuration loading,
//!   socket I/O, tracing setup and the one fatal protocol condition: constructing an
//!   engine for a model identifier that is not supported. These propagate to the
//!   caller (usually `main`) with `?`.
//! - **`CommandError`** describes why a single command line was rejected. It never
//!   crosses the engine boundary; the dispatcher logs it and answers with an empty
//!   reply, which is the only failure signal the wire protocol has.
//!
//! `NumericError` is raised by the string arithmetic helpers and folds into
//! `CommandError` via `#[from]`.

use thiserror::Error;

/// Convenience alias for results using the application error type.
pub type AppResult<T> = std::result::Result<T, EmulatorError>;

#[derive(Error, Debug)]
pub enum EmulatorError {
    #[error("Unknown instrument model '{0}'")]
    UnknownModel(String),

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("Configuration validation error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tracing initialization error: {0}")]
    Tracing(String),
}

/// Reasons a command line produced no reply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("missing parameter in '{0}'")]
    MissingParameter(String),

    #[error("unknown sub-command '{sub}' in '{command}'")]
    UnknownSubCommand { sub: String, command: String },

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    #[error(transparent)]
    InvalidNumber(#[from] NumericError),

    #[error("invalid channel token '{0}'")]
    InvalidChannel(String),

    #[error("command '{0}' is not addressed to this channel")]
    WrongChannel(String),

    #[error("unsupported command form '{0}'")]
    UnsupportedForm(String),
}

/// Failure of the string arithmetic helpers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumericError {
    #[error("'{0}' is not a number")]
    NotANumber(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_error_converts_to_command_error() {
        let err: CommandError = NumericError::NotANumber("abc".into()).into();
        assert_eq!(err.to_string(), "'abc' is not a number");
    }

    #[test]
    fn unknown_model_message_names_the_model() {
        let err = EmulatorError::UnknownModel("ABC1000".into());
        assert!(err.to_string().contains("ABC1000"));
    }
}
