//! Error types for zpl-parser.

use std::fmt::Display;

/// Number of characters of remaining input quoted in syntax errors.
const CONTEXT_CHARS: usize = 10;

/// Errors that can occur while parsing a ZPL format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The input does not match any supported command.
    #[error("Invalid syntax: {near}...")]
    InvalidSyntax {
        /// The first characters of the input where parsing stopped
        near: String,
    },

    /// The parser ran out of input.
    #[error("Incomplete input: {needed}")]
    Incomplete {
        /// How much more input was needed, if known
        needed: String,
    },

    /// A mandatory framing command is missing.
    #[error("Missing command: {command}")]
    MissingCommand {
        /// The command that was expected (`^XA` or `^XZ`)
        command: &'static str,
    },
}

/// Convenience `Result` type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParseError>;

impl ParseError {
    /// Creates a syntax error quoting the start of `input`.
    pub fn invalid_syntax(input: &str) -> Self {
        ParseError::InvalidSyntax {
            near: input.chars().take(CONTEXT_CHARS).collect(),
        }
    }

    /// Creates a missing-command error.
    pub fn missing(command: &'static str) -> Self {
        ParseError::MissingCommand { command }
    }
}

impl<T: Display> From<nom::Err<nom::error::Error<T>>> for ParseError {
    fn from(value: nom::Err<nom::error::Error<T>>) -> Self {
        match value {
            nom::Err::Incomplete(needed) => {
                let needed = match needed {
                    nom::Needed::Unknown => "unknown".to_string(),
                    nom::Needed::Size(size) => size.to_string(),
                };
                ParseError::Incomplete { needed }
            }
            nom::Err::Error(err) | nom::Err::Failure(err) => {
                ParseError::invalid_syntax(&err.input.to_string())
            }
        }
    }
}
