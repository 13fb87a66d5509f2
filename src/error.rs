//! Error types for parsing and composing.
//!
//! Every error raised while reading a document carries the [`Position`] at
//! which it was detected, rendered as `line L, column C (index I)`.
//!
//! ## Error Categories
//!
//! - **Input errors**: the source ended early or could not be read
//! - **Dispatch errors**: no factory is registered for a lead character
//! - **Grammar errors**: a factory found its own syntax violated
//! - **Binding errors**: undefined references and duplicate anchor names
//! - **Conversion errors**: a value was read as the wrong variant
//!
//! ## Examples
//!
//! ```rust
//! use sigil_format::{parse_str, Error};
//!
//! let err = parse_str("#missing").unwrap_err();
//! assert!(matches!(err, Error::UndefinedReference { .. }));
//! assert!(err.to_string().contains("line 1, column"));
//! ```

use crate::reader::Position;
use std::fmt;
use std::io;
use thiserror::Error;

/// Represents every failure the reader, parser and composer can report.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error while pulling characters from the source
    #[error("IO error: {0}")]
    Io(String),

    /// The source ran out where a character was required
    #[error("Unexpected end of input at {position}: expected {expected}")]
    UnexpectedEndOfInput { position: Position, expected: String },

    /// No factory is registered for the lead character of a value
    #[error("No factory registered for sign {sign:?} at {position}")]
    NoFactoryForSign { sign: char, position: Position },

    /// A factory's grammar was violated between `start` and `end`
    #[error("Malformed value between {start} and {end}: {message}")]
    MalformedValue {
        message: String,
        start: Position,
        end: Position,
        #[source]
        source: Option<Box<Error>>,
    },

    /// A `#name` reference to a name no earlier value was bound to
    #[error("Undefined reference '#{name}' at {position}")]
    UndefinedReference { name: String, position: Position },

    /// An `@name` binding for a name that is already bound
    #[error("Duplicate anchor name '@{name}' at {position}")]
    DuplicateAnchorName { name: String, position: Position },

    /// Two distinct values carry the same anchor name, so the composed
    /// text could not be read back
    #[error("Anchor name '@{name}' is carried by more than one value")]
    ConflictingAnchor { name: String },

    /// A value was requested but the stream holds no more values
    #[error("End of input at {position}: no more values")]
    EndOfInput { position: Position },

    /// A value was read as a variant it is not
    #[error("Conversion error: expected {expected}, found {found}")]
    Conversion { expected: String, found: String },

    /// A composite tag, member name or anchor name is not an identifier
    #[error("Invalid identifier {name:?}: names must match [A-Za-z0-9_]+")]
    InvalidIdentifier { name: String },

    /// A Rust type that has no representation in the format
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error raised through serde
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an end-of-input error describing what was expected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sigil_format::{Error, Position};
    ///
    /// let err = Error::unexpected_end(Position::default(), "closing quote");
    /// assert!(err.to_string().contains("closing quote"));
    /// ```
    pub fn unexpected_end(position: Position, expected: &str) -> Self {
        Error::UnexpectedEndOfInput {
            position,
            expected: expected.to_string(),
        }
    }

    /// Creates a grammar error spanning `start..end`.
    pub fn malformed(start: Position, end: Position, message: impl Into<String>) -> Self {
        Error::MalformedValue {
            message: message.into(),
            start,
            end,
            source: None,
        }
    }

    /// Creates a grammar error that wraps the nested failure which caused it.
    pub fn malformed_caused_by(
        start: Position,
        end: Position,
        message: impl Into<String>,
        cause: Error,
    ) -> Self {
        Error::MalformedValue {
            message: message.into(),
            start,
            end,
            source: Some(Box::new(cause)),
        }
    }

    /// Creates a conversion error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sigil_format::Error;
    ///
    /// let err = Error::conversion("text", "Numeric");
    /// assert!(err.to_string().contains("expected text"));
    /// ```
    pub fn conversion(expected: &str, found: impl fmt::Display) -> Self {
        Error::Conversion {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an invalid identifier error.
    pub fn invalid_identifier(name: &str) -> Self {
        Error::InvalidIdentifier {
            name: name.to_string(),
        }
    }

    /// Creates an unsupported type error for Rust types with no textual form.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns the position at which the error was detected, if it has one.
    ///
    /// Grammar errors report where the offending value started.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::UnexpectedEndOfInput { position, .. }
            | Error::NoFactoryForSign { position, .. }
            | Error::UndefinedReference { position, .. }
            | Error::DuplicateAnchorName { position, .. }
            | Error::EndOfInput { position } => Some(*position),
            Error::MalformedValue { start, .. } => Some(*start),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
