//! Error types for slotjson operations

use slotjson_domain::OverflowError;

/// Result type alias for slotjson operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for slotjson operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The input holds nothing but whitespace
    #[error("Empty input")]
    EmptyInput,

    /// The input ends before the value is complete
    #[error("Incomplete input")]
    IncompleteInput,

    /// The input is not valid JSON
    #[error("Invalid input at line {line}, column {column}: {message}")]
    InvalidInput {
        /// Line of the offending character, starting at 1
        line: usize,
        /// Column of the offending character, starting at 1
        column: usize,
        /// Error description
        message: String,
    },

    /// The document's memory budget was exhausted
    #[error("Not enough memory in the document")]
    NoMemory,

    /// The input nests deeper than allowed
    #[error("Nesting exceeds the limit of {limit}")]
    TooDeep {
        /// Nesting limit in force
        limit: usize,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a nesting error
    pub fn too_deep(limit: usize) -> Self {
        Self::TooDeep { limit }
    }

    /// Whether the error reports the input, as opposed to the document
    /// or the environment
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyInput | Error::IncompleteInput | Error::InvalidInput { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<OverflowError> for Error {
    fn from(_: OverflowError) -> Self {
        Error::NoMemory
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        match err.classify() {
            Category::Eof => Error::IncompleteInput,
            Category::Io => Error::Io(err.to_string()),
            Category::Syntax | Category::Data => {
                Error::invalid_input(err.line(), err.column(), strip_position(&err))
            }
        }
    }
}

/// The message of `err` without serde_json's trailing position suffix
fn strip_position(err: &serde_json::Error) -> String {
    let text = err.to_string();
    match text.rfind(" at line ") {
        Some(at) => text[..at].to_string(),
        None => text,
    }
}
