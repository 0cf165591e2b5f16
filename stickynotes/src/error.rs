//! Unified error handling for the stickynotes library
//!
//! Every failure in the note board is local: the worst outcome of any single
//! error is a user-visible notice or a no-op. [`NotesError::is_user_notice`]
//! separates the notices (missing selection, nothing to delete) from real
//! failures so front-ends can render them differently.

use std::fmt;
use std::io;
use thiserror::Error;

/// The main error type for the stickynotes library
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NotesError {
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A style control was used while no note is selected
    #[error("Please select a note to apply this style.")]
    NoSelection,

    /// Delete-all was requested on an empty board
    #[error("No notes to delete!")]
    EmptyCollection,

    /// The referenced note does not exist
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    /// A note id could not be parsed
    #[error("Invalid note ID: {0}")]
    InvalidNoteId(String),

    /// A color value was rejected
    #[error("Invalid color '{value}': {reason}")]
    InvalidColor {
        /// The rejected input
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Persisted notes could not be read back
    #[error("Failed to read persisted notes: {0}")]
    PersistenceRead(String),

    /// Persisting the collection failed; the in-memory change is not durable
    #[error("Failed to persist notes: {0}")]
    PersistenceWrite(String),

    /// The summarization service failed
    #[error("Summarization failed: {0}")]
    Summarization(#[from] SummarizationError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),

    /// Generic error with context
    #[error("{message}")]
    Context {
        /// Description of what was being attempted
        message: String,
        /// The underlying failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl NotesError {
    /// Create an invalid note id error
    pub fn invalid_note_id(id: &str) -> Self {
        Self::InvalidNoteId(id.to_string())
    }

    /// Create an invalid color error
    pub fn invalid_color(value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidColor {
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// True for errors that are shown to the user as a prompt or notice
    /// rather than reported as a failure.
    pub fn is_user_notice(&self) -> bool {
        matches!(self, Self::NoSelection | Self::EmptyCollection)
    }
}

/// Failures of the external summarization service
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummarizationError {
    /// The request never produced a response
    #[error("request failed: {0}")]
    Network(String),

    /// The service answered with a non-success status
    #[error("service returned HTTP {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// The response body did not carry a summary
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Result type alias for stickynotes operations
pub type Result<T> = std::result::Result<T, NotesError>;

/// Extension trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context<S: Into<String>>(self, msg: S) -> Result<T>;

    /// Add context with a closure that's only called on error
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<S: Into<String>>(self, msg: S) -> Result<T> {
        self.map_err(|e| NotesError::Context {
            message: msg.into(),
            source: Box::new(e),
        })
    }

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| NotesError::Context {
            message: f().into(),
            source: Box::new(e),
        })
    }
}

/// Error chain formatter for detailed error reporting
pub struct ErrorChain<'a>(&'a dyn std::error::Error);

impl<'a> fmt::Display for ErrorChain<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Error: {}", self.0)?;

        let mut current = self.0.source();
        let mut level = 1;

        while let Some(err) = current {
            writeln!(f, "{:indent$}Caused by: {}", "", err, indent = level * 2)?;
            current = err.source();
            level += 1;
        }

        Ok(())
    }
}

/// Extension trait for error types to format the full error chain
pub trait ErrorChainExt {
    /// Format the full error chain
    fn error_chain(&self) -> ErrorChain<'_>;
}

impl<E: std::error::Error> ErrorChainExt for E {
    fn error_chain(&self) -> ErrorChain<'_> {
        ErrorChain(self)
    }
}
