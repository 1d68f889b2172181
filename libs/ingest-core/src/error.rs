//! Error types for ingest-core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using IngestError.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Broad class of an ingestion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Rejected before any suspension point.
    Precondition,
    /// The document fetcher or extraction service failed.
    Collaborator,
    /// The imported file could not be parsed or validated.
    Import,
    /// Anything else.
    Internal,
}

/// Errors that can end an ingestion attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("Please enter a Wikipedia URL or some text")]
    EmptyInput,

    #[error("Extraction API key is not configured")]
    MissingCredential,

    #[error("Please enter a valid Wikipedia article URL: {reference}")]
    InvalidSource { reference: String },

    #[error("Another ingestion is already in progress")]
    Busy,

    #[error("Failed to fetch article: {0}")]
    Fetch(String),

    #[error("Failed to generate flashcards: {0}")]
    Extraction(String),

    #[error("Failed to read file: {0}")]
    Read(String),

    #[error("Invalid JSON file: {0}")]
    MalformedFile(String),

    #[error("Invalid file structure: expected an array of flashcards or an object with a \"cards\" array")]
    InvalidStructure,

    #[error("Flashcard {position} is missing the \"{field}\" field")]
    MissingField { position: usize, field: &'static str },

    #[error("Flashcard {position} reuses id {id}")]
    DuplicateId { id: String, position: usize },

    #[error("File must contain columns with \"question\" and \"answer\" in the header")]
    MissingColumns,

    #[error("File must contain a header row and at least one flashcard row")]
    InsufficientRows,

    #[error("Row {row} has fewer columns than the header requires")]
    RowTooShort { row: usize },

    #[error("Row {row} has an empty {field}")]
    EmptyField { row: usize, field: &'static str },

    #[error("No valid flashcards found")]
    NoValidCards,

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl IngestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyInput | Self::MissingCredential | Self::InvalidSource { .. } | Self::Busy => {
                ErrorKind::Precondition
            }
            Self::Fetch(_) | Self::Extraction(_) => ErrorKind::Collaborator,
            Self::Read(_)
            | Self::MalformedFile(_)
            | Self::InvalidStructure
            | Self::MissingField { .. }
            | Self::DuplicateId { .. }
            | Self::MissingColumns
            | Self::InsufficientRows
            | Self::RowTooShort { .. }
            | Self::EmptyField { .. }
            | Self::NoValidCards => ErrorKind::Import,
            Self::Unexpected(_) => ErrorKind::Internal,
        }
    }

    /// Record index or row number the error points at, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::MissingField { position, .. } | Self::DuplicateId { position, .. } => {
                Some(*position)
            }
            Self::RowTooShort { row } | Self::EmptyField { row, .. } => Some(*row),
            _ => None,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
            position: self.position(),
        }
    }
}

/// Serializable form of an error for status snapshots and API bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

/// Failure reported by an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CollaboratorError(pub String);

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collaborator_messages_keep_prefix_and_cause() {
        let fetch = IngestError::Fetch("timeout".into());
        let extract = IngestError::Extraction("rate limited".into());
        assert_eq!(fetch.to_string(), "Failed to fetch article: timeout");
        assert_eq!(extract.to_string(), "Failed to generate flashcards: rate limited");
        assert_eq!(fetch.kind(), ErrorKind::Collaborator);
    }

    #[test]
    fn positions_are_exposed() {
        let err = IngestError::MissingField { position: 3, field: "answer" };
        assert_eq!(err.position(), Some(3));
        assert_eq!(err.to_string(), "Flashcard 3 is missing the \"answer\" field");

        let err = IngestError::RowTooShort { row: 4 };
        assert_eq!(err.report().position, Some(4));
        assert_eq!(err.kind(), ErrorKind::Import);
    }

    #[test]
    fn preconditions_have_no_position() {
        assert_eq!(IngestError::MissingCredential.position(), None);
        assert_eq!(IngestError::MissingCredential.kind(), ErrorKind::Precondition);
        assert_eq!(IngestError::Busy.kind(), ErrorKind::Precondition);
    }
}
