//! Core types for the ingestion pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{IngestError, Result};

/// One question/answer unit with a stable identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub question: String,
    pub answer: String,
}

/// Normalized result of one ingestion attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub title: String,
    pub source: String,
    pub cards: Vec<Card>,
    pub created_at: DateTime<Utc>,
}

impl Collection {
    /// Build a collection stamped with the current time.
    ///
    /// An accepted collection always carries at least one card.
    pub fn new(title: String, source: String, cards: Vec<Card>) -> Result<Self> {
        if cards.is_empty() {
            return Err(IngestError::NoValidCards);
        }

        Ok(Self {
            title,
            source,
            cards,
            created_at: Utc::now(),
        })
    }

    /// Compare everything except the timestamp.
    pub fn same_content(&self, other: &Collection) -> bool {
        self.title == other.title && self.source == other.source && self.cards == other.cards
    }
}

/// Article text returned by the document fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExternalContent {
    pub title: String,
    pub content: String,
}

/// Question/answer pair as produced by the extraction service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub question: String,
    pub answer: String,
}

impl ExtractedCard {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: None,
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Optional knobs forwarded to the extraction service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cards: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
}

/// Declared kind of an imported file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    Structured,
    Tabular,
}

impl ImportKind {
    /// Detect the kind from a file extension.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())?
            .to_ascii_lowercase();

        match ext.as_str() {
            "json" => Some(Self::Structured),
            "csv" | "tsv" | "txt" => Some(Self::Tabular),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::Tabular => "tabular",
        }
    }
}
