//! API request and response types

use serde::{Deserialize, Serialize};

// Re-export shared types from ingest-core
pub use ingest_core::{
    Card, Collection, ErrorReport, ExtractionOptions, ImportKind, IngestState, IngestStatus,
};

/// POST /api/ingest/submit body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub input: String,
    #[serde(default)]
    pub is_url_mode: bool,
    #[serde(default)]
    pub options: ExtractionOptions,
}

/// POST /api/ingest/import body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    pub file_name: String,
    pub content: String,
    /// Detected from the file extension when absent.
    #[serde(default)]
    pub kind: Option<ImportKind>,
}

/// Export format selected by the `format` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv; charset=utf-8",
            Self::Tsv => "text/tab-separated-values; charset=utf-8",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

/// Preferences as exposed over the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesResponse {
    pub simulated_mode: bool,
}

/// PUT /api/preferences body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub simulated_mode: Option<bool>,
}
