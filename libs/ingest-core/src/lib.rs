//! Core ingestion library for flashcard generation.
//!
//! Provides:
//! - Wikipedia reference validation and title derivation
//! - Structured (JSON) and tabular (CSV/TSV) importers
//! - Exporters for both formats
//! - The ingestion orchestrator and the collaborator traits it drives
//! - Shared types (Card, Collection, etc.)

pub mod error;
pub mod export;
pub mod import;
pub mod orchestrator;
pub mod ports;
pub mod source;
pub mod types;

pub use error::{CollaboratorError, ErrorKind, ErrorReport, IngestError, Result};
pub use orchestrator::{IngestState, IngestStatus, Orchestrator, TEXT_SOURCE, TEXT_TITLE};
pub use ports::{
    CredentialSource, DocumentFetcher, ExtractionService, MemoryPreferences, PreferenceStore,
    StaticCredential, SIMULATED_MODE_KEY,
};
pub use source::{derive_title, is_valid_source, SourcePolicy};
pub use types::{Card, Collection, ExtractedCard, ExtractionOptions, ImportKind, RawExternalContent};
