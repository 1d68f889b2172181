//! Adapters for the collaborators the orchestrator consumes.

pub mod extraction;
pub mod offline;
pub mod wikipedia;

pub use extraction::HttpExtractionService;
pub use wikipedia::WikipediaFetcher;
