pub mod ingest;
pub mod preferences;
