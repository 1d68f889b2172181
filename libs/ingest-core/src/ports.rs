//! Collaborators the orchestrator depends on.
//!
//! Network-backed implementations live in the backend; the simple in-memory
//! ones here are enough for preferences and credentials.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::CollaboratorError;
use crate::types::{ExtractedCard, ExtractionOptions, RawExternalContent};

/// Preference key holding the simulated-mode flag.
pub const SIMULATED_MODE_KEY: &str = "simulated_mode";

/// Fetches article text for a validated reference.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, reference: &str) -> Result<RawExternalContent, CollaboratorError>;
}

/// Turns text into question/answer pairs.
#[async_trait]
pub trait ExtractionService: Send + Sync {
    async fn extract(
        &self,
        text: &str,
        options: &ExtractionOptions,
        simulated: bool,
    ) -> Result<Vec<ExtractedCard>, CollaboratorError>;
}

/// Read-only view of persisted user preferences.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Source of the extraction service credential.
pub trait CredentialSource: Send + Sync {
    fn credential(&self) -> Option<String>;
}

/// Interpret a preference value as a boolean flag.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Preferences held in memory.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.insert(key.into(), value.into());
    }

    pub fn simulated_mode(&self) -> bool {
        self.get(SIMULATED_MODE_KEY).is_some_and(|v| is_truthy(&v))
    }

    pub fn set_simulated_mode(&self, enabled: bool) {
        self.set(SIMULATED_MODE_KEY, enabled.to_string());
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }
}

/// Credential fixed at construction, typically from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticCredential(Option<String>);

impl StaticCredential {
    pub fn new(value: Option<String>) -> Self {
        Self(value)
    }
}

impl CredentialSource for StaticCredential {
    fn credential(&self) -> Option<String> {
        self.0.clone()
    }
}
