//! File importers.
//!
//! Two formats are accepted:
//! - structured: JSON, either a bare array of `{id?, question, answer}`
//!   records or an object `{title?, source?, cards: [...]}`
//! - tabular: delimiter-separated text whose header names a question and an
//!   answer column

pub mod structured;
pub mod tabular;

use std::collections::HashSet;

use crate::error::Result;
use crate::types::{Collection, ImportKind};

/// Title used when the file name has nothing usable in it.
pub const FALLBACK_IMPORT_TITLE: &str = "Imported Flashcards";

/// Parse `raw` with the importer matching `kind`.
pub fn parse(kind: ImportKind, raw: &str, file_name: &str) -> Result<Collection> {
    match kind {
        ImportKind::Structured => structured::parse(raw, file_name),
        ImportKind::Tabular => tabular::parse(raw, file_name),
    }
}

/// Display title derived from a file name.
///
/// `notes/rust_basics-v2.json` becomes `rust basics v2`.
pub fn clean_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);

    let stem = match base.rfind('.') {
        Some(idx) if idx > 0 => &base[..idx],
        _ => base,
    };

    let cleaned = stem
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if cleaned.is_empty() {
        FALLBACK_IMPORT_TITLE.to_string()
    } else {
        cleaned
    }
}

/// Provenance string recorded as the source of an imported collection.
pub fn provenance(file_name: &str) -> String {
    format!("Imported from {}", file_name.trim())
}

/// Hands out `<prefix>-<n>` ids that never collide with reserved ones.
pub(crate) struct IdAllocator {
    taken: HashSet<String>,
    prefix: &'static str,
}

impl IdAllocator {
    pub(crate) fn new(prefix: &'static str, reserved: HashSet<String>) -> Self {
        Self {
            taken: reserved,
            prefix,
        }
    }

    pub(crate) fn next(&mut self, position: usize) -> String {
        let base = format!("{}-{}", self.prefix, position);
        let mut candidate = base.clone();
        let mut suffix = 2;
        while self.taken.contains(&candidate) {
            candidate = format!("{}-{}", base, suffix);
            suffix += 1;
        }
        self.taken.insert(candidate.clone());
        candidate
    }
}
