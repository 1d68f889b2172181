//! Structured (JSON) importer.
//!
//! # Format
//! ```json
//! {
//!   "title": "Rust",
//!   "source": "https://en.wikipedia.org/wiki/Rust",
//!   "cards": [
//!     { "id": "1", "question": "What is Rust?", "answer": "A language." }
//!   ]
//! }
//! ```
//! A bare array of card records is accepted as well.

use serde_json::{Map, Value};
use std::collections::HashSet;

use super::{clean_file_name, provenance, IdAllocator};
use crate::error::{IngestError, Result};
use crate::types::{Card, Collection};

/// Parse and validate a structured export into a collection.
pub fn parse(raw: &str, file_name: &str) -> Result<Collection> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| IngestError::MalformedFile(e.to_string()))?;

    let document = Document::from_value(value)?;
    let records = document
        .records
        .iter()
        .enumerate()
        .map(|(idx, record)| RawRecord::from_value(record, idx + 1))
        .collect::<Result<Vec<_>>>()?;

    if records.is_empty() {
        return Err(IngestError::NoValidCards);
    }

    let cards = assign_ids(records)?;

    let title = document.title.unwrap_or_else(|| clean_file_name(file_name));
    let source = document.source.unwrap_or_else(|| provenance(file_name));

    tracing::debug!(file = file_name, cards = cards.len(), "structured import parsed");
    Collection::new(title, source, cards)
}

/// Top-level shape after the first validation step.
struct Document {
    title: Option<String>,
    source: Option<String>,
    records: Vec<Value>,
}

impl Document {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(records) => Ok(Self {
                title: None,
                source: None,
                records,
            }),
            Value::Object(mut object) => {
                let records = match object.remove("cards") {
                    Some(Value::Array(records)) => records,
                    _ => return Err(IngestError::InvalidStructure),
                };
                Ok(Self {
                    title: text_field(&object, "title"),
                    source: text_field(&object, "source"),
                    records,
                })
            }
            _ => Err(IngestError::InvalidStructure),
        }
    }
}

/// A record that passed field validation but has no final id yet.
#[derive(Debug)]
struct RawRecord {
    id: Option<String>,
    question: String,
    answer: String,
    position: usize,
}

impl RawRecord {
    fn from_value(value: &Value, position: usize) -> Result<Self> {
        let Some(object) = value.as_object() else {
            return Err(IngestError::MissingField {
                position,
                field: "question",
            });
        };

        let question = text_field(object, "question").ok_or(IngestError::MissingField {
            position,
            field: "question",
        })?;
        let answer = text_field(object, "answer").ok_or(IngestError::MissingField {
            position,
            field: "answer",
        })?;

        Ok(Self {
            id: text_field(object, "id"),
            question,
            answer,
            position,
        })
    }
}

fn assign_ids(records: Vec<RawRecord>) -> Result<Vec<Card>> {
    let mut explicit = HashSet::new();
    for record in &records {
        if let Some(id) = &record.id {
            if !explicit.insert(id.clone()) {
                return Err(IngestError::DuplicateId {
                    id: id.clone(),
                    position: record.position,
                });
            }
        }
    }

    let mut ids = IdAllocator::new("imported", explicit);
    Ok(records
        .into_iter()
        .map(|record| Card {
            id: record.id.unwrap_or_else(|| ids.next(record.position)),
            question: record.question,
            answer: record.answer,
        })
        .collect())
}

/// Scalar field coerced to trimmed text; blanks count as absent.
fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    let text = match object.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
