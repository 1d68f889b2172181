//! Tabular (CSV/TSV) importer.
//!
//! # Format
//! ```text
//! Question,Answer
//! "What is Rust?","A systems programming language."
//! "What is Cargo?","The Rust package manager."
//! ```
//! The header decides which columns hold questions and answers: any column
//! whose name contains "question" or "answer" (case-insensitive) matches.

use std::collections::HashSet;
use std::mem::take;

use super::{clean_file_name, provenance, IdAllocator};
use crate::error::{IngestError, Result};
use crate::types::{Card, Collection};

pub const COMMA: char = ',';
pub const TAB: char = '\t';

/// Parse delimited text, picking the delimiter from the file name and header.
pub fn parse(raw: &str, file_name: &str) -> Result<Collection> {
    let header = raw.lines().find(|line| !line.trim().is_empty()).unwrap_or("");
    parse_with_delimiter(raw, file_name, detect_delimiter(file_name, header))
}

/// Parse delimited text with an explicit delimiter.
pub fn parse_with_delimiter(raw: &str, file_name: &str, delimiter: char) -> Result<Collection> {
    let lines: Vec<&str> = records(raw, delimiter)
        .into_iter()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .collect();

    if lines.len() < 2 {
        return Err(IngestError::InsufficientRows);
    }

    let columns = Columns::from_header(lines[0], delimiter)?;

    let mut ids = IdAllocator::new("imported", HashSet::new());
    let mut cards = Vec::with_capacity(lines.len() - 1);

    // Header is row 1, so data rows start at 2.
    for (idx, line) in lines.iter().enumerate().skip(1) {
        let row = idx + 1;
        let fields = split_row(line, delimiter);
        let (question, answer) = columns.extract(&fields, row)?;
        cards.push(Card {
            id: ids.next(idx),
            question,
            answer,
        });
    }

    if cards.is_empty() {
        return Err(IngestError::NoValidCards);
    }

    tracing::debug!(file = file_name, cards = cards.len(), "tabular import parsed");
    Collection::new(clean_file_name(file_name), provenance(file_name), cards)
}

/// Tab for `.tsv` files or tab-only headers, comma otherwise.
pub fn detect_delimiter(file_name: &str, header: &str) -> char {
    if file_name.to_ascii_lowercase().ends_with(".tsv") {
        return TAB;
    }
    if header.contains(TAB) && !header.contains(COMMA) {
        return TAB;
    }
    COMMA
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Columns {
    question: usize,
    answer: usize,
}

impl Columns {
    fn from_header(header: &str, delimiter: char) -> Result<Self> {
        let names: Vec<String> = split_row(header, delimiter)
            .iter()
            .map(|name| name.trim().to_lowercase().replace('"', ""))
            .collect();

        let question = names.iter().position(|name| name.contains("question"));
        let answer = names
            .iter()
            .enumerate()
            .position(|(idx, name)| Some(idx) != question && name.contains("answer"));

        match (question, answer) {
            (Some(question), Some(answer)) => Ok(Self { question, answer }),
            _ => Err(IngestError::MissingColumns),
        }
    }

    fn extract(&self, fields: &[String], row: usize) -> Result<(String, String)> {
        if fields.len() <= self.question.max(self.answer) {
            return Err(IngestError::RowTooShort { row });
        }

        let question = fields[self.question].trim();
        if question.is_empty() {
            return Err(IngestError::EmptyField {
                row,
                field: "question",
            });
        }

        let answer = fields[self.answer].trim();
        if answer.is_empty() {
            return Err(IngestError::EmptyField {
                row,
                field: "answer",
            });
        }

        Ok((question.to_string(), answer.to_string()))
    }
}

/// Split raw text into records on newlines outside quoted fields.
///
/// Quote state follows [`split_row`]: a `"` opens a quoted field only at the
/// start of a field.
fn records(raw: &str, delimiter: char) -> Vec<&str> {
    let mut records = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut field_blank = true;
    let mut chars = raw.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if matches!(chars.peek(), Some((_, '"'))) {
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if field_blank => in_quotes = true,
            '\n' if !in_quotes => {
                records.push(&raw[start..idx]);
                start = idx + 1;
                field_blank = true;
            }
            c if c == delimiter && !in_quotes => field_blank = true,
            c if !in_quotes && !c.is_whitespace() => field_blank = false,
            _ => {}
        }
    }

    if start < raw.len() {
        records.push(&raw[start..]);
    }
    records
}

/// Split one line on `delimiter`, honouring `"`-quoted fields.
///
/// Surrounding quotes are dropped and `""` inside quotes becomes `"`.
pub fn split_row(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else if field.trim().is_empty() {
                    field.clear();
                    in_quotes = true;
                } else {
                    field.push(ch);
                }
            }
            c if c == delimiter && !in_quotes => fields.push(take(&mut field)),
            _ => field.push(ch),
        }
    }

    fields.push(field);
    fields
}
