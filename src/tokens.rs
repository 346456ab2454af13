//! Row Tokens - Comma-Delimited Sub-Records
//!
//! Each record kind declares its arity. Tokens that do not match are rejected
//! with the offending text instead of being padded or truncated.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::records::{NotableFile, TimelineEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Timeline,
    NotableFile,
}

impl RecordKind {
    /// Number of fields a token of this kind must produce
    pub const fn arity(self) -> usize {
        match self {
            Self::Timeline => 2,
            Self::NotableFile => 4,
        }
    }

    /// Expected token layout, for error messages
    pub const fn format_hint(self) -> &'static str {
        match self {
            Self::Timeline => "YYYY-MM-DD HH:MM,Event description",
            Self::NotableFile => "filename,path,size,last_modified",
        }
    }

    /// Split a token the way this kind is delimited.
    ///
    /// Timeline tokens split on the first comma only so event descriptions
    /// may contain commas. Notable-file tokens split on every comma.
    fn split(self, token: &str) -> Vec<&str> {
        match self {
            Self::Timeline => token.splitn(self.arity(), ',').collect(),
            Self::NotableFile => token.split(',').collect(),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeline => f.write_str("timeline"),
            Self::NotableFile => f.write_str("notable-file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed {kind} entry {token:?}: expected {expected} comma-separated fields, found {found} (format: \"{hint}\")", hint = .kind.format_hint())]
pub struct ShapeError {
    pub kind: RecordKind,
    pub token: String,
    pub expected: usize,
    pub found: usize,
}

fn shape_error(kind: RecordKind, token: &str, found: usize) -> ShapeError {
    ShapeError {
        kind,
        token: token.to_string(),
        expected: kind.arity(),
        found,
    }
}

/// Parse `"timestamp,event"` into a timeline entry
pub fn parse_timeline_entry(token: &str) -> Result<TimelineEntry, ShapeError> {
    let kind = RecordKind::Timeline;
    match kind.split(token).as_slice() {
        [timestamp, event] => Ok(TimelineEntry::new(*timestamp, *event)),
        parts => Err(shape_error(kind, token, parts.len())),
    }
}

/// Parse `"filename,path,size,last_modified"` into a notable file
pub fn parse_notable_file(token: &str) -> Result<NotableFile, ShapeError> {
    let kind = RecordKind::NotableFile;
    match kind.split(token).as_slice() {
        [filename, path, size, last_modified] => {
            Ok(NotableFile::new(*filename, *path, *size, *last_modified))
        }
        parts => Err(shape_error(kind, token, parts.len())),
    }
}

/// Parse timeline tokens, preserving input order
pub fn parse_timeline<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<TimelineEntry>, ShapeError> {
    tokens
        .iter()
        .map(|t| parse_timeline_entry(t.as_ref()))
        .collect()
}

/// Parse notable-file tokens, preserving input order
pub fn parse_notable_files<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<NotableFile>, ShapeError> {
    tokens
        .iter()
        .map(|t| parse_notable_file(t.as_ref()))
        .collect()
}
