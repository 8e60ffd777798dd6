//! Core types for the BIDS report library
//!
//! This module defines the error type and the participant-level values that
//! flow from the metadata loader into the text formatter. Unknown values are
//! `None` here; the BIDS `"n/a"` sentinel only exists at the parsing and
//! rendering boundaries.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Marker BIDS uses for "value not recorded"
pub const NA: &str = "n/a";

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while loading metadata or building a report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Dataset root is not a directory: {0:?}")]
    NotADirectory(PathBuf),

    #[error("Failed to parse JSON file {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing column '{column}' in {path:?}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Malformed TSV file {path:?} at line {line}: {reason}")]
    MalformedTsv {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Missing required field '{field}' in {path:?}")]
    MissingField { path: PathBuf, field: String },

    #[error("Invalid value '{value}' for '{field}' in {path:?}")]
    InvalidValue {
        path: PathBuf,
        field: String,
        value: String,
    },

    #[error("No {suffix} sidecar found for recording {recording}")]
    SidecarNotFound { recording: String, suffix: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to walk dataset tree: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Biological sex of a participant as recorded in participants.tsv
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sex {
    Male,
    Female,
    /// Anything that is neither male, female nor "n/a"
    Other,
}

impl Sex {
    /// Parse a participants.tsv cell. Returns `None` for the "n/a" sentinel
    /// and for empty cells.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if is_na(value) {
            return None;
        }
        Some(match value.to_ascii_lowercase().as_str() {
            "m" | "male" => Sex::Male,
            "f" | "female" => Sex::Female,
            _ => Sex::Other,
        })
    }
}

/// Handedness of a participant as recorded in participants.tsv
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Handedness {
    Right,
    Left,
    Ambidextrous,
    /// Anything that is not R, L, A or "n/a"
    Other,
}

impl Handedness {
    /// Parse a participants.tsv cell. Returns `None` for the "n/a" sentinel
    /// and for empty cells.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if is_na(value) {
            return None;
        }
        Some(match value.to_ascii_lowercase().as_str() {
            "r" | "right" => Handedness::Right,
            "l" | "left" => Handedness::Left,
            "a" | "ambidextrous" => Handedness::Ambidextrous,
            _ => Handedness::Other,
        })
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "M"),
            Sex::Female => write!(f, "F"),
            Sex::Other => write!(f, "other"),
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handedness::Right => write!(f, "R"),
            Handedness::Left => write!(f, "L"),
            Handedness::Ambidextrous => write!(f, "A"),
            Handedness::Other => write!(f, "other"),
        }
    }
}

/// One row of participants.tsv
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Participant {
    /// Participant label including the `sub-` prefix
    pub participant_id: String,
    pub sex: Option<Sex>,
    pub handedness: Option<Handedness>,
    /// Age in years
    pub age: Option<f64>,
}

impl Participant {
    /// Create a participant with no demographic information
    pub fn new(participant_id: impl Into<String>) -> Self {
        Self {
            participant_id: participant_id.into(),
            sex: None,
            handedness: None,
            age: None,
        }
    }
}

/// True for the "n/a" sentinel and for blank cells
pub fn is_na(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(NA)
}
