//! Report configuration types
//!
//! This module defines the knobs that change what a report covers and how
//! it is laid out. Everything has a default that reproduces the standard
//! report, so most callers use `ReportConfig::default()`.

use crate::summary::DEFAULT_AUTHOR;
use serde::{Deserialize, Serialize};

/// Configuration for loading and rendering a dataset report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Optional: only summarize scans of this session
    pub session: Option<String>,

    /// Column width the report is wrapped to (default: 80)
    pub wrap_width: usize,

    /// Datatype directories whose scans are summarized
    pub datatypes: Vec<String>,

    /// Top-level directories skipped when collecting entity values
    pub ignore_dirs: Vec<String>,

    /// Author used when dataset_description.json lists none
    pub default_author: String,

    /// Tool named in the citation line
    pub generator: String,

    /// DOI cited for the tool
    pub generator_doi: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            session: None,
            wrap_width: default_wrap_width(),
            datatypes: vec!["meg".into(), "eeg".into(), "ieeg".into()],
            ignore_dirs: vec!["derivatives".into(), "sourcedata".into(), "code".into()],
            default_author: DEFAULT_AUTHOR.to_string(),
            generator: "MNE-BIDS".to_string(),
            generator_doi: "https://doi.org/10.21105/joss.01896".to_string(),
        }
    }
}

fn default_wrap_width() -> usize {
    80
}

impl ReportConfig {
    /// Create a new report configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: restrict the report to one session
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    /// Builder method: set the wrap width
    pub fn with_wrap_width(mut self, width: usize) -> Self {
        self.wrap_width = width;
        self
    }

    /// Builder method: add a datatype to summarize
    pub fn add_datatype(mut self, datatype: impl Into<String>) -> Self {
        let datatype = datatype.into();
        if !self.datatypes.contains(&datatype) {
            self.datatypes.push(datatype);
        }
        self
    }

    /// Builder method: skip an extra top-level directory
    pub fn add_ignore_dir(mut self, dir: impl Into<String>) -> Self {
        self.ignore_dirs.push(dir.into());
        self
    }

    /// Builder method: set the fallback author
    pub fn with_default_author(mut self, author: impl Into<String>) -> Self {
        self.default_author = author.into();
        self
    }

    /// Builder method: set the tool named in the citation line
    pub fn with_generator(mut self, name: impl Into<String>, doi: impl Into<String>) -> Self {
        self.generator = name.into();
        self.generator_doi = doi.into();
        self
    }

    /// Check if scans of a datatype should be summarized
    pub fn should_summarize_datatype(&self, datatype: &str) -> bool {
        self.datatypes.iter().any(|d| d == datatype)
    }

    /// Check if a top-level directory is excluded from entity scans
    pub fn is_ignored_dir(&self, name: &str) -> bool {
        self.ignore_dirs.iter().any(|d| d == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_config_builder() {
        let config = ReportConfig::new()
            .with_session("01")
            .with_wrap_width(72)
            .add_datatype("nirs")
            .add_datatype("meg")
            .with_default_author("Anonymous");

        assert_eq!(config.session.as_deref(), Some("01"));
        assert_eq!(config.wrap_width, 72);
        assert_eq!(config.datatypes, vec!["meg", "eeg", "ieeg", "nirs"]);
        assert_eq!(config.default_author, "Anonymous");
    }

    #[test]
    fn test_datatype_filter() {
        let config = ReportConfig::new();

        assert!(config.should_summarize_datatype("meg"));
        assert!(config.should_summarize_datatype("ieeg"));
        assert!(!config.should_summarize_datatype("anat"));
        assert!(config.is_ignored_dir("derivatives"));
        assert!(!config.is_ignored_dir("sub-01"));
    }

    #[test]
    fn test_partial_deserialization_keeps_defaults() {
        let config: ReportConfig = serde_json::from_str(r#"{"wrap_width": 100}"#).unwrap();

        assert_eq!(config.wrap_width, 100);
        assert_eq!(config.default_author, "[Unspecified]");
        assert_eq!(config.generator, "MNE-BIDS");
    }
}
