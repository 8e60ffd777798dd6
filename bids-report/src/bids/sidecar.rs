//! JSON sidecar files
//!
//! Deserializes dataset_description.json and the recording sidecars
//! (`*_meg.json`, `*_eeg.json`, `*_ieeg.json`), and resolves which sidecar
//! applies to a recording under the BIDS inheritance principle.

use super::entities::BidsFileName;
use crate::types::{is_na, ReportError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// dataset_description.json
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatasetDescription {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "BIDSVersion")]
    pub bids_version: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
}

/// Recording sidecar fields used in reports
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordingSidecar {
    #[serde(default)]
    pub sampling_frequency: Option<f64>,
    #[serde(default)]
    pub power_line_frequency: Option<NumberOrText>,
    #[serde(default)]
    pub software_filters: Option<SoftwareFilters>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub recording_duration: Option<f64>,
}

/// A numeric field that may hold the "n/a" sentinel
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

/// `SoftwareFilters` is an object keyed by filter name, or "n/a"
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SoftwareFilters {
    Filters(serde_json::Map<String, serde_json::Value>),
    Text(String),
}

impl RecordingSidecar {
    /// Sampling frequency in Hz; the field is required
    pub fn require_sampling_frequency(&self, path: &Path) -> Result<f64> {
        self.sampling_frequency.ok_or_else(|| ReportError::MissingField {
            path: path.to_path_buf(),
            field: "SamplingFrequency".to_string(),
        })
    }

    /// Power line frequency in Hz, `None` if absent or "n/a"
    pub fn power_line_frequency(&self, path: &Path) -> Result<Option<f64>> {
        match &self.power_line_frequency {
            None => Ok(None),
            Some(NumberOrText::Number(value)) => Ok(Some(*value)),
            Some(NumberOrText::Text(text)) if is_na(text) => Ok(None),
            Some(NumberOrText::Text(text)) => Err(ReportError::InvalidValue {
                path: path.to_path_buf(),
                field: "PowerLineFrequency".to_string(),
                value: text.clone(),
            }),
        }
    }

    /// Names of the software filters applied during recording
    pub fn software_filter_names(&self, path: &Path) -> Result<Vec<String>> {
        match &self.software_filters {
            None => Ok(Vec::new()),
            Some(SoftwareFilters::Filters(filters)) => Ok(filters.keys().cloned().collect()),
            Some(SoftwareFilters::Text(text)) if is_na(text) => Ok(Vec::new()),
            Some(SoftwareFilters::Text(text)) => Err(ReportError::InvalidValue {
                path: path.to_path_buf(),
                field: "SoftwareFilters".to_string(),
                value: text.clone(),
            }),
        }
    }

    /// Manufacturer, `None` if absent or "n/a"
    pub fn manufacturer(&self) -> Option<&str> {
        self.manufacturer.as_deref().filter(|m| !is_na(m))
    }
}

/// Read and deserialize a JSON file (a UTF-8 BOM is accepted)
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    serde_json::from_str(content).map_err(|source| ReportError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Find the sidecar that applies to a recording.
///
/// Walks from `recording_dir` up to `root`. In the first directory holding
/// any candidate (right suffix and extension, entities a subset of the
/// recording's), the candidate with the most entities wins.
pub fn find_sidecar(
    root: &Path,
    recording_dir: &Path,
    recording: &BidsFileName,
    suffix: &str,
    extension: &str,
) -> Result<PathBuf> {
    let mut dir = Some(recording_dir);

    while let Some(current) = dir {
        if current.is_dir() {
            let mut best: Option<(usize, PathBuf)> = None;
            for entry in WalkDir::new(current).min_depth(1).max_depth(1) {
                let entry = entry?;
                let Some(name) = entry.file_name().to_str() else {
                    continue;
                };
                let candidate = BidsFileName::parse(name);
                if candidate.suffix.as_deref() != Some(suffix)
                    || candidate.extension != extension
                    || !candidate.entities_subset_of(recording)
                {
                    continue;
                }

                let score = candidate.entities.len();
                let better = match &best {
                    Some((best_score, best_path)) => {
                        score > *best_score
                            || (score == *best_score && entry.path() < best_path.as_path())
                    }
                    None => true,
                };
                if better {
                    best = Some((score, entry.into_path()));
                }
            }

            if let Some((_, path)) = best {
                log::trace!("Resolved {} sidecar: {:?}", suffix, path);
                return Ok(path);
            }
        }

        if current == root {
            break;
        }
        dir = current.parent().filter(|p| p.starts_with(root));
    }

    Err(ReportError::SidecarNotFound {
        recording: describe(recording),
        suffix: format!("{suffix}{extension}"),
    })
}

fn describe(name: &BidsFileName) -> String {
    let mut parts: Vec<String> = name
        .entities
        .iter()
        .map(|(key, value)| format!("{key}-{value}"))
        .collect();
    parts.extend(name.suffix.clone());
    format!("{}{}", parts.join("_"), name.extension)
}
