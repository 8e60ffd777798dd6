//! BIDS file names and entities
//!
//! A BIDS name such as `sub-01_ses-01_task-rest_run-01_meg.fif` is a list
//! of `key-value` entities, a suffix (`meg`) and an extension (`.fif`).
//! This module parses such names and collects entity values across a
//! dataset tree.

use crate::types::Result;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Datatype directories defined by BIDS
pub const KNOWN_DATATYPES: &[&str] = &[
    "anat", "beh", "dwi", "eeg", "fmap", "func", "ieeg", "meg", "micr", "motion", "nirs", "perf",
    "pet",
];

/// Subject label used for empty-room MEG recordings
pub const EMPTYROOM_SUBJECT: &str = "emptyroom";

/// A parsed BIDS file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidsFileName {
    /// `(key, value)` pairs in name order
    pub entities: Vec<(String, String)>,
    /// Trailing non-entity part (`meg`, `channels`, `scans`, ...)
    pub suffix: Option<String>,
    /// Everything from the first dot, including it (`.fif`, `.tsv`)
    pub extension: String,
}

impl BidsFileName {
    /// Parse a file or directory name (not a path)
    pub fn parse(name: &str) -> Self {
        let (stem, extension) = match name.find('.') {
            Some(dot) => (&name[..dot], &name[dot..]),
            None => (name, ""),
        };

        let mut entities = Vec::new();
        let mut suffix = None;
        for part in stem.split('_').filter(|p| !p.is_empty()) {
            match part.split_once('-') {
                Some((key, value)) if !key.is_empty() && !value.is_empty() => {
                    entities.push((key.to_string(), value.to_string()));
                }
                _ => suffix = Some(part.to_string()),
            }
        }

        Self {
            entities,
            suffix,
            extension: extension.to_string(),
        }
    }

    /// Value of an entity, by short key (`sub`) or long name (`subject`)
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = entity_key(key);
        self.entities
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn subject(&self) -> Option<&str> {
        self.get("sub")
    }

    pub fn session(&self) -> Option<&str> {
        self.get("ses")
    }

    /// True if every entity of `self` appears with the same value in `other`
    pub fn entities_subset_of(&self, other: &BidsFileName) -> bool {
        self.entities
            .iter()
            .all(|(key, value)| other.get(key) == Some(value.as_str()))
    }
}

/// Map long entity names to the short keys used in file names
pub fn entity_key(name: &str) -> &str {
    match name {
        "subject" => "sub",
        "session" => "ses",
        "acquisition" => "acq",
        "reconstruction" => "rec",
        "direction" => "dir",
        "processing" => "proc",
        "description" => "desc",
        "tracer" => "trc",
        "ceagent" => "ce",
        other => other,
    }
}

/// Pretty name for a recording datatype (`meg` -> `MEG`)
pub fn pretty_datatype(datatype: &str) -> String {
    match datatype {
        "ieeg" => "iEEG".to_string(),
        other => other.to_ascii_uppercase(),
    }
}

/// Walk every entry below `root` in file-name order.
///
/// Hidden entries are skipped, as are top-level directories for which
/// `skip_top_level` returns true. Neither is descended into.
pub(crate) fn walk_dataset<'a, F>(
    root: &Path,
    skip_top_level: &'a F,
) -> impl Iterator<Item = walkdir::Result<DirEntry>> + 'a
where
    F: Fn(&str) -> bool,
{
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| keep_entry(entry, skip_top_level))
}

fn keep_entry<F>(entry: &DirEntry, skip_top_level: &F) -> bool
where
    F: Fn(&str) -> bool,
{
    let Some(name) = entry.file_name().to_str() else {
        log::warn!("Skipping non UTF-8 path: {:?}", entry.path());
        return false;
    };
    if name.starts_with('.') {
        return false;
    }
    if entry.depth() == 1 && entry.file_type().is_dir() && skip_top_level(name) {
        log::trace!("Skipping directory: {:?}", entry.path());
        return false;
    }
    true
}

/// Collect sorted unique values of an entity below `root`.
///
/// Both file and directory names are inspected. Top-level directories for
/// which `skip_top_level` returns true are not entered; hidden entries are
/// always skipped.
pub fn collect_entity_values<F>(root: &Path, key: &str, skip_top_level: F) -> Result<Vec<String>>
where
    F: Fn(&str) -> bool,
{
    let key = entity_key(key);
    let mut values = BTreeSet::new();

    for entry in walk_dataset(root, &skip_top_level) {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if let Some(value) = BidsFileName::parse(name).get(key) {
            values.insert(value.to_string());
        }
    }

    Ok(values.into_iter().collect())
}

/// Datatype directories present under `sub-*/` or `sub-*/ses-*/`, sorted
pub fn find_datatypes<F>(root: &Path, skip_subject: F) -> Result<Vec<String>>
where
    F: Fn(&str) -> bool,
{
    let mut datatypes = BTreeSet::new();

    for subject in sorted_dirs(root, "sub-")? {
        let label = subject
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix("sub-"))
            .unwrap_or_default();
        if skip_subject(label) {
            continue;
        }

        let mut parents = sorted_dirs(&subject, "ses-")?;
        parents.push(subject);
        for parent in parents {
            for dir in sorted_dirs(&parent, "")? {
                if let Some(name) = dir.file_name().and_then(|n| n.to_str()) {
                    if KNOWN_DATATYPES.contains(&name) {
                        datatypes.insert(name.to_string());
                    }
                }
            }
        }
    }

    Ok(datatypes.into_iter().collect())
}

/// Sub-directories of `dir` whose names start with `prefix`, sorted
pub(crate) fn sorted_dirs(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .map(|n| n.starts_with(prefix) && !n.starts_with('.'))
            .unwrap_or(false);
        if matches {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_recording_name() {
        let name = BidsFileName::parse("sub-01_ses-01_task-testing_acq-01_run-01_meg.fif");

        assert_eq!(name.subject(), Some("01"));
        assert_eq!(name.session(), Some("01"));
        assert_eq!(name.get("task"), Some("testing"));
        assert_eq!(name.get("acquisition"), Some("01"));
        assert_eq!(name.suffix.as_deref(), Some("meg"));
        assert_eq!(name.extension, ".fif");
    }

    #[test]
    fn test_parse_directory_and_compound_extension() {
        let dir = BidsFileName::parse("sub-emptyroom");
        assert_eq!(dir.subject(), Some(EMPTYROOM_SUBJECT));
        assert_eq!(dir.suffix, None);

        let name = BidsFileName::parse("sub-02_task-rest_eeg.nii.gz");
        assert_eq!(name.extension, ".nii.gz");
        assert_eq!(name.suffix.as_deref(), Some("eeg"));
    }

    #[test]
    fn test_entity_subset() {
        let recording = BidsFileName::parse("sub-01_ses-01_task-rest_run-02_meg.fif");
        let specific = BidsFileName::parse("sub-01_ses-01_task-rest_run-02_meg.json");
        let inherited = BidsFileName::parse("task-rest_meg.json");
        let other_run = BidsFileName::parse("sub-01_ses-01_task-rest_run-01_meg.json");

        assert!(specific.entities_subset_of(&recording));
        assert!(inherited.entities_subset_of(&recording));
        assert!(!other_run.entities_subset_of(&recording));
    }

    #[test]
    fn test_pretty_datatype() {
        assert_eq!(pretty_datatype("meg"), "MEG");
        assert_eq!(pretty_datatype("eeg"), "EEG");
        assert_eq!(pretty_datatype("ieeg"), "iEEG");
    }

    #[test]
    fn test_collect_entity_values() {
        let root = tempfile::tempdir().unwrap();
        let meg = root.path().join("sub-02/ses-b/meg");
        fs::create_dir_all(&meg).unwrap();
        fs::create_dir_all(root.path().join("sub-01/ses-a/eeg")).unwrap();
        fs::create_dir_all(root.path().join("derivatives/sub-99")).unwrap();
        fs::write(meg.join("sub-02_ses-b_task-rest_recording-ecg_physio.tsv"), "").unwrap();

        let skip = |name: &str| name == "derivatives";
        assert_eq!(collect_entity_values(root.path(), "subject", skip).unwrap(), vec!["01", "02"]);
        assert_eq!(collect_entity_values(root.path(), "ses", skip).unwrap(), vec!["a", "b"]);
        assert_eq!(collect_entity_values(root.path(), "recording", skip).unwrap(), vec!["ecg"]);
        assert_eq!(
            find_datatypes(root.path(), |_| false).unwrap(),
            vec!["eeg".to_string(), "meg".to_string()]
        );
    }

    #[test]
    fn test_walk_skips_hidden_and_top_level_only() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join(".git/sub-77")).unwrap();
        fs::create_dir_all(root.path().join("code/sub-88")).unwrap();
        // Only top-level directories are matched against the skip list
        fs::create_dir_all(root.path().join("sub-01/code/sub-03")).unwrap();

        let skip = |name: &str| name == "code";
        assert_eq!(collect_entity_values(root.path(), "sub", skip).unwrap(), vec!["01", "03"]);
    }
}
