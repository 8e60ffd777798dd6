//! *_scans.tsv discovery and parsing

use super::entities::{walk_dataset, BidsFileName};
use super::tsv::TsvTable;
use crate::types::{is_na, Result};
use chrono::{DateTime, NaiveDateTime};
use std::path::{Path, PathBuf};

/// One row of a scans file
#[derive(Debug, Clone, PartialEq)]
pub struct ScanEntry {
    /// Recording path relative to the scans file directory (`meg/sub-01_..._meg.fif`)
    pub filename: String,
    /// Acquisition time, if recorded and parseable
    pub acq_time: Option<NaiveDateTime>,
}

impl ScanEntry {
    /// Datatype directory of the recording (`meg` for `meg/sub-01_meg.fif`)
    pub fn datatype(&self) -> Option<&str> {
        let (datatype, _) = self.filename.rsplit_once('/')?;
        datatype.rsplit('/').next()
    }

    /// File name of the recording without its directory
    pub fn basename(&self) -> &str {
        self.filename
            .rsplit_once('/')
            .map(|(_, name)| name)
            .unwrap_or(&self.filename)
    }
}

/// Find every `*_scans.tsv` below `root`, sorted.
///
/// With a session, only files whose `ses` entity equals it match.
/// Top-level directories for which `skip_top_level` returns true are ignored.
pub fn find_scans_files<F>(
    root: &Path,
    session: Option<&str>,
    skip_top_level: F,
) -> Result<Vec<PathBuf>>
where
    F: Fn(&str) -> bool,
{
    let mut found = Vec::new();

    for entry in walk_dataset(root, &skip_top_level) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };

        let session_matches = session
            .map(|s| BidsFileName::parse(name).session() == Some(s))
            .unwrap_or(true);
        if name.ends_with("_scans.tsv") && session_matches {
            found.push(entry.into_path());
        }
    }

    found.sort();
    Ok(found)
}

/// Read the rows of a scans file
pub fn read_scans(path: &Path) -> Result<Vec<ScanEntry>> {
    let table = TsvTable::read(path)?;
    scans_from_table(&table)
}

pub fn scans_from_table(table: &TsvTable) -> Result<Vec<ScanEntry>> {
    let filenames = table.require_column("filename")?;
    let acq_times = table.column("acq_time");

    let scans = filenames
        .iter()
        .enumerate()
        .map(|(row, filename)| {
            let acq_time = acq_times
                .as_ref()
                .and_then(|times| parse_acq_time(times[row]));
            ScanEntry {
                filename: filename.replace('\\', "/"),
                acq_time,
            }
        })
        .collect();

    Ok(scans)
}

/// Parse an `acq_time` cell (ISO 8601, with or without offset).
///
/// Offsets are converted to UTC. Returns `None` for "n/a" and for values
/// that cannot be parsed.
pub fn parse_acq_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if is_na(value) {
        return None;
    }

    let parsed = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.naive_utc()));
    if parsed.is_none() {
        log::warn!("Ignoring unparseable acq_time: {}", value);
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;

    #[test]
    fn test_scan_entry_paths() {
        let scan = ScanEntry {
            filename: "meg/sub-01_ses-01_task-testing_run-01_meg.fif".to_string(),
            acq_time: None,
        };
        assert_eq!(scan.datatype(), Some("meg"));
        assert_eq!(scan.basename(), "sub-01_ses-01_task-testing_run-01_meg.fif");

        let bare = ScanEntry {
            filename: "sub-01_meg.fif".to_string(),
            acq_time: None,
        };
        assert_eq!(bare.datatype(), None);
        assert_eq!(bare.basename(), "sub-01_meg.fif");
    }

    #[test]
    fn test_parse_acq_time() {
        let expected = NaiveDate::from_ymd_opt(2002, 12, 3)
            .unwrap()
            .and_hms_micro_opt(19, 1, 10, 720100)
            .unwrap();
        assert_eq!(parse_acq_time("2002-12-03T19:01:10.720100"), Some(expected));
        assert_eq!(parse_acq_time("2002-12-03T20:01:10.720100+01:00"), Some(expected));
        assert_eq!(parse_acq_time("n/a"), None);
        assert_eq!(parse_acq_time("yesterday"), None);
    }

    #[test]
    fn test_scans_from_table() {
        let table = TsvTable::parse(
            Path::new("sub-01_scans.tsv"),
            "filename\tacq_time\nmeg\\sub-01_meg.fif\tn/a\n",
        )
        .unwrap();
        let scans = scans_from_table(&table).unwrap();

        assert_eq!(scans[0].filename, "meg/sub-01_meg.fif");
        assert_eq!(scans[0].acq_time, None);
    }

    #[test]
    fn test_find_scans_files_by_session() {
        let root = tempfile::tempdir().unwrap();
        for session in ["01", "02"] {
            let dir = root.path().join(format!("sub-01/ses-{session}"));
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(format!("sub-01_ses-{session}_scans.tsv")), "filename\n").unwrap();
        }
        let derived = root.path().join("derivatives/sub-01");
        fs::create_dir_all(&derived).unwrap();
        fs::write(derived.join("sub-01_scans.tsv"), "filename\n").unwrap();

        let skip = |name: &str| name == "derivatives";
        assert_eq!(find_scans_files(root.path(), None, skip).unwrap().len(), 2);

        let only = find_scans_files(root.path(), Some("02"), skip).unwrap();
        assert_eq!(only, vec![root.path().join("sub-01/ses-02/sub-01_ses-02_scans.tsv")]);
    }

    #[test]
    fn test_find_scans_files_matches_whole_session_label() {
        let root = tempfile::tempdir().unwrap();
        for session in ["1", "10", "11"] {
            let dir = root.path().join(format!("sub-01/ses-{session}"));
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(format!("sub-01_ses-{session}_scans.tsv")), "filename\n").unwrap();
        }

        let only = find_scans_files(root.path(), Some("1"), |_| false).unwrap();
        assert_eq!(only, vec![root.path().join("sub-01/ses-1/sub-01_ses-1_scans.tsv")]);
    }
}
