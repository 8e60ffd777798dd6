//! Main dataset API
//!
//! This module provides the primary interface for the library. The Dataset
//! struct is the entry point for querying a BIDS tree and producing its
//! report.

use crate::bids::channels::read_channel_count;
use crate::bids::entities::{
    collect_entity_values, find_datatypes, BidsFileName, EMPTYROOM_SUBJECT,
};
use crate::bids::participants::read_participants;
use crate::bids::scans::{find_scans_files, read_scans, ScanEntry};
use crate::bids::sidecar::{find_sidecar, read_json, DatasetDescription, RecordingSidecar};
use crate::bids::{RecordingAccumulator, ScanFacts};
use crate::config::ReportConfig;
use crate::report::render_report;
use crate::summary::{DatasetSummary, RecordingSummary};
use crate::types::{ReportError, Result};
use std::path::{Path, PathBuf};

/// A BIDS dataset on disk
pub struct Dataset {
    /// Dataset root (holds dataset_description.json)
    root: PathBuf,
    /// Report configuration
    config: ReportConfig,
}

impl Dataset {
    /// Open a dataset with the default configuration
    ///
    /// # Example
    /// ```no_run
    /// use bids_report::Dataset;
    ///
    /// let dataset = Dataset::open("ds000248").unwrap();
    /// println!("{}", dataset.report().unwrap());
    /// ```
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        Self::with_config(root, ReportConfig::default())
    }

    /// Open a dataset with a custom configuration
    pub fn with_config(root: impl AsRef<Path>, config: ReportConfig) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(ReportError::NotADirectory(root));
        }

        Ok(Self { root, config })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Sorted unique values of an entity across the dataset.
    ///
    /// Accepts short keys (`sub`, `ses`, `run`) and long names (`subject`,
    /// `session`). Configured ignore directories are skipped.
    pub fn entity_values(&self, key: &str) -> Result<Vec<String>> {
        collect_entity_values(&self.root, key, |name| self.config.is_ignored_dir(name))
    }

    /// Subject labels, without the empty-room subject
    pub fn subjects(&self) -> Result<Vec<String>> {
        let mut subjects = self.report_entity_values("sub")?;
        subjects.retain(|s| s != EMPTYROOM_SUBJECT);
        Ok(subjects)
    }

    /// Session labels, without empty-room sessions.
    ///
    /// With a session configured, only that session is returned (if present).
    pub fn sessions(&self) -> Result<Vec<String>> {
        let mut sessions = self.report_entity_values("ses")?;
        if let Some(session) = &self.config.session {
            sessions.retain(|s| s == session);
        }
        Ok(sessions)
    }

    /// Datatype directories present in the dataset
    pub fn datatypes(&self) -> Result<Vec<String>> {
        find_datatypes(&self.root, |subject| subject == EMPTYROOM_SUBJECT)
    }

    /// Read dataset_description.json; a missing file yields defaults
    pub fn description(&self) -> Result<DatasetDescription> {
        let path = self.root.join("dataset_description.json");
        if !path.is_file() {
            log::warn!("No dataset_description.json found in {:?}", self.root);
            return Ok(DatasetDescription::default());
        }
        read_json(&path)
    }

    /// Collect everything the report needs
    pub fn summarize(&self) -> Result<DatasetSummary> {
        log::info!("Summarizing BIDS dataset: {:?}", self.root);

        let description = self.description()?;
        let mut summary = DatasetSummary::new(
            description.name,
            description.authors,
            description.bids_version,
            &self.config.default_author,
        )
        .with_subjects(self.subjects()?)
        .with_sessions(self.sessions()?);

        let participants_path = self.root.join("participants.tsv");
        if participants_path.is_file() {
            summary = summary.with_participants(read_participants(&participants_path)?);
        } else {
            log::warn!("No participants.tsv found in {:?}", self.root);
        }

        if let Some(recordings) = self.summarize_recordings()? {
            summary = summary.with_recordings(recordings);
        }

        Ok(summary)
    }

    /// Summarize and render the wrapped report text
    pub fn report(&self) -> Result<String> {
        let summary = self.summarize()?;
        Ok(render_report(&summary, &self.config))
    }

    /// Aggregate sidecar facts over all scans; `None` if there are none
    fn summarize_recordings(&self) -> Result<Option<RecordingSummary>> {
        let scans_files = find_scans_files(&self.root, self.config.session.as_deref(), |name| {
            self.config.is_ignored_dir(name)
        })?;
        if scans_files.is_empty() {
            log::warn!("No *_scans.tsv files found in {:?}, recordings not summarized", self.root);
            return Ok(None);
        }

        let mut accumulator = RecordingAccumulator::new();
        for scans_path in &scans_files {
            log::info!("Summarizing scans file {:?}", scans_path);
            let scans_dir = scans_path.parent().unwrap_or(self.root.as_path());

            for scan in read_scans(scans_path)? {
                if let Some(facts) = self.scan_facts(scans_dir, &scan)? {
                    accumulator.add_scan(facts);
                }
            }
        }

        log::debug!("Summarized {} scans", accumulator.n_scans());
        Ok(accumulator.finish())
    }

    /// Read the sidecars of one scan; `None` if the scan is not summarized
    fn scan_facts(&self, scans_dir: &Path, scan: &ScanEntry) -> Result<Option<ScanFacts>> {
        let Some(datatype) = scan.datatype() else {
            log::debug!("Skipping scan without datatype directory: {}", scan.filename);
            return Ok(None);
        };
        if !self.config.should_summarize_datatype(datatype) {
            log::debug!("Skipping {} scan: {}", datatype, scan.filename);
            return Ok(None);
        }

        let recording = BidsFileName::parse(scan.basename());
        if recording.subject() == Some(EMPTYROOM_SUBJECT) {
            log::debug!("Skipping empty-room scan: {}", scan.filename);
            return Ok(None);
        }

        let recording_dir = scans_dir.join(
            Path::new(&scan.filename)
                .parent()
                .unwrap_or_else(|| Path::new(datatype)),
        );

        let sidecar_path = find_sidecar(&self.root, &recording_dir, &recording, datatype, ".json")?;
        let sidecar: RecordingSidecar = read_json(&sidecar_path)?;
        let channels_path =
            find_sidecar(&self.root, &recording_dir, &recording, "channels", ".tsv")?;
        let channels = read_channel_count(&channels_path)?;

        log::debug!(
            "Scan {}: {} channels ({} good)",
            scan.filename,
            channels.total,
            channels.good
        );

        Ok(Some(ScanFacts {
            datatype: datatype.to_string(),
            sampling_frequency: sidecar.require_sampling_frequency(&sidecar_path)?,
            power_line_frequency: sidecar.power_line_frequency(&sidecar_path)?,
            software_filters: sidecar.software_filter_names(&sidecar_path)?,
            manufacturer: sidecar.manufacturer().map(str::to_string),
            duration: sidecar.recording_duration,
            channels,
            acq_time: scan.acq_time,
        }))
    }

    /// Entity values with configured and empty-room directories skipped
    fn report_entity_values(&self, key: &str) -> Result<Vec<String>> {
        let emptyroom_dir = format!("sub-{EMPTYROOM_SUBJECT}");
        collect_entity_values(&self.root, key, |name| {
            name == emptyroom_dir || self.config.is_ignored_dir(name)
        })
    }
}

/// Produce the report for the dataset at `root`, optionally for one session
///
/// # Example
/// ```no_run
/// let report = bids_report::make_report("ds003848", None).unwrap();
/// println!("{report}");
/// ```
pub fn make_report(root: impl AsRef<Path>, session: Option<&str>) -> Result<String> {
    let mut config = ReportConfig::default();
    if let Some(session) = session {
        config = config.with_session(session);
    }
    Dataset::with_config(root, config)?.report()
}
