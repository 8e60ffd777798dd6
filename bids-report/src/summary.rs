//! Dataset-level aggregates consumed by the report assembler
//!
//! A [`DatasetSummary`] is built once per report run, either by the
//! metadata loader ([`crate::Dataset::summarize`]) or by hand, and is only
//! read afterwards.

use crate::summarize::{NumericRange, RangeStats, Rounded};
use crate::types::{Handedness, Participant, Sex};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Author shown when the dataset description lists none
pub const DEFAULT_AUTHOR: &str = "[Unspecified]";

/// Everything the report says about a dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    /// Dataset name (`None` when blank or missing)
    pub name: Option<String>,
    /// Dataset authors, never empty
    pub authors: Vec<String>,
    /// BIDS specification version the dataset claims
    pub bids_version: Option<String>,
    /// Subject labels (without `sub-`)
    pub subjects: Vec<String>,
    /// Session labels (without `ses-`)
    pub sessions: Vec<String>,
    /// Participant cohort from participants.tsv
    pub participants: Vec<Participant>,
    /// Recording statistics (`None` when the dataset has no scans)
    pub recordings: Option<RecordingSummary>,
}

/// Technical facts aggregated over all summarized scans
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RecordingSummary {
    /// Pretty modality names (`MEG`, `EEG`, `iEEG`)
    pub systems: Vec<String>,
    /// Unique manufacturers, first-seen order
    pub manufacturers: Vec<String>,
    /// Unique sampling frequencies in Hz
    pub sampling_frequencies: Vec<Rounded>,
    /// Unique power line frequencies in Hz
    pub power_line_frequencies: Vec<Rounded>,
    /// Unique software filter names
    pub software_filters: Vec<String>,
    /// Number of scans summarized
    pub n_scans: usize,
    /// Recording durations in seconds
    pub durations: Option<DurationSummary>,
    /// Channel counts per scan
    pub channels: Option<ChannelSummary>,
    /// Earliest `acq_time` in the scans files
    pub first_acquisition: Option<NaiveDateTime>,
    /// Latest `acq_time` in the scans files
    pub last_acquisition: Option<NaiveDateTime>,
}

/// Recording duration statistics in seconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationSummary {
    pub range: RangeStats<Rounded>,
    pub total: Rounded,
}

impl DurationSummary {
    /// Returns `None` when no duration is known
    pub fn from_durations(durations: &[f64]) -> Option<Self> {
        let range = RangeStats::from_values(durations)?;
        Some(Self {
            range,
            total: Rounded::new(durations.iter().sum()),
        })
    }
}

/// Channel count statistics across scans
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSummary {
    /// All channels per scan
    pub total: RangeStats<Rounded>,
    /// Channels usable for analysis per scan
    pub good: RangeStats<Rounded>,
    /// `total - good` per scan
    pub removed: RangeStats<Rounded>,
}

/// Channel counts of a single scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelCount {
    pub total: usize,
    pub good: usize,
}

impl ChannelSummary {
    /// Returns `None` when `counts` is empty
    pub fn from_counts(counts: &[ChannelCount]) -> Option<Self> {
        let total: Vec<f64> = counts.iter().map(|c| c.total as f64).collect();
        let good: Vec<f64> = counts.iter().map(|c| c.good as f64).collect();
        let removed: Vec<f64> = counts
            .iter()
            .map(|c| c.total.saturating_sub(c.good) as f64)
            .collect();

        Some(Self {
            total: RangeStats::from_values(&total)?,
            good: RangeStats::from_values(&good)?,
            removed: RangeStats::from_values(&removed)?,
        })
    }
}

impl DatasetSummary {
    /// Create a summary with no participants and no recordings.
    ///
    /// An empty author list falls back to `default_author`.
    pub fn new(
        name: Option<String>,
        authors: Vec<String>,
        bids_version: Option<String>,
        default_author: &str,
    ) -> Self {
        let name = name.filter(|n| !n.trim().is_empty());
        let authors: Vec<String> = authors
            .into_iter()
            .filter(|a| !a.trim().is_empty())
            .collect();
        let authors = if authors.is_empty() {
            vec![default_author.to_string()]
        } else {
            authors
        };

        Self {
            name,
            authors,
            bids_version,
            subjects: Vec::new(),
            sessions: Vec::new(),
            participants: Vec::new(),
            recordings: None,
        }
    }

    /// Builder method: set subject labels
    pub fn with_subjects(mut self, subjects: Vec<String>) -> Self {
        self.subjects = subjects;
        self
    }

    /// Builder method: set session labels
    pub fn with_sessions(mut self, sessions: Vec<String>) -> Self {
        self.sessions = sessions;
        self
    }

    /// Builder method: set the participant cohort
    pub fn with_participants(mut self, participants: Vec<Participant>) -> Self {
        self.participants = participants;
        self
    }

    /// Builder method: set recording statistics
    pub fn with_recordings(mut self, recordings: RecordingSummary) -> Self {
        self.recordings = Some(recordings);
        self
    }

    /// Sex of every participant
    pub fn sexes(&self) -> Vec<Option<Sex>> {
        self.participants.iter().map(|p| p.sex).collect()
    }

    /// Handedness of every participant
    pub fn handedness(&self) -> Vec<Option<Handedness>> {
        self.participants.iter().map(|p| p.handedness).collect()
    }

    /// Age range of the cohort
    pub fn ages(&self) -> NumericRange {
        let ages: Vec<Option<f64>> = self.participants.iter().map(|p| p.age).collect();
        NumericRange::from_values(&ages)
    }
}

impl Default for DatasetSummary {
    fn default() -> Self {
        Self::new(None, Vec::new(), None, DEFAULT_AUTHOR)
    }
}
