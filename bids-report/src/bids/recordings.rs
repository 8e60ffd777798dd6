//! Aggregation of per-scan facts into a [`RecordingSummary`]

use super::entities::pretty_datatype;
use crate::summarize::Rounded;
use crate::summary::{ChannelCount, ChannelSummary, DurationSummary, RecordingSummary};
use chrono::NaiveDateTime;

/// Facts gathered from one scan's sidecars
#[derive(Debug, Clone, PartialEq)]
pub struct ScanFacts {
    /// Datatype directory (`meg`, `eeg`, `ieeg`)
    pub datatype: String,
    pub sampling_frequency: f64,
    pub power_line_frequency: Option<f64>,
    pub software_filters: Vec<String>,
    pub manufacturer: Option<String>,
    /// Seconds
    pub duration: Option<f64>,
    pub channels: ChannelCount,
    pub acq_time: Option<NaiveDateTime>,
}

/// Accumulates scans; unique values keep first-seen order
#[derive(Debug, Default)]
pub struct RecordingAccumulator {
    systems: Vec<String>,
    manufacturers: Vec<String>,
    sampling_frequencies: Vec<Rounded>,
    power_line_frequencies: Vec<Rounded>,
    software_filters: Vec<String>,
    durations: Vec<f64>,
    channel_counts: Vec<ChannelCount>,
    acq_times: Vec<NaiveDateTime>,
    n_scans: usize,
}

impl RecordingAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one scan
    pub fn add_scan(&mut self, scan: ScanFacts) {
        self.n_scans += 1;

        push_unique(&mut self.systems, pretty_datatype(&scan.datatype));
        if let Some(manufacturer) = scan.manufacturer {
            push_unique(&mut self.manufacturers, manufacturer);
        }
        push_unique(&mut self.sampling_frequencies, Rounded::new(scan.sampling_frequency));
        if let Some(line_freq) = scan.power_line_frequency {
            push_unique(&mut self.power_line_frequencies, Rounded::new(line_freq));
        }
        for filter in scan.software_filters {
            push_unique(&mut self.software_filters, filter);
        }
        if let Some(duration) = scan.duration {
            self.durations.push(duration);
        }
        self.channel_counts.push(scan.channels);
        self.acq_times.extend(scan.acq_time);
    }

    /// Number of scans added so far
    pub fn n_scans(&self) -> usize {
        self.n_scans
    }

    /// Finish aggregation; `None` when no scan was added
    pub fn finish(self) -> Option<RecordingSummary> {
        if self.n_scans == 0 {
            return None;
        }

        Some(RecordingSummary {
            systems: self.systems,
            manufacturers: self.manufacturers,
            sampling_frequencies: self.sampling_frequencies,
            power_line_frequencies: self.power_line_frequencies,
            software_filters: self.software_filters,
            n_scans: self.n_scans,
            durations: DurationSummary::from_durations(&self.durations),
            channels: ChannelSummary::from_counts(&self.channel_counts),
            first_acquisition: self.acq_times.iter().min().copied(),
            last_acquisition: self.acq_times.iter().max().copied(),
        })
    }
}

fn push_unique<T: PartialEq>(values: &mut Vec<T>, value: T) {
    if !values.contains(&value) {
        values.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(datatype: &str, sfreq: f64, duration: Option<f64>) -> ScanFacts {
        ScanFacts {
            datatype: datatype.to_string(),
            sampling_frequency: sfreq,
            power_line_frequency: Some(50.0),
            software_filters: vec!["SpatialCompensation".to_string()],
            manufacturer: Some("CTF".to_string()),
            duration,
            channels: ChannelCount { total: 64, good: 60 },
            acq_time: None,
        }
    }

    #[test]
    fn test_empty_accumulator() {
        assert!(RecordingAccumulator::new().finish().is_none());
    }

    #[test]
    fn test_unique_values_and_stats() {
        let mut acc = RecordingAccumulator::new();
        acc.add_scan(scan("meg", 1200.0, Some(10.0)));
        acc.add_scan(scan("meg", 1200.0, Some(30.0)));
        acc.add_scan(scan("eeg", 500.0, None));
        assert_eq!(acc.n_scans(), 3);

        let summary = acc.finish().unwrap();
        assert_eq!(summary.systems, vec!["MEG", "EEG"]);
        assert_eq!(summary.manufacturers, vec!["CTF"]);
        assert_eq!(
            summary.sampling_frequencies,
            vec![Rounded::new(1200.0), Rounded::new(500.0)]
        );
        assert_eq!(summary.software_filters, vec!["SpatialCompensation"]);
        assert_eq!(summary.n_scans, 3);

        let durations = summary.durations.unwrap();
        assert_eq!(durations.total, Rounded::new(40.0));
        assert_eq!(durations.range.std, Rounded::new(10.0));

        let channels = summary.channels.unwrap();
        assert_eq!(channels.removed.mean, Rounded::new(4.0));
    }
}
