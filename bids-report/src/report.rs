//! Report assembler
//!
//! Composes formatter output and dataset-level facts into one paragraph and
//! wraps it to a fixed column width. Rendering is a pure function of the
//! [`DatasetSummary`] and the [`ReportConfig`].

use crate::config::ReportConfig;
use crate::summarize::{pretty_list, scan_count_str, summarize_handedness, summarize_sex};
use crate::summary::{ChannelSummary, DatasetSummary, DurationSummary, RecordingSummary};
use crate::types::NA;
use std::fmt::Display;

/// Render the wrapped report text for a dataset summary
pub fn render_report(summary: &DatasetSummary, config: &ReportConfig) -> String {
    let paragraph = report_paragraph(summary, config);
    wrap_text(&paragraph, config.wrap_width)
}

/// Build the unwrapped report: every sentence joined by a single space
pub fn report_paragraph(summary: &DatasetSummary, config: &ReportConfig) -> String {
    let mut sentences = vec![
        description_sentence(summary),
        format!(
            "This report was generated with {} ({}).",
            config.generator, config.generator_doi
        ),
        participants_sentence(summary),
    ];

    if let Some(recordings) = &summary.recordings {
        sentences.extend(recording_sentences(recordings));
    }

    sentences.join(" ")
}

/// Greedy word wrap.
///
/// Lines break only at whitespace; a word longer than `width` gets a line of
/// its own. Runs of whitespace collapse to one space. Lines are joined with
/// `\n` and there is no trailing newline.
pub fn wrap_text(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_line.is_empty() {
            current_line.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current_line.push(' ');
            current_line.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current_line));
            current_line.push_str(word);
            current_len = word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines.join("\n")
}

fn description_sentence(summary: &DatasetSummary) -> String {
    let subject = match &summary.name {
        Some(name) => format!("The {name} dataset"),
        None => "This dataset".to_string(),
    };
    format!(
        "{subject} was created by {} and conforms to BIDS version {}.",
        summary.authors.join(", "),
        summary.bids_version.as_deref().unwrap_or(NA)
    )
}

fn participants_sentence(summary: &DatasetSummary) -> String {
    let mut sentence = format!(
        "The dataset consists of {} participants ({}; {}; {})",
        summary.subjects.len(),
        summarize_sex(&summary.sexes()),
        summarize_handedness(&summary.handedness()),
        summary.ages().describe("age"),
    );

    if !summary.sessions.is_empty() {
        sentence.push_str(&format!(
            " and {} recording sessions: {}",
            summary.sessions.len(),
            summary.sessions.join(", ")
        ));
    }

    sentence.push('.');
    sentence
}

fn recording_sentences(recordings: &RecordingSummary) -> Vec<String> {
    let mut sentences = Vec::new();

    let systems = if recordings.systems.is_empty() {
        "unknown".to_string()
    } else {
        pretty_list(&recordings.systems)
    };
    let mut system = format!("Data was recorded using an {systems} system");
    if !recordings.manufacturers.is_empty() {
        system.push_str(&format!(" ({})", recordings.manufacturers.join(", ")));
    }
    system.push_str(&format!(
        " sampled at {} Hz",
        join_or_na(&recordings.sampling_frequencies)
    ));
    if !recordings.power_line_frequencies.is_empty() {
        system.push_str(&format!(
            " with line noise at {} Hz",
            join_or_na(&recordings.power_line_frequencies)
        ));
    }
    system.push('.');
    sentences.push(system);

    if !recordings.software_filters.is_empty() {
        sentences.push(format!(
            "The following software filters were applied during recording: {}.",
            recordings.software_filters.join(", ")
        ));
    }

    sentences.push(format!("There {} in total.", scan_count_str(recordings.n_scans)));

    if let Some(durations) = &recordings.durations {
        sentences.push(duration_sentence(durations));
    }

    if let Some(channels) = &recordings.channels {
        sentences.push(channel_sentence(channels));
    }

    sentences
}

fn duration_sentence(durations: &DurationSummary) -> String {
    format!(
        "Recording durations ranged from {} to {} seconds (mean = {}, std = {}), \
         for a total of {} seconds of data recorded over all scans.",
        durations.range.min,
        durations.range.max,
        durations.range.mean,
        durations.range.std,
        durations.total,
    )
}

fn channel_sentence(channels: &ChannelSummary) -> String {
    format!(
        "For each dataset, there were on average {} (std = {}) recording channels per scan, \
         out of which {} (std = {}) were used in analysis ({} +/- {} were removed from analysis).",
        channels.total.mean,
        channels.total.std,
        channels.good.mean,
        channels.good.std,
        channels.removed.mean,
        channels.removed.std,
    )
}

fn join_or_na<T: Display>(values: &[T]) -> String {
    if values.is_empty() {
        return NA.to_string();
    }
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarize::Rounded;
    use crate::summary::{ChannelCount, DEFAULT_AUTHOR};
    use crate::types::{Participant, Sex};

    fn meg_summary() -> DatasetSummary {
        let recordings = RecordingSummary {
            systems: vec!["MEG".into()],
            manufacturers: vec!["Elekta".into()],
            sampling_frequencies: vec![Rounded::new(300.3074951171875)],
            power_line_frequencies: vec![Rounded::new(60.0)],
            software_filters: vec!["SpatialCompensation".into()],
            n_scans: 1,
            durations: DurationSummary::from_durations(&[20.0]),
            channels: ChannelSummary::from_counts(&[ChannelCount { total: 376, good: 374 }]),
            ..Default::default()
        };

        DatasetSummary::new(Some(" ".into()), Vec::new(), Some("1.9.0".into()), DEFAULT_AUTHOR)
            .with_subjects(vec!["01".into()])
            .with_sessions(vec!["01".into()])
            .with_participants(vec![Participant::new("sub-001")])
            .with_recordings(recordings)
    }

    const EXPECTED: &str = "\
This dataset was created by [Unspecified] and conforms to BIDS version 1.9.0.
This report was generated with MNE-BIDS (https://doi.org/10.21105/joss.01896).
The dataset consists of 1 participants (sex were all unknown; handedness were
all unknown; ages all unknown) and 1 recording sessions: 01. Data was recorded
using an MEG system (Elekta) sampled at 300.31 Hz with line noise at 60.0 Hz.
The following software filters were applied during recording:
SpatialCompensation. There was 1 scan in total. Recording durations ranged from
20.0 to 20.0 seconds (mean = 20.0, std = 0.0), for a total of 20.0 seconds of
data recorded over all scans. For each dataset, there were on average 376.0 (std
= 0.0) recording channels per scan, out of which 374.0 (std = 0.0) were used in
analysis (2.0 +/- 0.0 were removed from analysis).";

    #[test]
    fn test_render_single_meg_recording() {
        let report = render_report(&meg_summary(), &ReportConfig::default());
        assert_eq!(report, EXPECTED);
        assert!(report.lines().all(|line| line.chars().count() <= 80));
    }

    #[test]
    fn test_unwrapping_restores_paragraph() {
        let config = ReportConfig::default();
        let summary = meg_summary();
        let paragraph = report_paragraph(&summary, &config);
        let report = render_report(&summary, &config);

        assert_eq!(report.replace('\n', " "), paragraph);
        assert_eq!(report, render_report(&summary, &config));
    }

    #[test]
    fn test_named_dataset_with_demographics() {
        let mut first = Participant::new("sub-01");
        first.sex = Some(Sex::Male);
        first.age = Some(24.0);
        let mut second = Participant::new("sub-02");
        second.sex = Some(Sex::Female);

        let summary = DatasetSummary::new(
            Some("Auditory".into()),
            vec!["Ada Lovelace".into(), "Alan Turing".into()],
            Some("1.8.0".into()),
            DEFAULT_AUTHOR,
        )
        .with_subjects(vec!["01".into(), "02".into()])
        .with_participants(vec![first, second]);

        let paragraph = report_paragraph(&summary, &ReportConfig::default());
        assert!(paragraph.starts_with(
            "The Auditory dataset was created by Ada Lovelace, Alan Turing and conforms to BIDS version 1.8.0."
        ));
        assert!(paragraph.ends_with(
            "The dataset consists of 2 participants (comprised of 1 male and 1 female participants; \
             handedness were all unknown; ages ranged from 24.0 to 24.0 (mean = 24.0, std = 0.0; \
             1 with unknown age))."
        ));
    }

    #[test]
    fn test_optional_clauses_are_omitted() {
        let recordings = RecordingSummary {
            systems: vec!["EEG".into(), "iEEG".into()],
            sampling_frequencies: vec![Rounded::new(1000.0)],
            n_scans: 3,
            ..Default::default()
        };
        let summary = DatasetSummary::default().with_recordings(recordings);

        let paragraph = report_paragraph(&summary, &ReportConfig::default());
        assert!(paragraph.contains(
            "Data was recorded using an EEG and iEEG system sampled at 1000.0 Hz. There were 3 scans in total."
        ));
        assert!(!paragraph.contains("software filters"));
        assert!(!paragraph.contains("recording sessions"));
        assert!(paragraph.contains("conforms to BIDS version n/a."));
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("one two three", 7), "one two\nthree");
        assert_eq!(wrap_text("a  b\n c", 80), "a b c");
        assert_eq!(wrap_text("tiny enormousword end", 5), "tiny\nenormousword\nend");
        assert_eq!(wrap_text("", 80), "");
        assert_eq!(wrap_text("left as is", 0), "left as is");
    }
}
