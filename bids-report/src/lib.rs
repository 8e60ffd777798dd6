//! BIDS Report Library
//!
//! Builds a human-readable summary of a BIDS electrophysiology dataset
//! (MEG, EEG, iEEG): who created it, participant demographics, recording
//! system, sampling rates, durations and channel statistics.
//!
//! # Architecture
//!
//! - `summarize`: pure functions turning aggregates into English clauses
//! - `report`: assembles the clauses into one paragraph and word-wraps it
//! - `bids` + `dataset`: read dataset_description.json, participants.tsv,
//!   scans files and recording sidecars into a [`DatasetSummary`]
//!
//! The library does NOT read raw recordings or write BIDS datasets; only
//! the sidecar metadata is consulted.
//!
//! # Example Usage
//!
//! ```no_run
//! use bids_report::{Dataset, ReportConfig};
//!
//! let config = ReportConfig::new().with_session("01");
//! let dataset = Dataset::with_config("/data/ds000248", config).unwrap();
//!
//! println!("subjects: {:?}", dataset.subjects().unwrap());
//! println!("{}", dataset.report().unwrap());
//! ```

// Public modules
pub mod bids;
pub mod config;
pub mod dataset;
pub mod report;
pub mod summarize;
pub mod summary;
pub mod types;

// Re-export main types for convenience
pub use config::ReportConfig;
pub use dataset::{make_report, Dataset};
pub use report::{render_report, report_paragraph, wrap_text};
pub use summarize::{
    pretty_list, range_str, summarize_handedness, summarize_sex, NumericRange, RangeStats, Rounded,
};
pub use summary::{
    ChannelCount, ChannelSummary, DatasetSummary, DurationSummary, RecordingSummary,
    DEFAULT_AUTHOR,
};
pub use types::{Handedness, Participant, ReportError, Result, Sex, NA};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
