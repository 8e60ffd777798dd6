//! BIDS metadata readers
//!
//! This module contains the readers for the tabular and JSON sidecar files
//! of a BIDS dataset and the aggregation of per-scan facts.

pub mod channels;
pub mod entities;
pub mod participants;
pub mod recordings;
pub mod scans;
pub mod sidecar;
pub mod tsv;

// Re-export key types for convenience
pub use entities::{BidsFileName, EMPTYROOM_SUBJECT, KNOWN_DATATYPES};
pub use recordings::{RecordingAccumulator, ScanFacts};
pub use scans::ScanEntry;
pub use sidecar::{DatasetDescription, RecordingSidecar};
pub use tsv::TsvTable;
