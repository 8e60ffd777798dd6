//! participants.tsv reader
//!
//! Only `participant_id` is required. `sex` (or `gender`), `hand` and
//! `age` are optional. A column holding values the report cannot interpret
//! is dropped as a whole, so a partly garbled column never skews counts.

use super::tsv::TsvTable;
use crate::types::{is_na, Handedness, Participant, Result, Sex};
use std::path::Path;

/// Read the participant cohort from a participants.tsv file
pub fn read_participants(path: &Path) -> Result<Vec<Participant>> {
    log::info!("Summarizing participants.tsv {:?}", path);
    let table = TsvTable::read(path)?;
    participants_from_table(&table)
}

/// Build the participant cohort from a parsed participants.tsv table
pub fn participants_from_table(table: &TsvTable) -> Result<Vec<Participant>> {
    let ids = table.require_column("participant_id")?;
    let mut participants: Vec<Participant> = ids.iter().map(|id| Participant::new(*id)).collect();

    // Phrasing works for both sex and gender
    let sex_column = table.column("sex").or_else(|| table.column("gender"));
    if let Some(values) = sex_column {
        let sexes: Vec<Option<Sex>> = values.iter().map(|v| Sex::parse(v)).collect();
        if sexes.contains(&Some(Sex::Other)) {
            log::warn!("Unrecognized sex values in {:?}, treating sex as unknown", table.path());
        } else {
            for (participant, sex) in participants.iter_mut().zip(sexes) {
                participant.sex = sex;
            }
        }
    }

    if let Some(values) = table.column("hand") {
        let hands: Vec<Option<Handedness>> = values.iter().map(|v| Handedness::parse(v)).collect();
        if hands.contains(&Some(Handedness::Other)) {
            log::warn!(
                "Unrecognized handedness values in {:?}, treating handedness as unknown",
                table.path()
            );
        } else {
            for (participant, hand) in participants.iter_mut().zip(hands) {
                participant.handedness = hand;
            }
        }
    }

    if let Some(values) = table.column("age") {
        match parse_ages(&values) {
            Some(ages) => {
                for (participant, age) in participants.iter_mut().zip(ages) {
                    participant.age = age;
                }
            }
            None => {
                log::warn!("Non-numeric ages in {:?}, treating ages as unknown", table.path());
            }
        }
    }

    Ok(participants)
}

/// `None` if any value is neither "n/a" nor a finite number
fn parse_ages(values: &[&str]) -> Option<Vec<Option<f64>>> {
    values
        .iter()
        .map(|value| {
            if is_na(value) {
                return Some(None);
            }
            value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|age| age.is_finite())
                .map(Some)
        })
        .collect()
}
