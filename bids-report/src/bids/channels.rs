//! *_channels.tsv reader

use super::tsv::TsvTable;
use crate::summary::ChannelCount;
use crate::types::Result;
use std::path::Path;

/// Count all channels of a recording and the ones marked good.
///
/// Without a `status` column every channel counts as good.
pub fn read_channel_count(path: &Path) -> Result<ChannelCount> {
    let table = TsvTable::read(path)?;
    channel_count_from_table(&table)
}

pub fn channel_count_from_table(table: &TsvTable) -> Result<ChannelCount> {
    let total = table.require_column("name")?.len();
    let good = match table.column("status") {
        Some(status) => status
            .iter()
            .filter(|s| s.eq_ignore_ascii_case("good"))
            .count(),
        None => total,
    };

    Ok(ChannelCount { total, good })
}
