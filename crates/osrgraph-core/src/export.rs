//! CSV and JSON export of batch results.
//!
//! The CSV layout is fixed: one header row, then one row per decoded replay
//! in batch order. Absent strings and undefined accuracy are written as `-1`.

use std::io::Write;

use csv::WriterBuilder;
use serde::Serialize;
use thiserror::Error;

use crate::analysis::{Accuracy, BatchReport, ReplayAnalysis, ReplayEntry};

pub const CSV_HEADER: [&str; 11] = [
    "game version",
    "beatmap hash",
    "player name",
    "300s",
    "100s",
    "50s",
    "misses",
    "score",
    "combo",
    "timestamp",
    "acc",
];

/// Text written in place of an absent string field.
pub const ABSENT_TEXT: &str = "-1";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One CSV row, columns in [`CSV_HEADER`] order.
///
/// # Examples
/// ```
/// use osrgraph_core::{MIN_REPLAY_LEN, ReplayRow, analyze_replay};
///
/// let analysis = analyze_replay(&vec![0u8; MIN_REPLAY_LEN])?;
/// let row = ReplayRow::from_analysis(&analysis);
/// assert_eq!(row.player_name, "-1");
/// # Ok::<(), osrgraph_core::ReplayError>(())
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ReplayRow<'a> {
    pub game_version: u32,
    pub beatmap_hash: &'a str,
    pub player_name: &'a str,
    pub count_300: u16,
    pub count_100: u16,
    pub count_50: u16,
    pub count_miss: u16,
    pub score: u32,
    pub max_combo: u16,
    pub timestamp: u64,
    pub accuracy: Accuracy,
}

impl<'a> ReplayRow<'a> {
    pub fn from_analysis(analysis: &'a ReplayAnalysis) -> Self {
        let record = &analysis.record;
        Self {
            game_version: record.game_version,
            beatmap_hash: record.beatmap_hash.as_deref().unwrap_or(ABSENT_TEXT),
            player_name: record.player_name.as_deref().unwrap_or(ABSENT_TEXT),
            count_300: record.counts.count_300,
            count_100: record.counts.count_100,
            count_50: record.counts.count_50,
            count_miss: record.counts.count_miss,
            score: record.score,
            max_combo: record.max_combo,
            timestamp: record.timestamp,
            accuracy: analysis.accuracy,
        }
    }
}

/// Write the header row followed by one row per entry.
///
/// The header is written even when `entries` is empty.
pub fn write_csv<W: Write>(writer: W, entries: &[ReplayEntry]) -> Result<(), ExportError> {
    let mut out = WriterBuilder::new().has_headers(false).from_writer(writer);
    out.write_record(CSV_HEADER)?;
    for entry in entries {
        out.serialize(ReplayRow::from_analysis(&entry.analysis))?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(
    mut writer: W,
    report: &BatchReport,
    pretty: bool,
) -> Result<(), ExportError> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, report)?;
    } else {
        serde_json::to_writer(&mut writer, report)?;
    }
    writer.flush()?;
    Ok(())
}
