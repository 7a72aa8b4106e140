//! osrgraph core library for offline osu! replay (`.osr`) analysis.
//!
//! This crate implements the pipeline used by the CLI: replay sources feed
//! whole files to the format decoder (layout/reader/parser), the analysis
//! layer derives accuracy, and the export layer writes CSV rows or a JSON
//! report. Decoding is byte-oriented and side-effect free; all file I/O is
//! isolated in `source`.
//!
//! Invariants:
//! - The read cursor never moves backwards and never past the buffer end.
//! - A replay either decodes completely or yields an error; partial records
//!   are never returned.
//! - Non-fatal conditions are returned as [`Diagnostic`] values, never
//!   written to a global logger by the decoder.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use osrgraph_core::{BatchOptions, analyze_directory};
//!
//! let report = analyze_directory(Path::new("osu!/Data/r"), BatchOptions::default())?;
//! println!("decoded {} replays", report.entries.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize, Serializer};

mod analysis;
mod diagnostics;
mod export;
mod format;
mod source;

pub use analysis::{
    Accuracy, AccuracyOutcome, BatchError, BatchOptions, BatchReport, FailedReplay,
    ReplayAnalysis, ReplayEntry, analyze_directory, analyze_replay, analyze_source,
    derive_accuracy, derive_accuracy_from_counts,
};
pub use diagnostics::{Diagnostic, DiagnosticSummary};
pub use export::{ABSENT_TEXT, CSV_HEADER, ExportError, ReplayRow, write_csv, write_json};
pub use format::error::ReplayError;
pub use format::layout::MIN_LEN as MIN_REPLAY_LEN;
pub use format::mods::Mods;
pub use format::reader::{ReplayReader, uleb128_len};
pub use format::{DecodedReplay, decode_replay};
pub use source::{
    DirectorySource, PathListSource, REPLAY_EXTENSION, ReplayFile, ReplaySource, SourceError,
    has_replay_extension,
};

/// Current JSON report schema version.
pub const REPORT_VERSION: u32 = 1;

/// Game mode byte at the start of every replay.
///
/// # Examples
/// ```
/// use osrgraph_core::GameMode;
///
/// assert_eq!(GameMode::from(0), GameMode::Standard);
/// assert_eq!(GameMode::from(9), GameMode::Unknown(9));
/// assert_eq!(GameMode::from(9).id(), 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Standard,
    Taiko,
    Catch,
    Mania,
    Unknown(u8),
}

impl GameMode {
    pub fn id(self) -> u8 {
        match self {
            GameMode::Standard => format::layout::MODE_STANDARD,
            GameMode::Taiko => format::layout::MODE_TAIKO,
            GameMode::Catch => format::layout::MODE_CATCH,
            GameMode::Mania => format::layout::MODE_MANIA,
            GameMode::Unknown(id) => id,
        }
    }

    pub fn is_standard(self) -> bool {
        self == GameMode::Standard
    }
}

impl From<u8> for GameMode {
    fn from(value: u8) -> Self {
        match value {
            format::layout::MODE_STANDARD => GameMode::Standard,
            format::layout::MODE_TAIKO => GameMode::Taiko,
            format::layout::MODE_CATCH => GameMode::Catch,
            format::layout::MODE_MANIA => GameMode::Mania,
            other => GameMode::Unknown(other),
        }
    }
}

/// Judgement counters, in stored order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitCounts {
    pub count_300: u16,
    pub count_100: u16,
    pub count_50: u16,
    pub count_geki: u16,
    pub count_katu: u16,
    pub count_miss: u16,
}

/// One decoded replay, fields in container order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayRecord {
    pub mode: GameMode,
    /// Client build date as `yyyymmdd`.
    pub game_version: u32,
    /// MD5 of the beatmap, absent in some very old replays.
    pub beatmap_hash: Option<String>,
    pub player_name: Option<String>,
    pub replay_hash: Option<String>,
    pub counts: HitCounts,
    pub score: u32,
    pub max_combo: u16,
    /// Perfect combo flag.
    pub full_combo: bool,
    pub mods: Mods,
    /// Comma-separated `time|life` pairs, left undecoded.
    pub life_bar: Option<String>,
    /// .NET ticks (100 ns since 0001-01-01).
    pub timestamp: u64,
    /// LZMA-compressed motion data, kept opaque. Reports carry only its length.
    #[serde(
        rename = "replay_data_len",
        serialize_with = "serialize_blob_len",
        skip_deserializing
    )]
    pub replay_data: Vec<u8>,
    pub online_score_id: u64,
}

fn serialize_blob_len<S: Serializer>(blob: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(blob.len() as u64)
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

impl ToolInfo {
    pub fn current() -> Self {
        Self {
            name: "osrgraph".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
