use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{debug, warn};

use crate::diagnostics::Diagnostic;
use crate::format::decode_replay;
use crate::format::error::ReplayError;
use crate::source::{DirectorySource, ReplayFile, ReplaySource, SourceError, display_name};
use crate::{REPORT_VERSION, ReplayRecord, ToolInfo};

mod accuracy;

pub use accuracy::{Accuracy, AccuracyOutcome, derive_accuracy, derive_accuracy_from_counts};

/// .NET ticks (100 ns) between 0001-01-01 and the Unix epoch.
const TICKS_AT_UNIX_EPOCH: i128 = 621_355_968_000_000_000;
const NANOS_PER_TICK: i128 = 100;

const READ_FAILURE_ID: &str = "OSR-READ";

/// Decoded record, its accuracy and every diagnostic in emission order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayAnalysis {
    pub record: ReplayRecord,
    pub accuracy: Accuracy,
    /// RFC3339 form of the record timestamp, when representable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub played_at: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ReplayAnalysis {
    pub fn has_diagnostic(&self, id: &str) -> bool {
        self.diagnostics.iter().any(|d| d.id() == id)
    }

    pub fn is_unsupported_mode(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::UnsupportedMode { .. }))
    }
}

/// Decode one replay buffer and derive its accuracy.
///
/// # Examples
/// ```
/// use osrgraph_core::{Accuracy, MIN_REPLAY_LEN, analyze_replay};
///
/// let mut bytes = vec![0u8; MIN_REPLAY_LEN];
/// bytes[8..10].copy_from_slice(&10u16.to_le_bytes());
/// let analysis = analyze_replay(&bytes)?;
/// assert_eq!(analysis.accuracy, Accuracy::Defined(1.0));
/// # Ok::<(), osrgraph_core::ReplayError>(())
/// ```
pub fn analyze_replay(bytes: &[u8]) -> Result<ReplayAnalysis, ReplayError> {
    let decoded = decode_replay(bytes)?;
    let mut diagnostics = decoded.diagnostics;
    let outcome = derive_accuracy(&decoded.record);
    diagnostics.extend(outcome.diagnostic);
    let played_at = ticks_to_rfc3339(decoded.record.timestamp);

    Ok(ReplayAnalysis {
        record: decoded.record,
        accuracy: outcome.accuracy,
        played_at,
        diagnostics,
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Leave replays of other game modes out of the entries.
    pub standard_only: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayEntry {
    pub file: String,
    #[serde(flatten)]
    pub analysis: ReplayAnalysis,
}

/// A replay that could not be read or decoded.
#[derive(Debug, Clone, Serialize)]
pub struct FailedReplay {
    pub file: String,
    /// Stable error identifier (e.g., `OSR-OUT-OF-BOUNDS`).
    pub id: String,
    pub message: String,
}

/// Result of a batch run, entries in source order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub report_version: u32,
    pub tool: ToolInfo,
    pub files_total: u64,
    /// Replays left out by [`BatchOptions::standard_only`].
    pub skipped: u64,
    pub entries: Vec<ReplayEntry>,
    pub failures: Vec<FailedReplay>,
}

impl BatchReport {
    fn new() -> Self {
        Self {
            report_version: REPORT_VERSION,
            tool: ToolInfo::current(),
            files_total: 0,
            skipped: 0,
            entries: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

pub fn analyze_directory(path: &Path, options: BatchOptions) -> Result<BatchReport, BatchError> {
    let source = DirectorySource::open(path)?;
    analyze_source(source, options)
}

/// Decode every replay of a source.
///
/// A replay that fails to read or decode is recorded in
/// [`BatchReport::failures`] and the batch continues; only errors from the
/// source as a whole abort.
pub fn analyze_source<S: ReplaySource>(
    mut source: S,
    options: BatchOptions,
) -> Result<BatchReport, BatchError> {
    let mut report = BatchReport::new();

    loop {
        let file = match source.next_replay() {
            Ok(Some(file)) => file,
            Ok(None) => break,
            Err(SourceError::Read { path, source: err }) => {
                report.files_total += 1;
                let file = display_name(&path);
                warn!(file = %file, error = %err, "failed to read replay");
                report.failures.push(FailedReplay {
                    file,
                    id: READ_FAILURE_ID.to_string(),
                    message: err.to_string(),
                });
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        report.files_total += 1;
        analyze_file(&mut report, file, options);
    }

    debug!(
        files = report.files_total,
        decoded = report.entries.len(),
        failed = report.failures.len(),
        skipped = report.skipped,
        "batch finished"
    );
    Ok(report)
}

fn analyze_file(report: &mut BatchReport, file: ReplayFile, options: BatchOptions) {
    debug!(file = %file.name, bytes = file.bytes.len(), "decoding replay");
    let analysis = match analyze_replay(&file.bytes) {
        Ok(analysis) => analysis,
        Err(err) => {
            warn!(file = %file.name, error = %err, "skipping malformed replay");
            report.failures.push(FailedReplay {
                file: file.name,
                id: err.id().to_string(),
                message: err.to_string(),
            });
            return;
        }
    };

    for diagnostic in &analysis.diagnostics {
        warn!(file = %file.name, id = diagnostic.id(), "{diagnostic}");
    }

    if options.standard_only && analysis.is_unsupported_mode() {
        debug!(file = %file.name, "skipping non-standard replay");
        report.skipped += 1;
        return;
    }

    report.entries.push(ReplayEntry {
        file: file.name,
        analysis,
    });
}

fn ticks_to_rfc3339(ticks: u64) -> Option<String> {
    let nanos = (i128::from(ticks) - TICKS_AT_UNIX_EPOCH) * NANOS_PER_TICK;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{BatchOptions, analyze_source, ticks_to_rfc3339};
    use crate::format::layout;
    use crate::source::{ReplayFile, ReplaySource, SourceError};

    struct MemorySource {
        items: Vec<Result<ReplayFile, SourceError>>,
    }

    impl MemorySource {
        fn new(mut items: Vec<Result<ReplayFile, SourceError>>) -> Self {
            items.reverse();
            Self { items }
        }
    }

    impl ReplaySource for MemorySource {
        fn next_replay(&mut self) -> Result<Option<ReplayFile>, SourceError> {
            self.items.pop().transpose()
        }
    }

    fn file(name: &str, bytes: Vec<u8>) -> Result<ReplayFile, SourceError> {
        Ok(ReplayFile {
            name: name.to_string(),
            path: PathBuf::from(name),
            bytes,
        })
    }

    fn replay(mode: u8, n300: u16) -> Vec<u8> {
        let mut bytes = vec![0u8; layout::MIN_LEN];
        bytes[0] = mode;
        bytes[8..10].copy_from_slice(&n300.to_le_bytes());
        bytes
    }

    #[test]
    fn ticks_convert_from_dotnet_epoch() {
        assert_eq!(
            ticks_to_rfc3339(621_355_968_000_000_000).as_deref(),
            Some("1970-01-01T00:00:00Z")
        );
        assert_eq!(
            ticks_to_rfc3339(637_355_968_000_000_000).as_deref(),
            Some("2020-09-13T12:26:40Z")
        );
        assert_eq!(ticks_to_rfc3339(u64::MAX), None);
    }

    #[test]
    fn batch_continues_past_failures() {
        let source = MemorySource::new(vec![
            file("good.osr", replay(layout::MODE_STANDARD, 4)),
            file("short.osr", vec![0u8; 3]),
            Err(SourceError::Read {
                path: PathBuf::from("dir/locked.osr"),
                source: std::io::Error::other("denied"),
            }),
            file("also_good.osr", replay(layout::MODE_STANDARD, 1)),
        ]);

        let report = analyze_source(source, BatchOptions::default()).unwrap();
        assert_eq!(report.files_total, 4);
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].file, "good.osr");
        assert_eq!(report.entries[1].file, "also_good.osr");
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].file, "short.osr");
        assert_eq!(report.failures[0].id, "OSR-OUT-OF-BOUNDS");
        assert_eq!(report.failures[1].file, "locked.osr");
        assert_eq!(report.failures[1].id, "OSR-READ");
    }

    #[test]
    fn batch_keeps_other_modes_by_default() {
        let source = MemorySource::new(vec![file("taiko.osr", replay(layout::MODE_TAIKO, 1))]);
        let report = analyze_source(source, BatchOptions::default()).unwrap();
        assert_eq!(report.entries.len(), 1);
        assert!(report.entries[0].analysis.is_unsupported_mode());
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn batch_standard_only_skips_other_modes() {
        let source = MemorySource::new(vec![
            file("taiko.osr", replay(layout::MODE_TAIKO, 1)),
            file("std.osr", replay(layout::MODE_STANDARD, 1)),
        ]);
        let options = BatchOptions {
            standard_only: true,
        };
        let report = analyze_source(source, options).unwrap();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].file, "std.osr");
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn source_level_error_aborts() {
        let source = MemorySource::new(vec![Err(SourceError::NotADirectory {
            path: PathBuf::from("x"),
        })]);
        assert!(analyze_source(source, BatchOptions::default()).is_err());
    }
}
