//! Replay file sources.
//!
//! A source yields whole replay files one at a time. Enumeration and file
//! reads live here so decoding stays free of I/O.

mod directory;

pub use directory::{DirectorySource, PathListSource, REPLAY_EXTENSION, has_replay_extension};

use std::path::PathBuf;

use thiserror::Error;

/// One replay file read fully into memory.
#[derive(Debug, Clone)]
pub struct ReplayFile {
    /// File name used to identify the replay in reports.
    pub name: String,
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

pub trait ReplaySource {
    /// Return the next replay, or `None` when the source is exhausted.
    ///
    /// A [`SourceError::Read`] only affects the file it names; calling again
    /// moves on to the next file.
    fn next_replay(&mut self) -> Result<Option<ReplayFile>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a directory: {}", .path.display())]
    NotADirectory { path: PathBuf },
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    /// Whether the error concerns a single file rather than the whole source.
    pub fn is_per_file(&self) -> bool {
        matches!(self, SourceError::Read { .. })
    }
}

pub(crate) fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
