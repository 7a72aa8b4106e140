use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use super::{ReplayFile, ReplaySource, SourceError, display_name};

pub const REPLAY_EXTENSION: &str = "osr";

/// Every `*.osr` file directly inside a directory, in file-name order.
pub struct DirectorySource {
    pending: PathListSource,
}

impl DirectorySource {
    pub fn open(dir: &Path) -> Result<Self, SourceError> {
        if !dir.is_dir() {
            return Err(SourceError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && has_replay_extension(&path) {
                paths.push(path);
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        Ok(Self {
            pending: PathListSource::new(paths),
        })
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl ReplaySource for DirectorySource {
    fn next_replay(&mut self) -> Result<Option<ReplayFile>, SourceError> {
        self.pending.next_replay()
    }
}

/// Explicit list of replay paths, yielded in the given order.
pub struct PathListSource {
    paths: VecDeque<PathBuf>,
}

impl PathListSource {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl ReplaySource for PathListSource {
    fn next_replay(&mut self) -> Result<Option<ReplayFile>, SourceError> {
        let Some(path) = self.paths.pop_front() else {
            return Ok(None);
        };
        let bytes = fs::read(&path).map_err(|source| SourceError::Read {
            path: path.clone(),
            source,
        })?;
        Ok(Some(ReplayFile {
            name: display_name(&path),
            path,
            bytes,
        }))
    }
}

pub fn has_replay_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(REPLAY_EXTENSION))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::TempDir;

    use super::{DirectorySource, PathListSource, has_replay_extension};
    use crate::source::{ReplaySource, SourceError};

    #[test]
    fn extension_is_case_insensitive() {
        assert!(has_replay_extension(Path::new("a.osr")));
        assert!(has_replay_extension(Path::new("b.OSR")));
        assert!(!has_replay_extension(Path::new("c.osu")));
        assert!(!has_replay_extension(Path::new("osr")));
    }

    #[test]
    fn directory_lists_replays_sorted() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.osr"), [2u8]).unwrap();
        fs::write(temp.path().join("a.osr"), [1u8]).unwrap();
        fs::write(temp.path().join("notes.txt"), b"skip").unwrap();
        fs::create_dir(temp.path().join("nested.osr")).unwrap();

        let mut source = DirectorySource::open(temp.path()).unwrap();
        assert_eq!(source.len(), 2);

        let first = source.next_replay().unwrap().unwrap();
        assert_eq!(first.name, "a.osr");
        assert_eq!(first.bytes, vec![1]);
        let second = source.next_replay().unwrap().unwrap();
        assert_eq!(second.name, "b.osr");
        assert!(source.next_replay().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn directory_follows_symlinked_replays() {
        let temp = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let target = elsewhere.path().join("real.osr");
        fs::write(&target, [7u8]).unwrap();
        std::os::unix::fs::symlink(&target, temp.path().join("linked.osr")).unwrap();
        let dangling = temp.path().join("dangling.osr");
        std::os::unix::fs::symlink(temp.path().join("gone.osr"), dangling).unwrap();

        let mut source = DirectorySource::open(temp.path()).unwrap();
        assert_eq!(source.len(), 1);
        let file = source.next_replay().unwrap().unwrap();
        assert_eq!(file.name, "linked.osr");
        assert_eq!(file.bytes, vec![7]);
    }

    #[test]
    fn directory_rejects_files() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.osr");
        fs::write(&file, [0u8]).unwrap();
        let err = match DirectorySource::open(&file) {
            Ok(_) => panic!("expected a file path to be rejected"),
            Err(err) => err,
        };
        assert!(matches!(err, SourceError::NotADirectory { .. }));
    }

    #[test]
    fn missing_file_is_per_file_error() {
        let temp = TempDir::new().unwrap();
        let present = temp.path().join("present.osr");
        fs::write(&present, [7u8]).unwrap();

        let mut source = PathListSource::new(vec![temp.path().join("missing.osr"), present]);
        let err = source.next_replay().unwrap_err();
        assert!(err.is_per_file());
        assert!(err.to_string().contains("missing.osr"));

        let next = source.next_replay().unwrap().unwrap();
        assert_eq!(next.name, "present.osr");
    }
}
