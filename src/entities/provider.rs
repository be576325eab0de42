//! Lazy filesystem enumeration.
//!
//! All enumeration is pull-based: one entity is materialized at a time so
//! a recursive walk over a large tree never holds more than a single
//! entry's metadata in memory. Unreadable directories are skipped with a
//! console alert rather than aborting the walk.

use std::fs::File;
use std::io::{self, BufRead, BufReader, ErrorKind};
use std::iter;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use super::types::DataLine;
use crate::output;

/// Error raised while streaming data lines out of files.
#[derive(Debug, Error)]
pub enum ReadError {
    /// File content is not valid text; only `mode bytes` can read it.
    #[error("cannot read '{path}' in 'text' mode; set mode to 'bytes' to read byte content")]
    NotText { path: PathBuf },
    /// Underlying I/O failure.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// How file content is read during a data search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    #[default]
    Text,
    Bytes,
}

fn walk(root: &Path, recursive: bool) -> impl Iterator<Item = walkdir::DirEntry> {
    let max_depth = if recursive { usize::MAX } else { 1 };

    WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                output::alert(&format!("Skipping unreadable entry: {err}"));
                None
            }
        })
}

/// Lazily yields the files under `root`, descending into subdirectories
/// when `recursive` is set.
pub fn files(root: &Path, recursive: bool) -> impl Iterator<Item = PathBuf> {
    walk(root, recursive)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
}

/// Lazily yields the subdirectories under `root`, descending into them
/// when `recursive` is set. The root itself is never yielded.
pub fn directories(root: &Path, recursive: bool) -> impl Iterator<Item = PathBuf> {
    walk(root, recursive)
        .filter(|entry| entry.file_type().is_dir())
        .map(walkdir::DirEntry::into_path)
}

struct OpenFile {
    path: PathBuf,
    reader: BufReader<File>,
    lineno: u64,
}

impl OpenFile {
    fn read_next(&mut self, mode: ReadMode) -> Result<Option<DataLine>, ReadError> {
        match mode {
            ReadMode::Text => {
                let mut line = String::new();
                match self.reader.read_line(&mut line) {
                    Ok(0) => Ok(None),
                    Ok(_) => {
                        self.lineno += 1;
                        trim_newline(&mut line);
                        Ok(Some(DataLine::new(self.path.clone(), self.lineno, line)))
                    }
                    Err(err) if err.kind() == ErrorKind::InvalidData => Err(ReadError::NotText {
                        path: self.path.clone(),
                    }),
                    Err(source) => Err(ReadError::Io {
                        path: self.path.clone(),
                        source,
                    }),
                }
            }
            ReadMode::Bytes => {
                let mut buf = Vec::new();
                match self.reader.read_until(b'\n', &mut buf) {
                    Ok(0) => Ok(None),
                    Ok(_) => {
                        self.lineno += 1;
                        let mut line = String::from_utf8_lossy(&buf).into_owned();
                        trim_newline(&mut line);
                        Ok(Some(DataLine::new(self.path.clone(), self.lineno, line)))
                    }
                    Err(source) => Err(ReadError::Io {
                        path: self.path.clone(),
                        source,
                    }),
                }
            }
        }
    }
}

fn trim_newline(line: &mut String) {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
}

/// Streams [`DataLine`] entities out of a file, or out of every file under
/// a directory, one line at a time.
pub struct DataLineIter {
    files: Box<dyn Iterator<Item = PathBuf>>,
    mode: ReadMode,
    current: Option<OpenFile>,
}

impl DataLineIter {
    #[must_use]
    pub fn new(path: &Path, recursive: bool, mode: ReadMode) -> Self {
        let sources: Box<dyn Iterator<Item = PathBuf>> = if path.is_file() {
            Box::new(iter::once(path.to_path_buf()))
        } else {
            Box::new(files(path, recursive))
        };

        Self {
            files: sources,
            mode,
            current: None,
        }
    }
}

impl Iterator for DataLineIter {
    type Item = Result<DataLine, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(open) = self.current.as_mut() {
                match open.read_next(self.mode) {
                    Ok(Some(line)) => return Some(Ok(line)),
                    Ok(None) => self.current = None,
                    Err(err) => {
                        self.current = None;
                        return Some(Err(err));
                    }
                }
            } else {
                let path = self.files.next()?;
                match File::open(&path) {
                    Ok(file) => {
                        self.current = Some(OpenFile {
                            path,
                            reader: BufReader::new(file),
                            lineno: 0,
                        });
                    }
                    Err(source) => return Some(Err(ReadError::Io { path, source })),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::tempdir;

    fn touch(path: &Path, content: &[u8]) {
        let mut file = fs::File::create(path).unwrap();
        file.write_all(content).unwrap();
    }

    #[test]
    fn test_non_recursive_lists_immediate_files_only() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("a.txt"), b"a");
        fs::create_dir(dir.path().join("sub")).unwrap();
        touch(&dir.path().join("sub/b.txt"), b"b");

        let mut names: Vec<String> = files(dir.path(), false)
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, ["a.txt"]);
    }

    #[test]
    fn test_recursive_lists_full_subtree() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("a.txt"), b"a");
        fs::create_dir(dir.path().join("sub")).unwrap();
        touch(&dir.path().join("sub/b.txt"), b"b");

        let mut names: Vec<String> = files(dir.path(), true)
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, ["a.txt", "b.txt"]);
    }

    #[test]
    fn test_directories_excludes_root() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("one")).unwrap();
        fs::create_dir(dir.path().join("one/two")).unwrap();

        let shallow: Vec<PathBuf> = directories(dir.path(), false).collect();
        assert_eq!(shallow.len(), 1);

        let deep: Vec<PathBuf> = directories(dir.path(), true).collect();
        assert_eq!(deep.len(), 2);
    }

    #[test]
    fn test_datalines_are_one_based_and_trimmed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        touch(&path, b"first\nsecond\r\nthird");

        let lines: Vec<DataLine> = DataLineIter::new(&path, false, ReadMode::Text)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].lineno(), 1);
        assert_eq!(lines[0].line(), "first");
        assert_eq!(lines[1].line(), "second");
        assert_eq!(lines[2].line(), "third");
    }

    #[test]
    fn test_binary_content_fails_in_text_mode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        touch(&path, &[0xff, 0xfe, 0x00, b'\n', 0x01]);

        let result: Result<Vec<DataLine>, ReadError> =
            DataLineIter::new(&path, false, ReadMode::Text).collect();
        assert!(matches!(result, Err(ReadError::NotText { .. })));

        let byte_lines: Vec<DataLine> = DataLineIter::new(&path, false, ReadMode::Bytes)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(byte_lines.len(), 2);
    }
}
