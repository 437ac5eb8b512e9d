//! Incremental reader for a log file written by a process under test.
//!
//! A test usually runs the same client several times against one log file.
//! [`LogFile::read_recent`] returns only what was appended since the previous
//! read, so each run's session sees its own lines.

use std::{
    fs::File,
    io::{Read, Seek, SeekFrom},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::error::Result;

/// Log file with a read position.
#[derive(Debug, Clone)]
pub struct LogFile {
    path: PathBuf,
    position: u64,
}

impl LogFile {
    /// Reader positioned at the start of `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), position: 0 }
    }

    /// File being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte offset the next [`read_recent`](Self::read_recent) starts at.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Every line in the file; moves the position to the end.
    pub fn read_all(&mut self) -> Result<Vec<String>> {
        self.position = 0;
        self.read_recent()
    }

    /// Lines appended since the last read.
    ///
    /// A file shorter than the saved position was truncated or rotated and
    /// is read from the start.
    pub fn read_recent(&mut self) -> Result<Vec<String>> {
        let mut file = File::open(&self.path)?;
        let len = file.metadata()?.len();
        if len < self.position {
            debug!(path = %self.path.display(), len, position = self.position, "log shrank, rereading");
            self.position = 0;
        }

        file.seek(SeekFrom::Start(self.position))?;
        let mut raw = Vec::new();
        file.read_to_end(&mut raw)?;
        self.position += raw.len() as u64;

        let lines: Vec<String> = String::from_utf8_lossy(&raw).lines().map(str::to_owned).collect();
        debug!(path = %self.path.display(), lines = lines.len(), "read log lines");
        Ok(lines)
    }

    /// Skip everything currently in the file.
    pub fn mark_end(&mut self) -> Result<()> {
        self.position = std::fs::metadata(&self.path)?.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{fs::OpenOptions, io::Write};

    use super::*;

    fn append(path: &Path, text: &str) {
        let mut file = OpenOptions::new().create(true).append(true).open(path).unwrap();
        file.write_all(text.as_bytes()).unwrap();
    }

    #[test]
    fn reads_only_new_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.log");
        append(&path, "first\nsecond\n");

        let mut log = LogFile::new(&path);
        assert_eq!(log.read_recent().unwrap(), vec!["first", "second"]);
        assert!(log.read_recent().unwrap().is_empty());

        append(&path, "third\n");
        assert_eq!(log.read_recent().unwrap(), vec!["third"]);
        assert_eq!(log.read_all().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn mark_end_skips_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proxy.log");
        append(&path, "startup noise\n");

        let mut log = LogFile::new(&path);
        log.mark_end().unwrap();
        append(&path, "run 1\n");
        assert_eq!(log.read_recent().unwrap(), vec!["run 1"]);
    }

    #[test]
    fn truncated_file_is_reread() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.log");
        append(&path, "a long first run\n");

        let mut log = LogFile::new(&path);
        log.read_recent().unwrap();
        std::fs::write(&path, "new\n").unwrap();
        assert_eq!(log.read_recent().unwrap(), vec!["new"]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut log = LogFile::new("/nonexistent/flightcheck.log");
        assert!(matches!(log.read_recent(), Err(crate::Error::Io(_))));
    }
}
