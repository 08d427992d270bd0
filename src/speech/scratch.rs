//! Scratch files for passing text to command-line speech tools
//!
//! Some tools mangle long or unusual text passed as an argument or through
//! a pipe, so the utterance is written to a uniquely named UTF-8 file and the
//! tool is pointed at that file instead.

use crate::error::SpeechError;
use log::{debug, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Where scratch files are created
#[derive(Debug, Clone)]
pub struct ScratchArea {
    /// `None` means the OS temp directory
    dir: Option<PathBuf>,
    prefix: String,
}

impl ScratchArea {
    /// Scratch files in the OS temp directory
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            dir: None,
            prefix: prefix.into(),
        }
    }

    /// Scratch files in a specific directory
    pub fn in_dir(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: Some(dir.into()),
            prefix: prefix.into(),
        }
    }

    fn create(&self) -> std::io::Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(&self.prefix).suffix(".txt");
        match self.dir {
            Some(ref dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
    }

    /// Write `content` to a fresh file, run `body` with its path, delete it
    ///
    /// The file is removed on every way out of `body`, including unwinding.
    /// A failed removal is logged and does not change the result.
    pub fn with_file<R>(
        &self,
        content: &str,
        body: impl FnOnce(&Path) -> R,
    ) -> Result<R, SpeechError> {
        let mut file = self.create().map_err(SpeechError::Scratch)?;
        file.write_all(content.as_bytes())
            .and_then(|_| file.flush())
            .map_err(SpeechError::Scratch)?;

        let path = file.path().to_path_buf();
        debug!("Wrote {} bytes to scratch file {}", content.len(), path.display());

        // If body panics, dropping `file` still removes it
        let result = body(&path);

        if let Err(e) = file.close() {
            let err = SpeechError::Cleanup {
                path: path.display().to_string(),
                source: e,
            };
            warn!("{}", err);
        }

        Ok(result)
    }
}

impl Default for ScratchArea {
    fn default() -> Self {
        Self::new("chatspeak-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn entries(dir: &Path) -> usize {
        fs::read_dir(dir).expect("read_dir").count()
    }

    #[test]
    fn test_content_is_written_as_utf8() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scratch = ScratchArea::in_dir(dir.path(), "test-");

        let bytes = scratch
            .with_file("测试", |path| fs::read(path).expect("read scratch"))
            .expect("scratch file");

        assert_eq!(bytes, "测试".as_bytes());
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn test_file_removed_after_failing_body() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scratch = ScratchArea::in_dir(dir.path(), "test-");

        let result: Result<(), String> = scratch
            .with_file("hello", |path| {
                assert!(path.exists());
                Err("tool failed".to_string())
            })
            .expect("scratch file");

        assert!(result.is_err());
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn test_file_removed_after_panic() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scratch = ScratchArea::in_dir(dir.path(), "test-");

        let outcome = std::panic::catch_unwind(|| {
            let _ = scratch.with_file("hello", |_| panic!("body panicked"));
        });

        assert!(outcome.is_err());
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn test_names_are_unique() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scratch = ScratchArea::in_dir(dir.path(), "test-");

        let first = scratch.with_file("a", |p| p.to_path_buf()).expect("first");
        let second = scratch.with_file("a", |p| p.to_path_buf()).expect("second");
        assert_ne!(first, second);
        assert!(first.file_name().unwrap().to_string_lossy().starts_with("test-"));
    }

    #[cfg(unix)]
    #[test]
    fn test_body_removing_file_is_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scratch = ScratchArea::in_dir(dir.path(), "test-");

        let value = scratch
            .with_file("a", |p| {
                fs::remove_file(p).expect("remove");
                42
            })
            .expect("cleanup failure is only logged");
        assert_eq!(value, 42);
    }

    #[test]
    fn test_missing_directory_fails_creation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scratch = ScratchArea::in_dir(dir.path().join("missing"), "test-");
        let mut called = false;
        let result = scratch.with_file("a", |_| called = true);
        assert!(matches!(result, Err(SpeechError::Scratch(_))));
        assert!(!called);
    }
}
