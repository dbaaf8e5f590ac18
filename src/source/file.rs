//! File-based data source.
//!
//! Polls a JSON file holding the current record, e.g. a local mirror of the
//! database path written by a bridge process.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use super::{DataSource, HeartRateRecord};

/// A data source that reads the current record from a JSON file.
///
/// The source tracks the file's modification time and only returns a record
/// when the file has been updated.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    /// Returns the path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn read_file(&mut self) -> Option<HeartRateRecord> {
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(record) => {
                    self.last_error = None;
                    Some(record)
                }
                Err(e) => {
                    debug!("Skipping malformed record in {}: {}", self.path.display(), e);
                    None
                }
            },
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                None
            }
        }
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<HeartRateRecord> {
        let current_modified = self.get_modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,        // First poll, always read
            (Some(_), None) => false, // File disappeared, keep what we have
            (Some(last), Some(current)) => current > last,
        };

        if !file_changed {
            return None;
        }

        let record = self.read_file()?;
        self.last_modified = current_modified;
        Some(record)
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/heart_rate.json");
        assert_eq!(source.path(), Path::new("/tmp/heart_rate.json"));
        assert_eq!(source.description(), "file: /tmp/heart_rate.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"heartRate": 88, "timestamp": 1700000000000}}"#).unwrap();

        let mut source = FileSource::new(file.path());

        let record = source.poll().unwrap();
        assert_eq!(record.heart_rate, Some(88.0));

        // Unchanged file yields nothing
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/heart_rate.json");

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().is_none());
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_wrong_field_type_is_not_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"heartRate": "fast", "timestamp": 1700000000000}}"#).unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().is_none());
        assert!(source.error().is_none());
    }
}
