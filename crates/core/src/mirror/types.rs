//! Types describing the outcome of a mirror walk.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What happened to one file of the input tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileAction {
    Converted,
    Copied,
    Skipped,
}

/// Tally of a mirror walk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorReport {
    /// Audio files transcoded and tagged.
    pub converted: usize,
    /// Images copied.
    pub copied: usize,
    /// Files without a handler.
    pub skipped: usize,
    /// Files whose conversion or copy failed.
    pub failed: usize,
    /// Input paths of the failed files.
    pub failed_files: Vec<PathBuf>,
}

impl MirrorReport {
    /// Counts a handled file.
    pub fn record(&mut self, action: FileAction) {
        match action {
            FileAction::Converted => self.converted += 1,
            FileAction::Copied => self.copied += 1,
            FileAction::Skipped => self.skipped += 1,
        }
    }

    /// Counts a failed file.
    pub fn record_failure(&mut self, path: PathBuf) {
        self.failed += 1;
        self.failed_files.push(path);
    }

    /// Total number of files visited.
    pub fn total(&self) -> usize {
        self.converted + self.copied + self.skipped + self.failed
    }

    /// Whether every visited file was handled.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_tally() {
        let mut report = MirrorReport::default();
        report.record(FileAction::Converted);
        report.record(FileAction::Converted);
        report.record(FileAction::Copied);
        report.record(FileAction::Skipped);
        assert!(report.is_clean());

        report.record_failure(PathBuf::from("/music/Album/03.flac"));
        assert_eq!(report.converted, 2);
        assert_eq!(report.total(), 5);
        assert!(!report.is_clean());
        assert_eq!(report.failed_files, vec![PathBuf::from("/music/Album/03.flac")]);
    }
}
