//! Batch processing
//!
//! Files are independent: [`BatchRunner`] transforms them on the rayon pool
//! and records one [`FileReport`] per file. A failing file is reported and
//! never stops the others.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use remodel_rules::Rule;
use serde::Serialize;

use crate::engine::{Engine, SourceFile};
use crate::error::TransformError;

/// Per-file result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// At least one rule rewrote the file
    Changed,
    /// No rule matched
    Unchanged,
    /// Parsing, a rule, printing or I/O failed
    Failed,
}

/// Report line for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// File path
    pub path: PathBuf,
    /// Result
    pub status: FileStatus,
    /// Rules that changed the file
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<&'static str>,
    /// Error category (`parse`, `rule`, `serialize`, `io`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    /// Error message for failed files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// New text for changed files
    #[serde(skip)]
    pub output: Option<String>,
}

impl FileReport {
    /// Report a file that could not be read
    #[must_use]
    pub fn io_failure(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        Self {
            path: path.into(),
            status: FileStatus::Failed,
            rules: Vec::new(),
            error_kind: Some("io"),
            error: Some(error.to_string()),
            output: None,
        }
    }

    fn failure(path: PathBuf, error: &TransformError) -> Self {
        Self {
            path,
            status: FileStatus::Failed,
            rules: Vec::new(),
            error_kind: Some(error.kind()),
            error: Some(error.to_string()),
            output: None,
        }
    }
}

/// Counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    /// Files processed
    pub files: usize,
    /// Files rewritten
    pub changed: usize,
    /// Files left alone
    pub unchanged: usize,
    /// Files that failed
    pub failed: usize,
}

impl Totals {
    fn tally(files: &[FileReport]) -> Self {
        let mut totals = Self::default();
        for file in files {
            totals.count(file.status);
        }
        totals
    }

    fn count(&mut self, status: FileStatus) {
        self.files += 1;
        match status {
            FileStatus::Changed => self.changed += 1,
            FileStatus::Unchanged => self.unchanged += 1,
            FileStatus::Failed => self.failed += 1,
        }
    }
}

/// Result of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// One entry per file, in input order
    pub files: Vec<FileReport>,
    /// Counts per status
    pub totals: Totals,
}

impl BatchReport {
    /// Build from file reports
    #[must_use]
    pub fn from_files(files: Vec<FileReport>) -> Self {
        let totals = Totals::tally(&files);
        Self { files, totals }
    }

    /// Add one file report
    pub fn push(&mut self, file: FileReport) {
        self.totals.count(file.status);
        self.files.push(file);
    }

    /// Turn the report for `path` into an I/O failure, dropping its output
    ///
    /// Used when a changed file cannot be written back. Returns `false` if
    /// no report exists for `path`.
    pub fn mark_io_failure(&mut self, path: &Path, error: &std::io::Error) -> bool {
        let Some(file) = self.files.iter_mut().find(|f| f.path == path) else {
            return false;
        };
        *file = FileReport::io_failure(path, error);
        self.totals = Totals::tally(&self.files);
        true
    }

    /// Check if any file failed
    #[inline]
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.totals.failed > 0
    }

    /// Find the report for a path
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&FileReport> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Changed files with their new text
    pub fn changed(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.files
            .iter()
            .filter_map(|f| f.output.as_deref().map(|text| (f.path.as_path(), text)))
    }

    /// Render as pretty JSON
    ///
    /// # Errors
    /// Returns the serializer error; not expected for this type.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Runs a rule chain over many files in parallel
#[derive(Debug, Clone, Copy)]
pub struct BatchRunner<'e> {
    engine: &'e Engine,
}

impl<'e> BatchRunner<'e> {
    /// Create runner over an engine
    #[inline]
    #[must_use]
    pub fn new(engine: &'e Engine) -> Self {
        Self { engine }
    }

    /// Apply `rules` in order to every file
    #[must_use]
    pub fn run(&self, files: Vec<SourceFile>, rules: &[&dyn Rule]) -> BatchReport {
        tracing::info!(files = files.len(), rules = rules.len(), "starting batch");
        let reports: Vec<FileReport> = files
            .into_par_iter()
            .map(|file| self.run_one(file, rules))
            .collect();
        let report = BatchReport::from_files(reports);
        tracing::info!(
            changed = report.totals.changed,
            unchanged = report.totals.unchanged,
            failed = report.totals.failed,
            "batch finished"
        );
        report
    }

    fn run_one(&self, file: SourceFile, rules: &[&dyn Rule]) -> FileReport {
        match self.engine.apply_chain(rules, &file) {
            Ok(result) if result.is_changed() => FileReport {
                path: file.path,
                status: FileStatus::Changed,
                rules: result.applied,
                error_kind: None,
                error: None,
                output: Some(result.text),
            },
            Ok(_) => FileReport {
                path: file.path,
                status: FileStatus::Unchanged,
                rules: Vec::new(),
                error_kind: None,
                error: None,
                output: None,
            },
            Err(e) => {
                tracing::warn!(path = %file.path.display(), error = %e, "file failed");
                FileReport::failure(file.path, &e)
            }
        }
    }
}
