//! Outcome of one translation run

use serde::Serialize;
use std::path::PathBuf;

/// Files produced and tasks that failed during a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranslationReport {
    /// Produced files in completion order, each listed once
    pub files: Vec<PathBuf>,

    /// Labels of the tasks that failed
    pub failed: Vec<String>,

    /// Tasks that had nothing to write
    pub empty: usize,

    /// Whether the run was cancelled before every task completed
    pub cancelled: bool,
}

impl TranslationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a produced file, ignoring repeats
    pub fn record_file(&mut self, path: PathBuf) {
        if !self.files.contains(&path) {
            self.files.push(path);
        }
    }

    pub fn record_failure(&mut self, label: impl Into<String>) {
        self.failed.push(label.into());
    }

    pub fn record_empty(&mut self) {
        self.empty += 1;
    }

    /// Distinct files plus failed and empty tasks
    pub fn task_count(&self) -> usize {
        self.files.len() + self.failed.len() + self.empty
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}
