//! Bounded concurrent execution of output tasks
//!
//! Every output file of a run is produced by one blocking task. Tasks run on
//! tokio's blocking pool, at most `workers` at a time, and are awaited
//! together. A failing task is logged and reported by label while the others
//! keep running.
//!
//! ## Architecture
//!
//! - [`WriteScheduler`] - submission and completion loop
//! - [`report`] - [`TranslationReport`] summarizing a run
//!
//! The soft time budget never aborts work: once it elapses the labels of the
//! unfinished tasks are logged once and waiting continues. Only cancellation
//! stops the run early.

pub mod report;

#[cfg(test)]
pub mod tests;

pub use report::TranslationReport;

use crate::{Error, Result};
use indicatif::ProgressBar;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Outcome of one task: the written file, or nothing to write
pub type TaskOutcome = Result<Option<PathBuf>>;

/// Runs labelled blocking tasks with a bounded worker pool
#[derive(Debug)]
pub struct WriteScheduler {
    semaphore: Arc<Semaphore>,
    tasks: JoinSet<(usize, String, TaskOutcome)>,
    /// Unfinished tasks by submission id; labels may repeat
    pending: BTreeMap<usize, String>,
    next_id: usize,
    cancellation: CancellationToken,
    progress: Option<ProgressBar>,
}

impl WriteScheduler {
    pub fn new(workers: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
            tasks: JoinSet::new(),
            pending: BTreeMap::new(),
            next_id: 0,
            cancellation: CancellationToken::new(),
            progress: None,
        }
    }

    /// Stop waiting and abort outstanding tasks when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Advance `bar` as tasks complete
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = Some(bar);
        self
    }

    /// Number of submitted tasks not yet collected
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Queue `task` under `label`
    ///
    /// The task starts as soon as a worker permit is free. Panics inside the
    /// task are reported as failures of that label.
    pub fn submit<F>(&mut self, label: impl Into<String>, task: F)
    where
        F: FnOnce() -> TaskOutcome + Send + 'static,
    {
        let label = label.into();
        let semaphore = Arc::clone(&self.semaphore);
        let task_label = label.clone();
        let id = self.next_id;
        self.next_id += 1;

        self.pending.insert(id, label);
        if let Some(bar) = &self.progress {
            bar.inc_length(1);
        }

        self.tasks.spawn(async move {
            let outcome = match semaphore.acquire_owned().await {
                Ok(permit) => {
                    let joined = tokio::task::spawn_blocking(move || {
                        let _permit = permit;
                        task()
                    })
                    .await;
                    joined.unwrap_or_else(|e| Err(Error::task_failed(&task_label, e.to_string())))
                }
                Err(e) => Err(Error::task_failed(&task_label, e.to_string())),
            };
            (id, task_label, outcome)
        });
    }

    /// Await every submitted task
    ///
    /// Logs the still running labels once after `budget` has elapsed.
    pub async fn finish(self, budget: Duration) -> TranslationReport {
        let Self {
            mut tasks,
            mut pending,
            cancellation,
            progress,
            ..
        } = self;

        let mut report = TranslationReport::new();
        let deadline = tokio::time::sleep(budget);
        tokio::pin!(deadline);
        let mut budget_reported = false;

        loop {
            tokio::select! {
                joined = tasks.join_next() => {
                    let Some(joined) = joined else {
                        break;
                    };
                    match joined {
                        Ok((id, label, outcome)) => {
                            pending.remove(&id);
                            match outcome {
                                Ok(Some(path)) => {
                                    debug!("Task {} wrote {}", label, path.display());
                                    report.record_file(path);
                                }
                                Ok(None) => {
                                    debug!("Task {} had nothing to write", label);
                                    report.record_empty();
                                }
                                Err(e) => {
                                    error!("Task {} failed: {}", label, e);
                                    report.record_failure(label);
                                }
                            }
                        }
                        Err(e) => {
                            error!("Writer task could not be joined: {}", e);
                            report.record_failure("unknown");
                        }
                    }
                    if let Some(bar) = &progress {
                        bar.inc(1);
                    }
                }
                _ = &mut deadline, if !budget_reported => {
                    budget_reported = true;
                    for label in pending.values() {
                        info!("DSSAT translation for {} is still under processing...", label);
                    }
                }
                _ = cancellation.cancelled() => {
                    warn!("Translation cancelled with {} tasks outstanding", pending.len());
                    tasks.abort_all();
                    report.cancelled = true;
                    break;
                }
            }
        }

        if let Some(bar) = &progress {
            bar.finish_and_clear();
        }
        info!(
            "Translation tasks finished: {} files, {} failed, {} empty",
            report.files.len(),
            report.failed.len(),
            report.empty
        );
        report
    }
}
