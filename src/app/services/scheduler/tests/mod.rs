//! Test helpers for the write scheduler

use super::TaskOutcome;
use std::path::Path;

mod scheduler_tests;

/// Task body writing `name` into `dir`
pub fn write_task(dir: &Path, name: &str) -> impl FnOnce() -> TaskOutcome + Send + 'static {
    let path = dir.join(name);
    move || {
        std::fs::write(&path, "content")
            .map_err(|e| crate::Error::io(format!("Failed to write {}", path.display()), e))?;
        Ok(Some(path))
    }
}
