//! Tests for the write scheduler

use super::super::WriteScheduler;
use super::write_task;
use crate::Error;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const BUDGET: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_failed_task_does_not_stop_others() {
    let dir = TempDir::new().unwrap();
    let mut scheduler = WriteScheduler::new(4);

    for n in 1..=10 {
        let label = format!("task_{}", n);
        if n == 4 {
            scheduler.submit(label, || {
                Err(Error::io(
                    "Failed to write task_4.txt",
                    io::Error::other("disk full"),
                ))
            });
        } else {
            scheduler.submit(label, write_task(dir.path(), &format!("task_{}.txt", n)));
        }
    }
    assert_eq!(scheduler.pending(), 10);

    let report = scheduler.finish(BUDGET).await;
    assert_eq!(report.files.len(), 9);
    assert_eq!(report.failed, vec!["task_4".to_string()]);
    assert!(!report.cancelled);
    assert!(dir.path().join("task_3.txt").exists());
    assert!(!dir.path().join("task_4.txt").exists());
}

#[tokio::test]
async fn test_empty_and_repeated_outputs() {
    let dir = TempDir::new().unwrap();
    let mut scheduler = WriteScheduler::new(2);

    scheduler.submit("soil", write_task(dir.path(), "IB.SOL"));
    scheduler.submit("soil again", write_task(dir.path(), "IB.SOL"));
    scheduler.submit("observed", || Ok(None));

    let report = scheduler.finish(BUDGET).await;
    assert_eq!(report.files, vec![dir.path().join("IB.SOL")]);
    assert_eq!(report.empty, 1);
    assert!(report.failed.is_empty());
}

#[tokio::test]
async fn test_repeated_labels_are_tracked_separately() {
    let dir = TempDir::new().unwrap();
    let mut scheduler = WriteScheduler::new(2);

    scheduler.submit("UFGA8201MZ", write_task(dir.path(), "UFGA8201.MZX"));
    scheduler.submit("UFGA8201MZ", write_task(dir.path(), "UFGA8201.MZA"));
    scheduler.submit("UFGA8201MZ", || {
        Err(Error::io("Failed to write UFGA8201.MZT", io::Error::other("disk full")))
    });
    assert_eq!(scheduler.pending(), 3);

    let report = scheduler.finish(BUDGET).await;
    assert_eq!(report.files.len(), 2);
    assert_eq!(report.failed, vec!["UFGA8201MZ".to_string()]);
}

#[tokio::test]
async fn test_panicking_task_is_reported() {
    let dir = TempDir::new().unwrap();
    let mut scheduler = WriteScheduler::new(2);

    scheduler.submit("broken", || panic!("writer bug"));
    scheduler.submit("weather", write_task(dir.path(), "UFGA8201.WTH"));

    let report = scheduler.finish(BUDGET).await;
    assert_eq!(report.failed, vec!["broken".to_string()]);
    assert_eq!(report.files.len(), 1);
}

#[tokio::test]
async fn test_budget_elapsing_keeps_waiting() {
    let dir = TempDir::new().unwrap();
    let mut scheduler = WriteScheduler::new(1);
    let path = dir.path().join("slow.txt");

    let slow_path = path.clone();
    scheduler.submit("slow", move || {
        std::thread::sleep(Duration::from_millis(100));
        std::fs::write(&slow_path, "done").map_err(|e| Error::io("Failed to write slow.txt", e))?;
        Ok(Some(slow_path))
    });

    let report = scheduler.finish(Duration::from_millis(10)).await;
    assert_eq!(report.files, vec![path]);
    assert!(!report.cancelled);
}

#[tokio::test]
async fn test_worker_limit_is_respected() {
    let running = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let mut scheduler = WriteScheduler::new(2);

    for n in 0..8 {
        let running = Arc::clone(&running);
        let peak = Arc::clone(&peak);
        scheduler.submit(format!("task_{}", n), move || {
            let now = running.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            running.fetch_sub(1, Ordering::SeqCst);
            Ok(None)
        });
    }

    let report = scheduler.finish(BUDGET).await;
    assert_eq!(report.empty, 8);
    assert!(peak.load(Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn test_cancellation_stops_waiting() {
    let token = CancellationToken::new();
    let mut scheduler = WriteScheduler::new(1).with_cancellation(token.clone());

    scheduler.submit("long", || {
        std::thread::sleep(Duration::from_millis(200));
        Ok(None)
    });
    scheduler.submit("queued", || Ok(None));

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();
    });

    let report = scheduler.finish(BUDGET).await;
    canceller.await.unwrap();
    assert!(report.cancelled);
    assert_eq!(report.empty, 0);
}
