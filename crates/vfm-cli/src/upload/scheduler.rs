//! Bounded-concurrency batch scheduler
//!
//! A queue sized to the batch is filled up front and closed, then `workers`
//! tokio tasks drain it. Each worker handles one task at a time: validate,
//! upload, record the result, pause. One task failing never stops the others,
//! and every task yields exactly one [`UploadResult`]. Result order follows
//! completion, not input.

use crate::backend::UploadBackend;
use crate::config::{DEFAULT_CONCURRENCY, DEFAULT_UPLOAD_DELAY_MS};
use crate::error::{CliError, Result};
use crate::upload::task::{UploadResult, UploadTask};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Per-task progress hooks, called from worker tasks
pub trait BatchObserver: Send + Sync {
    /// A worker picked up `task`
    fn on_start(&self, _worker_id: usize, _task: &UploadTask) {}

    /// A worker finished `result`, before its post-upload pause
    fn on_finish(&self, _worker_id: usize, _result: &UploadResult) {}
}

/// Observer that ignores every event
pub struct NoopObserver;

impl BatchObserver for NoopObserver {}

/// Worker pool settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Maximum uploads in flight; must be at least 1
    pub workers: usize,
    /// Pause each worker takes after every task
    pub delay: Duration,
}

impl SchedulerConfig {
    pub fn new(workers: usize, delay: Duration) -> Self {
        Self { workers, delay }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_CONCURRENCY,
            delay: Duration::from_millis(DEFAULT_UPLOAD_DELAY_MS),
        }
    }
}

type SharedQueue = Arc<tokio::sync::Mutex<mpsc::Receiver<UploadTask>>>;
type SharedResults = Arc<Mutex<Vec<UploadResult>>>;

/// Upload every task through `backend` with at most `config.workers` in flight
pub async fn run_batch(
    tasks: Vec<UploadTask>,
    backend: Arc<dyn UploadBackend>,
    config: SchedulerConfig,
    observer: Arc<dyn BatchObserver>,
) -> Result<Vec<UploadResult>> {
    if config.workers == 0 {
        return Err(CliError::config("concurrency must be at least 1"));
    }

    if tasks.is_empty() {
        return Ok(Vec::new());
    }

    let total = tasks.len();
    info!(
        total,
        workers = config.workers,
        backend = %backend.kind(),
        delay_ms = config.delay.as_millis() as u64,
        "Starting batch upload"
    );

    let (tx, rx) = mpsc::channel(total);
    for task in tasks {
        tx.send(task)
            .await
            .map_err(|_| anyhow::anyhow!("upload queue closed before it was filled"))?;
    }
    drop(tx);

    let queue: SharedQueue = Arc::new(tokio::sync::Mutex::new(rx));
    let results: SharedResults = Arc::new(Mutex::new(Vec::with_capacity(total)));

    let mut workers = JoinSet::new();
    for worker_id in 1..=config.workers {
        workers.spawn(worker(
            worker_id,
            Arc::clone(&queue),
            Arc::clone(&backend),
            Arc::clone(&results),
            Arc::clone(&observer),
            config.delay,
        ));
    }

    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "Upload worker terminated abnormally");
        }
    }

    let results = match Arc::try_unwrap(results) {
        Ok(results) => results.into_inner().unwrap_or_else(PoisonError::into_inner),
        Err(shared) => std::mem::take(&mut *shared.lock().unwrap_or_else(PoisonError::into_inner)),
    };

    let failed = results.iter().filter(|r| !r.is_success()).count();
    info!(total, succeeded = results.len() - failed, failed, "Batch upload finished");

    Ok(results)
}

async fn worker(
    worker_id: usize,
    queue: SharedQueue,
    backend: Arc<dyn UploadBackend>,
    results: SharedResults,
    observer: Arc<dyn BatchObserver>,
    delay: Duration,
) {
    debug!(worker_id, "Worker started");

    loop {
        let next = queue.lock().await.recv().await;
        let Some(task) = next else {
            break;
        };

        observer.on_start(worker_id, &task);

        let result = match task.validate() {
            Ok(()) => backend.upload(&task).await,
            Err(e) => {
                warn!(worker_id, file = task.name(), error = %e, "Skipping invalid file");
                UploadResult::failed(task.name(), e)
            }
        };

        debug!(worker_id, file = result.file_name(), success = result.is_success(), "Task finished");
        observer.on_finish(worker_id, &result);

        results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(result);

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    debug!(worker_id, "Worker stopped");
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::backend::BackendKind;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[derive(Default)]
    struct CountingBackend {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        calls: AtomicUsize,
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl UploadBackend for CountingBackend {
        fn kind(&self) -> BackendKind {
            BackendKind::Cms
        }

        async fn upload(&self, task: &UploadTask) -> UploadResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            tokio::time::sleep(Duration::from_millis(15)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail_on == Some(task.name()) {
                return UploadResult::failed(task.name(), CliError::rejected("HTTP 500: boom"));
            }
            UploadResult::succeeded(task.name(), format!("https://acme.vtexassets.com/arquivos/{}", task.name()))
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        started: AtomicUsize,
        finished: AtomicUsize,
        worker_ids: Mutex<HashSet<usize>>,
    }

    impl BatchObserver for RecordingObserver {
        fn on_start(&self, worker_id: usize, _task: &UploadTask) {
            self.started.fetch_add(1, Ordering::SeqCst);
            self.worker_ids.lock().unwrap().insert(worker_id);
        }

        fn on_finish(&self, _worker_id: usize, _result: &UploadResult) {
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn make_tasks(dir: &Path, names: &[&str]) -> Vec<UploadTask> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                std::fs::write(&path, b"\x89PNG fixture").unwrap();
                UploadTask::from_path(path)
            })
            .collect()
    }

    fn no_delay(workers: usize) -> SchedulerConfig {
        SchedulerConfig::new(workers, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_every_task_yields_one_result() {
        let dir = TempDir::new().unwrap();
        let names: Vec<String> = (0..9).map(|i| format!("img-{}.png", i)).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let tasks = make_tasks(dir.path(), &name_refs);

        let backend = Arc::new(CountingBackend::default());
        let results = run_batch(tasks, backend.clone(), no_delay(3), Arc::new(NoopObserver))
            .await
            .unwrap();

        assert_eq!(results.len(), 9);
        let got: HashSet<&str> = results.iter().map(|r| r.file_name()).collect();
        let want: HashSet<&str> = name_refs.iter().copied().collect();
        assert_eq!(got, want);
        assert!(results.iter().all(|r| r.is_success()));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 9);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_in_flight_bounded_by_workers() {
        let dir = TempDir::new().unwrap();
        let tasks = make_tasks(dir.path(), &["a.png", "b.png", "c.png", "d.png", "e.png", "f.png"]);

        let backend = Arc::new(CountingBackend::default());
        let results = run_batch(tasks, backend.clone(), no_delay(2), Arc::new(NoopObserver))
            .await
            .unwrap();

        assert_eq!(results.len(), 6);
        let max = backend.max_in_flight.load(Ordering::SeqCst);
        assert!(max >= 1 && max <= 2, "max in flight was {}", max);
    }

    #[tokio::test]
    async fn test_more_workers_than_tasks() {
        let dir = TempDir::new().unwrap();
        let tasks = make_tasks(dir.path(), &["only.png", "second.png"]);

        let observer = Arc::new(RecordingObserver::default());
        let results = run_batch(
            tasks,
            Arc::new(CountingBackend::default()),
            no_delay(8),
            observer.clone(),
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(observer.started.load(Ordering::SeqCst), 2);
        assert_eq!(observer.finished.load(Ordering::SeqCst), 2);
        assert!(observer.worker_ids.lock().unwrap().iter().all(|id| (1..=8).contains(id)));
    }

    #[tokio::test]
    async fn test_zero_workers_rejected() {
        let result = run_batch(
            Vec::new(),
            Arc::new(CountingBackend::default()),
            no_delay(0),
            Arc::new(NoopObserver),
        )
        .await;
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let results = run_batch(
            Vec::new(),
            Arc::new(CountingBackend::default()),
            no_delay(3),
            Arc::new(NoopObserver),
        )
        .await
        .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_task_fails_alone() {
        let dir = TempDir::new().unwrap();
        let mut tasks = make_tasks(dir.path(), &["one.png"]);
        tasks.push(UploadTask::from_path(dir.path().join("missing.png")));
        tasks.extend(make_tasks(dir.path(), &["three.png"]));

        let backend = Arc::new(CountingBackend::default());
        let results = run_batch(tasks, backend.clone(), no_delay(1), Arc::new(NoopObserver))
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        for result in &results {
            match result.file_name() {
                "missing.png" => assert!(matches!(result.error(), Some(CliError::NotFound(_)))),
                _ => assert!(result.is_success()),
            }
        }
        // The invalid file never reaches the backend
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_backend_failure_does_not_stop_batch() {
        let dir = TempDir::new().unwrap();
        let tasks = make_tasks(dir.path(), &["a.png", "bad.png", "c.png", "d.png"]);

        let backend = Arc::new(CountingBackend {
            fail_on: Some("bad.png"),
            ..CountingBackend::default()
        });
        let results = run_batch(tasks, backend, no_delay(2), Arc::new(NoopObserver))
            .await
            .unwrap();

        assert_eq!(results.len(), 4);
        assert_eq!(results.iter().filter(|r| !r.is_success()).count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_is_applied_per_worker() {
        let dir = TempDir::new().unwrap();
        let tasks = make_tasks(dir.path(), &["a.png", "b.png", "c.png"]);

        let started = tokio::time::Instant::now();
        let results = run_batch(
            tasks,
            Arc::new(CountingBackend::default()),
            SchedulerConfig::new(1, Duration::from_millis(500)),
            Arc::new(NoopObserver),
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 3);
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }
}
