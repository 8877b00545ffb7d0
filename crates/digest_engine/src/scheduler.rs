use std::sync::Arc;
use std::time::Duration;

use digest_core::{partition, Category};
use digest_logging::{digest_error, digest_info};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};

use crate::{CategoryWorker, EventSink, ParserEvent, ResultStore};

/// How the categories of one batch run concurrently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcurrencyMode {
    /// All workers of a batch are futures joined on the calling task.
    #[default]
    Cooperative,
    /// All workers of a batch run on OS threads of a rayon pool.
    WorkerPool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerSettings {
    pub batch_pause: Duration,
    pub pause_after_last_batch: bool,
    /// Pool size for [`ConcurrencyMode::WorkerPool`]; `None` sizes it to the largest batch.
    pub pool_threads: Option<usize>,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            batch_pause: Duration::from_secs(1),
            pause_after_last_batch: false,
            pool_threads: None,
        }
    }
}

/// Runs categories batch by batch and writes every outcome into the store.
pub struct BatchScheduler {
    worker: Arc<CategoryWorker>,
    store: Arc<ResultStore>,
    sink: Arc<dyn EventSink>,
    settings: SchedulerSettings,
}

impl BatchScheduler {
    pub fn new(
        worker: Arc<CategoryWorker>,
        store: Arc<ResultStore>,
        sink: Arc<dyn EventSink>,
        settings: SchedulerSettings,
    ) -> Self {
        Self {
            worker,
            store,
            sink,
            settings,
        }
    }

    pub fn settings(&self) -> &SchedulerSettings {
        &self.settings
    }

    pub async fn run_cooperative(&self, categories: &[Category], batch_size: usize) {
        let batches = partition(categories, batch_size);
        let total = batches.len();

        for (index, batch) in batches.iter().enumerate() {
            self.begin_batch(index, total, batch);
            let tasks = batch.iter().map(|category| async move {
                let records = self.worker.process(category).await;
                self.store.insert(category.clone(), records);
            });
            join_all(tasks).await;
            self.finish_batch(index, total);

            if self.should_pause(index, total) {
                tokio::time::sleep(self.settings.batch_pause).await;
            }
        }
    }

    pub fn run_pooled(&self, categories: &[Category], batch_size: usize) {
        let batches = partition(categories, batch_size);
        let total = batches.len();
        if total == 0 {
            return;
        }

        let threads = self
            .settings
            .pool_threads
            .unwrap_or_else(|| batches.iter().map(Vec::len).max().unwrap_or(1))
            .max(1);
        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("digest-worker-{index}"))
            .build()
        {
            Ok(pool) => Some(pool),
            Err(err) => {
                digest_error!("Could not build worker pool, running batches inline: {}", err);
                None
            }
        };

        for (index, batch) in batches.iter().enumerate() {
            self.begin_batch(index, total, batch);
            match pool.as_ref() {
                Some(pool) => pool.scope(|scope| {
                    for category in batch {
                        scope.spawn(move |_| {
                            let records = self.worker.process_blocking(category);
                            self.store.insert(category.clone(), records);
                        });
                    }
                }),
                None => {
                    for category in batch {
                        let records = self.worker.process_blocking(category);
                        self.store.insert(category.clone(), records);
                    }
                }
            }
            self.finish_batch(index, total);

            if self.should_pause(index, total) {
                std::thread::sleep(self.settings.batch_pause);
            }
        }
    }

    fn begin_batch(&self, index: usize, total: usize, batch: &[Category]) {
        digest_info!(
            "Batch {}/{} started: {} categories",
            index + 1,
            total,
            batch.len()
        );
        self.sink.emit(ParserEvent::BatchStarted {
            index,
            categories: batch.to_vec(),
        });
    }

    fn finish_batch(&self, index: usize, total: usize) {
        digest_info!("Batch {}/{} finished", index + 1, total);
        self.sink.emit(ParserEvent::BatchCompleted { index });
    }

    fn should_pause(&self, index: usize, total: usize) -> bool {
        if self.settings.batch_pause.is_zero() {
            return false;
        }
        index + 1 < total || self.settings.pause_after_last_batch
    }
}
