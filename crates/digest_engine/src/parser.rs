use std::sync::Arc;
use std::time::Instant;

use digest_core::{Category, ResultSnapshot};
use digest_logging::{digest_error, digest_info};

use crate::{
    ArticleBlockExtractor, BatchScheduler, BlockingFetcher, CategoryWorker, ConcurrencyMode,
    EventSink, Extractor, FetchError, Fetcher, NullEventSink, ParserConfig, ReqwestBlockingFetcher,
    ReqwestFetcher, ResultStore,
};

/// A site-specific source of per-category article digests.
#[async_trait::async_trait]
pub trait SiteParser: Send + Sync {
    /// Fetches every category in batches of the configured size; failures
    /// leave an empty entry and never fail the call.
    async fn fetch(&self, categories: &[Category]);

    fn snapshot(&self) -> ResultSnapshot;
}

/// Parser service for one site.
///
/// Construct it once and hand out clones: every clone shares the same base
/// URL and result store, and nothing resets the store between fetch calls.
#[derive(Clone)]
pub struct CategoryParser {
    inner: Arc<ParserInner>,
}

struct ParserInner {
    config: ParserConfig,
    store: Arc<ResultStore>,
    scheduler: BatchScheduler,
}

impl CategoryParser {
    /// Parser backed by reqwest with the default article extractor.
    pub fn new(config: ParserConfig) -> Result<Self, FetchError> {
        Self::builder(config).build()
    }

    pub fn builder(config: ParserConfig) -> ParserBuilder {
        ParserBuilder {
            config,
            fetcher: None,
            blocking_fetcher: None,
            extractor: None,
            sink: None,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.inner.config
    }

    pub fn base_url(&self) -> &str {
        &self.inner.config.base_url
    }

    pub fn store(&self) -> &Arc<ResultStore> {
        &self.inner.store
    }

    /// True when both handles refer to the same parser state.
    pub fn shares_state_with(&self, other: &CategoryParser) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub async fn fetch_cooperative(&self, categories: &[Category], batch_size: usize) {
        let started = Instant::now();
        self.inner
            .scheduler
            .run_cooperative(categories, batch_size)
            .await;
        self.log_summary("cooperative", categories, started);
    }

    /// Blocks the calling thread until every batch has run on the worker pool.
    pub fn fetch_pooled(&self, categories: &[Category], batch_size: usize) {
        let started = Instant::now();
        self.inner.scheduler.run_pooled(categories, batch_size);
        self.log_summary("worker-pool", categories, started);
    }

    pub fn snapshot(&self) -> ResultSnapshot {
        self.inner.store.snapshot()
    }

    fn log_summary(&self, mode: &str, categories: &[Category], started: Instant) {
        let empty = categories
            .iter()
            .filter(|category| {
                self.inner
                    .store
                    .get(category)
                    .map_or(true, |records| records.is_empty())
            })
            .count();
        digest_info!(
            "Fetched {} categories ({} empty) in {} mode in {:?}",
            categories.len(),
            empty,
            mode,
            started.elapsed()
        );
    }
}

#[async_trait::async_trait]
impl SiteParser for CategoryParser {
    async fn fetch(&self, categories: &[Category]) {
        let batch_size = self.inner.config.batch_size;
        match self.inner.config.mode {
            ConcurrencyMode::Cooperative => self.fetch_cooperative(categories, batch_size).await,
            ConcurrencyMode::WorkerPool => {
                let parser = self.clone();
                let categories = categories.to_vec();
                let joined = tokio::task::spawn_blocking(move || {
                    parser.fetch_pooled(&categories, batch_size)
                })
                .await;
                if let Err(err) = joined {
                    digest_error!("Worker-pool fetch did not complete: {}", err);
                }
            }
        }
    }

    fn snapshot(&self) -> ResultSnapshot {
        CategoryParser::snapshot(self)
    }
}

pub struct ParserBuilder {
    config: ParserConfig,
    fetcher: Option<Arc<dyn Fetcher>>,
    blocking_fetcher: Option<Arc<dyn BlockingFetcher>>,
    extractor: Option<Arc<dyn Extractor>>,
    sink: Option<Arc<dyn EventSink>>,
}

impl ParserBuilder {
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn blocking_fetcher(mut self, fetcher: Arc<dyn BlockingFetcher>) -> Self {
        self.blocking_fetcher = Some(fetcher);
        self
    }

    /// Uses one value for both scheduling modes.
    pub fn fetchers<F>(self, fetcher: Arc<F>) -> Self
    where
        F: Fetcher + BlockingFetcher + 'static,
    {
        self.fetcher(fetcher.clone()).blocking_fetcher(fetcher)
    }

    pub fn extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> Result<CategoryParser, FetchError> {
        let fetcher: Arc<dyn Fetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(ReqwestFetcher::new(self.config.fetch.clone())?),
        };
        let blocking_fetcher: Arc<dyn BlockingFetcher> = match self.blocking_fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(ReqwestBlockingFetcher::new(self.config.fetch.clone())),
        };
        let extractor: Arc<dyn Extractor> = match self.extractor {
            Some(extractor) => extractor,
            None => Arc::new(ArticleBlockExtractor::default()),
        };
        let sink: Arc<dyn EventSink> = match self.sink {
            Some(sink) => sink,
            None => Arc::new(NullEventSink),
        };

        let store = Arc::new(ResultStore::new());
        let worker = Arc::new(CategoryWorker::new(
            self.config.base_url.clone(),
            fetcher,
            blocking_fetcher,
            extractor,
            sink.clone(),
        ));
        let scheduler = BatchScheduler::new(
            worker,
            store.clone(),
            sink,
            self.config.scheduler_settings(),
        );

        Ok(CategoryParser {
            inner: Arc::new(ParserInner {
                config: self.config,
                store,
                scheduler,
            }),
        })
    }
}
