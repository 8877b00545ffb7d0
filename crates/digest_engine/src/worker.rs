use std::sync::Arc;

use digest_core::ArticleRecord;
use digest_logging::{digest_debug, digest_warn};

use crate::decode::decode_page;
use crate::{
    BlockingFetcher, CategoryError, EventSink, Extractor, FetchOutput, Fetcher, ParserEvent,
};

/// Fetches and extracts one category, absorbing any failure into an empty list.
pub struct CategoryWorker {
    base_url: String,
    fetcher: Arc<dyn Fetcher>,
    blocking_fetcher: Arc<dyn BlockingFetcher>,
    extractor: Arc<dyn Extractor>,
    sink: Arc<dyn EventSink>,
}

impl CategoryWorker {
    pub fn new(
        base_url: impl Into<String>,
        fetcher: Arc<dyn Fetcher>,
        blocking_fetcher: Arc<dyn BlockingFetcher>,
        extractor: Arc<dyn Extractor>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            fetcher,
            blocking_fetcher,
            extractor,
            sink,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn process(&self, category: &str) -> Vec<ArticleRecord> {
        let outcome = self.try_process(category).await;
        self.settle(category, outcome)
    }

    pub fn process_blocking(&self, category: &str) -> Vec<ArticleRecord> {
        let outcome = self.try_process_blocking(category);
        self.settle(category, outcome)
    }

    pub async fn try_process(&self, category: &str) -> Result<Vec<ArticleRecord>, CategoryError> {
        let output = self.fetcher.fetch(&self.base_url, category).await?;
        Ok(self.extract(&output))
    }

    pub fn try_process_blocking(&self, category: &str) -> Result<Vec<ArticleRecord>, CategoryError> {
        let output = self.blocking_fetcher.fetch_blocking(&self.base_url, category)?;
        Ok(self.extract(&output))
    }

    fn extract(&self, output: &FetchOutput) -> Vec<ArticleRecord> {
        let page = decode_page(output);
        self.extractor.extract(&page.html)
    }

    fn settle(
        &self,
        category: &str,
        outcome: Result<Vec<ArticleRecord>, CategoryError>,
    ) -> Vec<ArticleRecord> {
        match outcome {
            Ok(records) => {
                digest_debug!("category={} articles={}", category, records.len());
                self.sink.emit(ParserEvent::CategoryCompleted {
                    category: category.to_string(),
                    articles: records.len(),
                });
                records
            }
            Err(error) => {
                digest_warn!("Failed to fetch category {}: {}", category, error);
                self.sink.emit(ParserEvent::CategoryFailed {
                    category: category.to_string(),
                    error,
                });
                Vec::new()
            }
        }
    }
}
