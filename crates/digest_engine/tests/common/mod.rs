#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex, Once};
use std::time::Duration;

use digest_engine::{
    category_url, BlockingFetcher, CategoryParser, ChannelEventSink, FailureKind, FetchError,
    FetchOutput, Fetcher, ParserConfig, ParserEvent,
};

pub const BASE_URL: &str = "https://digest.test";

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(digest_logging::initialize_for_tests);
}

pub fn categories(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

/// Renders a listing page with one `<article>` per `(title, content)` pair.
pub fn article_page(articles: &[(&str, &str)]) -> String {
    let body: String = articles
        .iter()
        .map(|(title, content)| format!("<article><h2>{title}</h2><p>{content}</p></article>"))
        .collect();
    format!("<html><body>{body}</body></html>")
}

pub fn test_config() -> ParserConfig {
    ParserConfig {
        batch_pause: Duration::ZERO,
        ..ParserConfig::new(BASE_URL)
    }
}

#[derive(Debug, Clone)]
pub enum Page {
    Html(String),
    Bytes {
        bytes: Vec<u8>,
        content_type: Option<String>,
    },
    Fail(FailureKind),
}

/// Serves canned pages keyed by category, for both scheduling modes.
/// Unknown categories answer with HTTP 404.
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, Page>,
    delay: Duration,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

/// Counts a request as in flight until dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, category: &str, html: impl Into<String>) -> Self {
        self.pages
            .insert(category.to_string(), Page::Html(html.into()));
        self
    }

    pub fn with_bytes(mut self, category: &str, bytes: &[u8], content_type: Option<&str>) -> Self {
        self.pages.insert(
            category.to_string(),
            Page::Bytes {
                bytes: bytes.to_vec(),
                content_type: content_type.map(str::to_string),
            },
        );
        self
    }

    pub fn with_failure(mut self, category: &str, kind: FailureKind) -> Self {
        self.pages.insert(category.to_string(), Page::Fail(kind));
        self
    }

    /// Every request waits this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Most requests that were waiting on their delay at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn reset_peak(&self) {
        self.peak_in_flight.store(0, Ordering::SeqCst);
    }

    fn enter(&self) -> InFlight<'_> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        InFlight(&self.in_flight)
    }

    fn respond(&self, base_url: &str, category: &str) -> Result<FetchOutput, FetchError> {
        self.calls.lock().unwrap().push(category.to_string());
        let url = category_url(base_url, category);
        let (bytes, content_type) = match self.pages.get(category) {
            Some(Page::Html(html)) => (
                html.clone().into_bytes(),
                Some("text/html; charset=utf-8".to_string()),
            ),
            Some(Page::Bytes {
                bytes,
                content_type,
            }) => (bytes.clone(), content_type.clone()),
            Some(Page::Fail(kind)) => {
                return Err(FetchError::new(kind.clone(), format!("canned failure for {url}")))
            }
            None => {
                return Err(FetchError::new(
                    FailureKind::HttpStatus(404),
                    "404 Not Found",
                ))
            }
        };
        Ok(FetchOutput {
            final_url: url.clone(),
            url,
            content_type,
            bytes,
        })
    }
}

#[async_trait::async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, base_url: &str, category: &str) -> Result<FetchOutput, FetchError> {
        let _guard = self.enter();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.respond(base_url, category)
    }
}

impl BlockingFetcher for StaticFetcher {
    fn fetch_blocking(&self, base_url: &str, category: &str) -> Result<FetchOutput, FetchError> {
        let _guard = self.enter();
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        self.respond(base_url, category)
    }
}

/// Parser wired to `fetcher` that also records every emitted event.
pub fn parser_with_events(
    config: ParserConfig,
    fetcher: Arc<StaticFetcher>,
) -> (CategoryParser, mpsc::Receiver<ParserEvent>) {
    let (tx, rx) = mpsc::channel();
    let parser = CategoryParser::builder(config)
        .fetchers(fetcher)
        .sink(Arc::new(ChannelEventSink::new(tx)))
        .build()
        .expect("parser with static fetcher");
    (parser, rx)
}

pub fn parser_with(config: ParserConfig, fetcher: Arc<StaticFetcher>) -> CategoryParser {
    parser_with_events(config, fetcher).0
}

pub fn drain(rx: &mpsc::Receiver<ParserEvent>) -> Vec<ParserEvent> {
    rx.try_iter().collect()
}
