//! Digest engine: category fetching, extraction and batch scheduling.
mod config;
mod decode;
mod extract;
mod fetch;
mod parser;
mod scheduler;
mod sink;
mod store;
mod types;
mod worker;

pub use config::{ParserConfig, DEFAULT_BASE_URL};
pub use decode::{decode_html, decode_page, DecodedPage};
pub use extract::{ArticleBlockExtractor, Extractor};
pub use fetch::{
    category_url, BlockingFetcher, FetchSettings, Fetcher, ReqwestBlockingFetcher, ReqwestFetcher,
};
pub use parser::{CategoryParser, ParserBuilder, SiteParser};
pub use scheduler::{BatchScheduler, ConcurrencyMode, SchedulerSettings};
pub use sink::{ChannelEventSink, EventSink, NullEventSink};
pub use store::ResultStore;
pub use types::{
    CategoryError, ExtractionFault, FailureKind, FetchError, FetchOutput, ParserEvent,
};
pub use worker::CategoryWorker;

pub use digest_core::{ArticleRecord, Category, ResultSnapshot};
