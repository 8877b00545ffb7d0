use std::time::Duration;

use digest_core::DEFAULT_BATCH_SIZE;
use serde::{Deserialize, Serialize};

use crate::{ConcurrencyMode, FetchSettings, SchedulerSettings};

pub const DEFAULT_BASE_URL: &str = "https://woysa.club";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Site root; category pages live at `{base_url}/{category}`.
    pub base_url: String,
    /// Batch size used by [`SiteParser::fetch`](crate::SiteParser::fetch).
    pub batch_size: usize,
    pub batch_pause: Duration,
    pub pause_after_last_batch: bool,
    /// Mode used by [`SiteParser::fetch`](crate::SiteParser::fetch).
    pub mode: ConcurrencyMode,
    pub pool_threads: Option<usize>,
    pub fetch: FetchSettings,
}

impl ParserConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn scheduler_settings(&self) -> SchedulerSettings {
        SchedulerSettings {
            batch_pause: self.batch_pause,
            pause_after_last_batch: self.pause_after_last_batch,
            pool_threads: self.pool_threads,
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            batch_pause: Duration::from_secs(1),
            pause_after_last_batch: false,
            mode: ConcurrencyMode::default(),
            pool_threads: None,
            fetch: FetchSettings::default(),
        }
    }
}
