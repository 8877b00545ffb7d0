use std::io::Read;
use std::sync::OnceLock;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use crate::{FailureKind, FetchError, FetchOutput};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Request target for one category. The category is appended verbatim, without escaping.
pub fn category_url(base_url: &str, category: &str) -> String {
    format!("{base_url}/{category}")
}

/// Single-attempt download of one category page, for cooperative scheduling.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, base_url: &str, category: &str) -> Result<FetchOutput, FetchError>;
}

/// Same contract as [`Fetcher`], but blocks the calling thread. Used by worker-pool mode.
pub trait BlockingFetcher: Send + Sync {
    fn fetch_blocking(&self, base_url: &str, category: &str) -> Result<FetchOutput, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, base_url: &str, category: &str) -> Result<FetchOutput, FetchError> {
        let url = category_url(base_url, category);
        let parsed = reqwest::Url::parse(&url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        check_declared_length(response.content_length(), self.settings.max_bytes)?;

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(too_large(self.settings.max_bytes, Some(next_len)));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(FetchOutput {
            url,
            final_url,
            content_type,
            bytes,
        })
    }
}

/// Blocking counterpart of [`ReqwestFetcher`].
///
/// The client is built on first use: a blocking reqwest client must not be
/// created from inside an async runtime, and this fetcher is usually owned
/// by async code that only hands it to pool threads.
#[derive(Debug)]
pub struct ReqwestBlockingFetcher {
    settings: FetchSettings,
    client: OnceLock<reqwest::blocking::Client>,
}

impl ReqwestBlockingFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self {
            settings,
            client: OnceLock::new(),
        }
    }

    fn client(&self) -> Result<&reqwest::blocking::Client, FetchError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(self.settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(self.client.get_or_init(|| client))
    }
}

impl BlockingFetcher for ReqwestBlockingFetcher {
    fn fetch_blocking(&self, base_url: &str, category: &str) -> Result<FetchOutput, FetchError> {
        let url = category_url(base_url, category);
        let parsed = reqwest::Url::parse(&url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let response = self
            .client()?
            .get(parsed)
            .send()
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        check_declared_length(response.content_length(), self.settings.max_bytes)?;

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        // One byte past the limit is enough to detect an oversized body.
        let mut bytes = Vec::new();
        response
            .take(self.settings.max_bytes + 1)
            .read_to_end(&mut bytes)
            .map_err(map_io_error)?;
        if bytes.len() as u64 > self.settings.max_bytes {
            return Err(too_large(self.settings.max_bytes, None));
        }

        Ok(FetchOutput {
            url,
            final_url,
            content_type,
            bytes,
        })
    }
}

fn check_declared_length(content_length: Option<u64>, max_bytes: u64) -> Result<(), FetchError> {
    match content_length {
        Some(len) if len > max_bytes => Err(too_large(max_bytes, Some(len))),
        _ => Ok(()),
    }
}

fn too_large(max_bytes: u64, actual: Option<u64>) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge { max_bytes, actual },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

fn map_io_error(err: std::io::Error) -> FetchError {
    let timed_out = err.kind() == std::io::ErrorKind::TimedOut
        || err
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<reqwest::Error>())
            .is_some_and(reqwest::Error::is_timeout);
    if timed_out {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
