use std::fmt;

use digest_core::Category;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// A failed category request: connection, timeout, status or size problems.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Extractor setup or page content that could not be turned into records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionFault {
    #[error("invalid selector: {0}")]
    InvalidSelector(String),
}

/// Why one category ended up with an empty entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryError {
    #[error("network error: {0}")]
    Network(#[from] FetchError),
    #[error("extraction fault: {0}")]
    Extraction(#[from] ExtractionFault),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserEvent {
    BatchStarted {
        index: usize,
        categories: Vec<Category>,
    },
    CategoryCompleted {
        category: Category,
        articles: usize,
    },
    CategoryFailed {
        category: Category,
        error: CategoryError,
    },
    BatchCompleted {
        index: usize,
    },
}
