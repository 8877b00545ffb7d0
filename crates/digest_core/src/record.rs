use serde::{Deserialize, Serialize};

/// Identifier of a content section; used verbatim as a URL path segment and as store key.
pub type Category = String;

/// Hard cap on records extracted for one category.
pub const MAX_ARTICLES_PER_CATEGORY: usize = 5;

pub const NO_TITLE: &str = "No title";
pub const NO_CONTENT: &str = "No content";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub content: String,
}

impl ArticleRecord {
    /// Builds a record, substituting the sentinel for any missing part.
    pub fn new(title: Option<String>, content: Option<String>) -> Self {
        Self {
            title: title.unwrap_or_else(|| NO_TITLE.to_string()),
            content: content.unwrap_or_else(|| NO_CONTENT.to_string()),
        }
    }

    pub fn has_title(&self) -> bool {
        self.title != NO_TITLE
    }

    pub fn has_content(&self) -> bool {
        self.content != NO_CONTENT
    }
}
