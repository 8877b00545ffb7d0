use digest_core::{ArticleRecord, MAX_ARTICLES_PER_CATEGORY};
use scraper::{ElementRef, Html, Selector};

use crate::ExtractionFault;

pub trait Extractor: Send + Sync {
    fn extract(&self, html: &str) -> Vec<ArticleRecord>;
}

/// Pulls `{title, content}` pairs out of article-like blocks:
/// - the first `limit` blocks matching `article`, in document order
/// - title from the first nested `h2`, content from the first nested `p`
/// - missing elements become the "No title" / "No content" sentinels.
#[derive(Debug, Clone)]
pub struct ArticleBlockExtractor {
    block: Option<Selector>,
    title: Option<Selector>,
    content: Option<Selector>,
    limit: usize,
}

impl ArticleBlockExtractor {
    /// Extractor for sites that structure their listings differently.
    pub fn with_selectors(block: &str, title: &str, content: &str) -> Result<Self, ExtractionFault> {
        Ok(Self {
            block: Some(parse_selector(block)?),
            title: Some(parse_selector(title)?),
            content: Some(parse_selector(content)?),
            limit: MAX_ARTICLES_PER_CATEGORY,
        })
    }

    /// Lowers the per-page limit. Never raises it past [`MAX_ARTICLES_PER_CATEGORY`].
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.min(MAX_ARTICLES_PER_CATEGORY);
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for ArticleBlockExtractor {
    fn default() -> Self {
        Self {
            block: Selector::parse("article").ok(),
            title: Selector::parse("h2").ok(),
            content: Selector::parse("p").ok(),
            limit: MAX_ARTICLES_PER_CATEGORY,
        }
    }
}

impl Extractor for ArticleBlockExtractor {
    fn extract(&self, html: &str) -> Vec<ArticleRecord> {
        let Some(block_sel) = &self.block else {
            return Vec::new();
        };
        let doc = Html::parse_document(html);
        doc.select(block_sel)
            .take(self.limit)
            .map(|block| {
                ArticleRecord::new(
                    first_text(block, self.title.as_ref()),
                    first_text(block, self.content.as_ref()),
                )
            })
            .collect()
    }
}

fn first_text(block: ElementRef<'_>, selector: Option<&Selector>) -> Option<String> {
    block
        .select(selector?)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

fn parse_selector(css: &str) -> Result<Selector, ExtractionFault> {
    Selector::parse(css).map_err(|err| ExtractionFault::InvalidSelector(format!("{css}: {err}")))
}
