use dashmap::DashMap;
use digest_core::{ArticleRecord, Category, ResultSnapshot};

/// Category results shared by every worker of a parser.
///
/// Writes from tasks and pool threads go straight into the map; a category
/// written twice keeps the last value.
#[derive(Debug, Default)]
pub struct ResultStore {
    entries: DashMap<Category, Vec<ArticleRecord>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, category: impl Into<Category>, records: Vec<ArticleRecord>) {
        self.entries.insert(category.into(), records);
    }

    pub fn get(&self, category: &str) -> Option<Vec<ArticleRecord>> {
        self.entries.get(category).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, category: &str) -> bool {
        self.entries.contains_key(category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn snapshot(&self) -> ResultSnapshot {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}
