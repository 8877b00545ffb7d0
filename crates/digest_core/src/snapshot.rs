use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ArticleRecord, Category};

/// Owned, ordered copy of the result store at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSnapshot {
    entries: BTreeMap<Category, Vec<ArticleRecord>>,
}

impl ResultSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: &str) -> Option<&[ArticleRecord]> {
        self.entries.get(category).map(Vec::as_slice)
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

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ArticleRecord])> {
        self.entries
            .iter()
            .map(|(category, records)| (category.as_str(), records.as_slice()))
    }

    /// Categories whose entry is empty, which is how a failed fetch shows up.
    pub fn empty_categories(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, records)| records.is_empty())
            .map(|(category, _)| category)
            .collect()
    }

    pub fn into_inner(self) -> BTreeMap<Category, Vec<ArticleRecord>> {
        self.entries
    }
}

impl FromIterator<(Category, Vec<ArticleRecord>)> for ResultSnapshot {
    fn from_iter<I: IntoIterator<Item = (Category, Vec<ArticleRecord>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
