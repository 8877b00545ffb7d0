//! Digest core: pure data model and batch planning, no IO.
mod batch;
mod record;
mod snapshot;

pub use batch::{partition, DEFAULT_BATCH_SIZE};
pub use record::{ArticleRecord, Category, MAX_ARTICLES_PER_CATEGORY, NO_CONTENT, NO_TITLE};
pub use snapshot::ResultSnapshot;
