use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use nf_core::{ProcessedArticle, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub mod backends;

pub use backends::memory::MemoryStore;
pub use backends::supabase::SupabaseStore;

/// A persisted row. The backing table is assumed pre-existing with a
/// uniqueness constraint on `link`; rows are insert-once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredArticle {
    pub id: i64,
    pub date: NaiveDate,
    pub tag: String,
    pub title: String,
    pub localized_title: String,
    pub link: String,
    pub content: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

/// Idempotent article storage keyed by link.
///
/// `insert` distinguishes three outcomes: `Ok(true)` stored, `Ok(false)`
/// link already present (expected, not an error), `Err` store fault.
/// Overlapping runs inserting the same link are benign: at most one
/// write succeeds.
#[async_trait]
pub trait NewsStore: Send + Sync {
    async fn insert(&self, article: &ProcessedArticle) -> Result<bool>;

    /// Insert each article independently and count successes. A single
    /// duplicate or malformed record never sinks the rest of the batch.
    async fn insert_batch(&self, articles: &[ProcessedArticle]) -> usize {
        let mut stored = 0;
        for article in articles {
            match self.insert(article).await {
                Ok(true) => stored += 1,
                Ok(false) => {
                    debug!(link = %article.link, "link already present, skipped")
                }
                Err(e) => {
                    warn!(link = %article.link, error = %e, "insert failed, continuing batch")
                }
            }
        }
        stored
    }

    async fn query_by_date(&self, date: NaiveDate) -> Result<Vec<StoredArticle>>;

    async fn query_recent(&self, limit: usize) -> Result<Vec<StoredArticle>>;

    async fn delete_by_id(&self, id: i64) -> Result<bool>;

    async fn count(&self) -> Result<u64>;
}
