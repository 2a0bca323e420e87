use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use nf_core::{ProcessedArticle, Result};
use tokio::sync::RwLock;

use crate::{NewsStore, StoredArticle};

/// In-memory store for tests and dry runs. Enforces the same
/// link-uniqueness semantics as the hosted table.
pub struct MemoryStore {
    rows: RwLock<Vec<StoredArticle>>,
    next_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NewsStore for MemoryStore {
    async fn insert(&self, article: &ProcessedArticle) -> Result<bool> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|row| row.link == article.link) {
            return Ok(false);
        }
        rows.push(StoredArticle {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            date: article.date,
            tag: article.tag.clone(),
            title: article.title.clone(),
            localized_title: article.localized_title.clone(),
            link: article.link.clone(),
            content: article.content.clone(),
            summary: article.summary.clone(),
            created_at: Utc::now(),
        });
        Ok(true)
    }

    async fn query_by_date(&self, date: NaiveDate) -> Result<Vec<StoredArticle>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .rev()
            .filter(|row| row.date == date)
            .cloned()
            .collect())
    }

    async fn query_recent(&self, limit: usize) -> Result<Vec<StoredArticle>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().rev().take(limit).cloned().collect())
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| row.id != id);
        Ok(rows.len() < before)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.rows.read().await.len() as u64)
    }
}
