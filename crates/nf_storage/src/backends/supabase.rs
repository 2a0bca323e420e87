use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use nf_core::config::StoreConfig;
use nf_core::{Error, ProcessedArticle, Result};
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, info};

use crate::{NewsStore, StoredArticle};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct NewRow<'a> {
    date: String,
    tag: &'a str,
    title: &'a str,
    localized_title: &'a str,
    link: &'a str,
    content: &'a str,
    summary: &'a str,
}

impl<'a> NewRow<'a> {
    fn from_article(article: &'a ProcessedArticle) -> Self {
        Self {
            date: article.date.format("%Y-%m-%d").to_string(),
            tag: &article.tag,
            title: &article.title,
            localized_title: &article.localized_title,
            link: &article.link,
            content: &article.content,
            summary: &article.summary,
        }
    }
}

/// PostgREST client for the hosted news table. The table (and its unique
/// constraint on `link`) is managed out of band; this client only checks
/// reachability and reads/writes rows.
pub struct SupabaseStore {
    client: reqwest::Client,
    base: String,
    key: String,
    table: String,
}

impl fmt::Debug for SupabaseStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseStore")
            .field("base", &self.base)
            .field("table", &self.table)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl SupabaseStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        if config.url.is_empty() || config.anon_key.is_empty() {
            return Err(Error::Config(
                "store url and anon_key are required".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Ok(Self {
            client,
            base: config.url.trim_end_matches('/').to_string(),
            key: config.anon_key.clone(),
            table: config.table.clone(),
        })
    }

    /// Construct and verify the table is reachable. Schema is never
    /// created or migrated here.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let store = Self::new(config)?;
        store.check_reachable().await?;
        info!(table = %store.table, "💾 news table reachable");
        Ok(store)
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base, self.table)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.key)
            .header("Authorization", format!("Bearer {}", self.key))
    }

    async fn check_reachable(&self) -> Result<()> {
        let response = self
            .request(self.client.get(self.table_url()))
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::Storage(format!(
                "table {:?} not reachable ({}); create it with a unique constraint on link",
                self.table,
                response.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl NewsStore for SupabaseStore {
    async fn insert(&self, article: &ProcessedArticle) -> Result<bool> {
        let response = self
            .request(self.client.post(self.table_url()))
            .header("Prefer", "return=minimal")
            .json(&NewRow::from_article(article))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            // PostgREST maps a unique violation (23505) to 409.
            StatusCode::CONFLICT => Ok(false),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(Error::Storage(format!(
                    "insert failed ({}): {}",
                    status, body
                )))
            }
        }
    }

    async fn query_by_date(&self, date: NaiveDate) -> Result<Vec<StoredArticle>> {
        let date = date.format("%Y-%m-%d").to_string();
        let rows = self
            .request(self.client.get(self.table_url()))
            .query(&[
                ("select", "*"),
                ("date", &format!("eq.{}", date)),
                ("order", "created_at.desc"),
            ])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Storage(e.to_string()))?
            .json::<Vec<StoredArticle>>()
            .await?;
        Ok(rows)
    }

    async fn query_recent(&self, limit: usize) -> Result<Vec<StoredArticle>> {
        let rows = self
            .request(self.client.get(self.table_url()))
            .query(&[
                ("select", "*"),
                ("order", "created_at.desc"),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Storage(e.to_string()))?
            .json::<Vec<StoredArticle>>()
            .await?;
        Ok(rows)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        let deleted = self
            .request(self.client.delete(self.table_url()))
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Storage(e.to_string()))?
            .json::<Vec<serde_json::Value>>()
            .await?;
        debug!(id, deleted = deleted.len(), "delete executed");
        Ok(!deleted.is_empty())
    }

    async fn count(&self) -> Result<u64> {
        let response = self
            .request(self.client.get(self.table_url()))
            .header("Prefer", "count=exact")
            .header("Range", "0-0")
            .query(&[("select", "id")])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::Storage(format!(
                "count failed ({})",
                response.status()
            )));
        }
        // content-range looks like "0-0/42" (or "*/0" for an empty table).
        let total = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.rsplit('/').next())
            .and_then(|v| v.parse::<u64>().ok())
            .ok_or_else(|| Error::Storage("missing count in content-range".to_string()))?;
        Ok(total)
    }
}
