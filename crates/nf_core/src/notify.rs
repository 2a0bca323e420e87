use async_trait::async_trait;
use chrono::NaiveDate;

use crate::types::ProcessedArticle;
use crate::Result;

/// Terminal consumer of a pipeline run. Implementations render the article
/// list into whatever channel they serve (chat webhook, digest mail, ...).
///
/// An empty slice is a valid, non-error terminal state meaning "nothing to
/// report for this run".
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, date: NaiveDate, articles: &[ProcessedArticle]) -> Result<()>;
}

/// Sink that only logs. Used when no chat channel is configured.
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn deliver(&self, date: NaiveDate, articles: &[ProcessedArticle]) -> Result<()> {
        if articles.is_empty() {
            tracing::info!(%date, "📭 nothing to report");
            return Ok(());
        }
        for article in articles {
            tracing::info!(%date, tag = %article.tag, title = %article.localized_title, link = %article.link, "📰 digest entry");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::target_date;

    #[tokio::test]
    async fn test_log_sink_accepts_empty() {
        let sink = LogSink;
        assert!(sink.deliver(target_date(), &[]).await.is_ok());
    }
}
