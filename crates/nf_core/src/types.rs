use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Maximum characters of body text kept when fetching an article.
pub const CONTENT_FETCH_LIMIT: usize = 2000;

/// Maximum characters of body text embedded per article in the batch prompt.
pub const PROMPT_EXCERPT_LIMIT: usize = 1000;

/// Target length band for generated summaries, in characters.
pub const SUMMARY_MIN: usize = 60;
pub const SUMMARY_MAX: usize = 100;

/// Default cap on candidates taken from a single source per run.
pub const PER_SOURCE_LIMIT: usize = 3;

/// Sentinel stored as content when an article body cannot be fetched.
pub const CONTENT_UNAVAILABLE: &str = "无法获取文章内容";

/// Sentinel stored as summary when AI enrichment fails.
pub const SUMMARY_FAILED: &str = "新闻内容总结失败";

/// A raw article produced by a scraper, prior to enrichment.
///
/// `link` is the identity of an article: two articles sharing a link are
/// the same story, and only the first stored instance survives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub tag: String,
    pub title: String,
    pub link: String,
    pub content: String,
    pub date: NaiveDate,
}

/// An article enriched with a localized title and summary, ready for
/// storage and notification. `tag`, `title`, `link`, `content` and `date`
/// are carried through unchanged from the originating [`Article`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedArticle {
    pub tag: String,
    pub title: String,
    pub localized_title: String,
    pub link: String,
    pub content: String,
    pub summary: String,
    pub date: NaiveDate,
}

impl ProcessedArticle {
    pub fn enriched(article: &Article, localized_title: String, summary: String) -> Self {
        Self {
            tag: article.tag.clone(),
            title: article.title.clone(),
            localized_title,
            link: article.link.clone(),
            content: article.content.clone(),
            summary,
            date: article.date,
        }
    }

    /// Degraded form used when enrichment is unavailable: the title is
    /// carried through untranslated and the summary is the failure sentinel.
    pub fn degraded(article: &Article) -> Self {
        Self::enriched(article, article.title.clone(), SUMMARY_FAILED.to_string())
    }
}

/// The calendar day a pipeline run reports news for: yesterday relative
/// to local run time.
pub fn target_date() -> NaiveDate {
    let today = Local::now().date_naive();
    today.checked_sub_days(Days::new(1)).unwrap_or(today)
}

/// Clamp a string to at most `limit` characters. Char-based on purpose:
/// article bodies are frequently CJK and must never be byte-sliced.
pub fn clamp_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_chars_ascii() {
        assert_eq!(clamp_chars("hello", 3), "hel");
        assert_eq!(clamp_chars("hello", 5), "hello");
        assert_eq!(clamp_chars("hello", 10), "hello");
    }

    #[test]
    fn test_clamp_chars_multibyte() {
        let text = "人工智能新闻";
        assert_eq!(clamp_chars(text, 3), "人工智");
        assert_eq!(clamp_chars(text, 6), text);
    }

    #[test]
    fn test_degraded_carries_identity() {
        let article = Article {
            tag: "TechCrunch".to_string(),
            title: "Some headline".to_string(),
            link: "https://example.com/1".to_string(),
            content: "body".to_string(),
            date: target_date(),
        };
        let processed = ProcessedArticle::degraded(&article);
        assert_eq!(processed.localized_title, article.title);
        assert_eq!(processed.summary, SUMMARY_FAILED);
        assert_eq!(processed.link, article.link);
        assert_eq!(processed.date, article.date);
    }
}
