use std::time::Duration;

use async_trait::async_trait;
use chrono::{Days, Local, NaiveDate};
use nf_core::{Error, Result};
use url::Url;

pub mod github_trending;
pub mod kr36;
pub mod techcrunch;

#[cfg(feature = "browser")]
pub mod producthunt;

pub use github_trending::GitHubTrendingScraper;
pub use kr36::Kr36Scraper;
pub use techcrunch::TechCrunchScraper;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A listing entry before its body has been fetched.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub title: String,
    pub link: String,
    pub tag: String,
    pub date: NaiveDate,
}

/// One news source. Implementations own their site heuristics and their
/// own failure logging.
///
/// `list_candidates` must not fail: a broken or unreachable site
/// contributes an empty list, and candidates are deduplicated by link
/// within a single call. `fetch_content` returns the content-unavailable
/// sentinel instead of erroring, clamped to `CONTENT_FETCH_LIMIT` chars.
#[async_trait]
pub trait Scraper: Send + Sync {
    /// Source tag carried on every article this scraper produces.
    fn tag(&self) -> &str;

    async fn list_candidates(&self) -> Vec<Candidate>;

    async fn fetch_content(&self, link: &str) -> String;
}

/// Shared HTTP fetch helper with a browser-like header set and a bounded
/// per-request timeout.
pub struct SiteClient {
    http: reqwest::Client,
}

impl SiteClient {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { http }
    }

    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .http
            .get(url)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

impl Default for SiteClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a possibly-relative href against a base URL.
pub(crate) fn absolutize(base: &str, href: &str) -> Result<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Ok(href.to_string());
    }
    let base = Url::parse(base).map_err(|e| Error::Scrape(format!("invalid base URL: {}", e)))?;
    let joined = base
        .join(href)
        .map_err(|e| Error::Scrape(format!("invalid href {:?}: {}", href, e)))?;
    Ok(joined.to_string())
}

/// The last `days` calendar days (today included), most recent first.
/// Sources with reliable publication timestamps filter against this window.
pub(crate) fn recent_dates(days: u64) -> Vec<NaiveDate> {
    let today = Local::now().date_naive();
    (0..days)
        .filter_map(|i| today.checked_sub_days(Days::new(i)))
        .collect()
}

/// All scrapers in their fixed collection order.
pub fn default_scrapers() -> Vec<Box<dyn Scraper>> {
    let mut scrapers: Vec<Box<dyn Scraper>> = vec![
        Box::new(TechCrunchScraper::new()),
        Box::new(GitHubTrendingScraper::new()),
        Box::new(Kr36Scraper::new()),
    ];
    #[cfg(feature = "browser")]
    scrapers.push(Box::new(producthunt::ProductHuntScraper::new()));
    scrapers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolutize() {
        assert_eq!(
            absolutize("https://example.com", "/a/b").unwrap(),
            "https://example.com/a/b"
        );
        assert_eq!(
            absolutize("https://example.com", "https://other.com/x").unwrap(),
            "https://other.com/x"
        );
        assert!(absolutize("not a url", "/a").is_err());
    }

    #[test]
    fn test_recent_dates_window() {
        let dates = recent_dates(3);
        assert_eq!(dates.len(), 3);
        assert!(dates[0] > dates[1] && dates[1] > dates[2]);
    }

    #[test]
    fn test_default_scrapers_order() {
        let scrapers = default_scrapers();
        assert!(scrapers.len() >= 3);
        assert_eq!(scrapers[0].tag(), "TechCrunch");
        assert_eq!(scrapers[1].tag(), "GitHub");
        assert_eq!(scrapers[2].tag(), "36kr");
    }
}
