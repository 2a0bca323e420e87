use std::collections::HashSet;

use async_trait::async_trait;
use nf_core::{clamp_chars, target_date, CONTENT_FETCH_LIMIT, CONTENT_UNAVAILABLE};
use scraper::{Html, Selector};
use tracing::{debug, warn};

use super::{absolutize, Candidate, Scraper};
use crate::browser::BrowserSession;

const BASE_URL: &str = "https://www.producthunt.com";
const TAG: &str = "Product Hunt";
const MAX_CANDIDATES: usize = 10;

/// Product Hunt actively blocks plain HTTP fetches, so every page load
/// goes through a fresh headless-browser session. Listing order stands in
/// for recency.
pub struct ProductHuntScraper;

impl ProductHuntScraper {
    pub fn new() -> Self {
        Self
    }

    async fn fetch_rendered(&self, url: &str) -> Option<String> {
        let session = match BrowserSession::launch().await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Product Hunt browser launch failed");
                return None;
            }
        };
        let html = session.fetch(url).await;
        session.close().await;
        match html {
            Ok(html) => Some(html),
            Err(e) => {
                warn!(url, error = %e, "Product Hunt page fetch failed");
                None
            }
        }
    }

    fn parse_listing(&self, html: &str) -> Vec<Candidate> {
        let document = Html::parse_document(html);
        let anchor = Selector::parse(r#"a[href^="/posts/"]"#).unwrap();

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for element in document.select(&anchor) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Ok(link) = absolutize(BASE_URL, href) else {
                continue;
            };
            let title = element.text().collect::<String>().trim().to_string();
            if title.chars().count() < 3 || !seen.insert(link.clone()) {
                continue;
            }
            candidates.push(Candidate {
                title,
                link,
                tag: TAG.to_string(),
                date: target_date(),
            });
            if candidates.len() >= MAX_CANDIDATES {
                break;
            }
        }
        candidates
    }
}

impl Default for ProductHuntScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scraper for ProductHuntScraper {
    fn tag(&self) -> &str {
        TAG
    }

    async fn list_candidates(&self) -> Vec<Candidate> {
        match self.fetch_rendered(BASE_URL).await {
            Some(html) => {
                let candidates = self.parse_listing(&html);
                debug!(count = candidates.len(), "Product Hunt listing parsed");
                candidates
            }
            None => Vec::new(),
        }
    }

    async fn fetch_content(&self, link: &str) -> String {
        let Some(html) = self.fetch_rendered(link).await else {
            return CONTENT_UNAVAILABLE.to_string();
        };

        let document = Html::parse_document(&html);
        let description = Selector::parse(r#"meta[name="description"]"#).unwrap();
        let about = document
            .select(&description)
            .next()
            .and_then(|m| m.value().attr("content"))
            .map(str::trim)
            .filter(|c| !c.is_empty());

        match about {
            Some(about) => clamp_chars(about, CONTENT_FETCH_LIMIT),
            None => CONTENT_UNAVAILABLE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing() {
        let scraper = ProductHuntScraper::new();
        let html = r#"
            <main>
              <a href="/posts/recall-ai">Recall AI</a>
              <a href="/posts/recall-ai">Recall AI</a>
              <a href="/posts/macaron">Macaron assistant</a>
              <a href="/topics/ai">AI</a>
            </main>
        "#;
        let candidates = scraper.parse_listing(html);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].link, "https://www.producthunt.com/posts/recall-ai");
        assert_eq!(candidates[0].tag, "Product Hunt");
    }
}
