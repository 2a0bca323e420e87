use std::collections::HashSet;

use async_trait::async_trait;
use nf_core::{clamp_chars, target_date, CONTENT_FETCH_LIMIT, CONTENT_UNAVAILABLE};
use scraper::{Html, Selector};
use tracing::{debug, warn};

use super::{absolutize, Candidate, Scraper, SiteClient};

const BASE_URL: &str = "https://github.com";
const TRENDING_URL: &str = "https://github.com/trending?since=daily";
const TAG: &str = "GitHub";
const MAX_CANDIDATES: usize = 10;

/// GitHub daily trending. There are no publication timestamps at all, so
/// the top-N trending entries stand in for recency.
pub struct GitHubTrendingScraper {
    client: SiteClient,
}

impl GitHubTrendingScraper {
    pub fn new() -> Self {
        Self {
            client: SiteClient::new(),
        }
    }

    fn parse_listing(&self, html: &str) -> Vec<Candidate> {
        let document = Html::parse_document(html);
        let row = Selector::parse("article.Box-row").unwrap();
        let name = Selector::parse("h2 a").unwrap();

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for article in document.select(&row) {
            let Some(anchor) = article.select(&name).next() else {
                continue;
            };
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let Ok(link) = absolutize(BASE_URL, href) else {
                continue;
            };
            if !seen.insert(link.clone()) {
                continue;
            }
            // "owner / repo" with decorative whitespace collapsed.
            let title = anchor
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            if title.is_empty() {
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

impl Default for GitHubTrendingScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scraper for GitHubTrendingScraper {
    fn tag(&self) -> &str {
        TAG
    }

    async fn list_candidates(&self) -> Vec<Candidate> {
        match self.client.get_text(TRENDING_URL).await {
            Ok(html) => {
                let candidates = self.parse_listing(&html);
                debug!(count = candidates.len(), "GitHub trending parsed");
                candidates
            }
            Err(e) => {
                warn!(error = %e, "GitHub trending unavailable");
                Vec::new()
            }
        }
    }

    async fn fetch_content(&self, link: &str) -> String {
        let html = match self.client.get_text(link).await {
            Ok(html) => html,
            Err(e) => {
                warn!(link, error = %e, "GitHub repository fetch failed");
                return CONTENT_UNAVAILABLE.to_string();
            }
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
