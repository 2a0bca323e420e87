use std::collections::HashSet;

use async_trait::async_trait;
use nf_core::{clamp_chars, target_date, CONTENT_FETCH_LIMIT, CONTENT_UNAVAILABLE};
use scraper::{Html, Selector};
use tracing::{debug, warn};

use super::{absolutize, Candidate, Scraper, SiteClient};

const BASE_URL: &str = "https://36kr.com";
const TAG: &str = "36kr";
const MAX_CANDIDATES: usize = 10;

/// 36kr (Chinese tech and startup news). Listing pages carry no reliable
/// publication timestamps, so recency falls back to "most recent N as
/// listed". This source is in the default native-language set: its titles
/// are never translated.
pub struct Kr36Scraper {
    client: SiteClient,
}

impl Kr36Scraper {
    pub fn new() -> Self {
        Self {
            client: SiteClient::new(),
        }
    }

    fn listing_urls() -> [String; 2] {
        [
            format!("{}/", BASE_URL),
            format!("{}/search/articles/AI", BASE_URL),
        ]
    }

    fn parse_listing(&self, html: &str, seen: &mut HashSet<String>) -> Vec<Candidate> {
        let document = Html::parse_document(html);
        let anchor = Selector::parse("a[href]").unwrap();

        let mut candidates = Vec::new();
        for element in document.select(&anchor) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            if !href.contains("/p/") && !href.contains("/news/") {
                continue;
            }
            let Ok(link) = absolutize(BASE_URL, href) else {
                continue;
            };
            let title = element.text().collect::<String>().trim().to_string();
            // Anchors wrapping images or nav chrome have no usable text.
            if title.chars().count() < 6 || !seen.insert(link.clone()) {
                continue;
            }
            candidates.push(Candidate {
                title,
                link,
                tag: TAG.to_string(),
                date: target_date(),
            });
        }
        candidates
    }
}

impl Default for Kr36Scraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scraper for Kr36Scraper {
    fn tag(&self) -> &str {
        TAG
    }

    async fn list_candidates(&self) -> Vec<Candidate> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for url in Self::listing_urls() {
            match self.client.get_text(&url).await {
                Ok(html) => {
                    let found = self.parse_listing(&html, &mut seen);
                    debug!(url = %url, count = found.len(), "36kr listing parsed");
                    candidates.extend(found);
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "36kr listing unavailable");
                }
            }
            if candidates.len() >= MAX_CANDIDATES {
                break;
            }
        }
        candidates.truncate(MAX_CANDIDATES);
        candidates
    }

    async fn fetch_content(&self, link: &str) -> String {
        let html = match self.client.get_text(link).await {
            Ok(html) => html,
            Err(e) => {
                warn!(link, error = %e, "36kr article fetch failed");
                return CONTENT_UNAVAILABLE.to_string();
            }
        };

        let document = Html::parse_document(&html);
        let body = Selector::parse("div.articleDetailContent p, div.common-width p").unwrap();
        let paragraphs: Vec<String> = document
            .select(&body)
            .map(|p| p.text().collect::<String>().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        if paragraphs.is_empty() {
            return CONTENT_UNAVAILABLE.to_string();
        }
        clamp_chars(&paragraphs.join("\n"), CONTENT_FETCH_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing_dedups_and_filters() {
        let scraper = Kr36Scraper::new();
        let html = r#"
            <div>
              <a href="/p/3141592653">一篇关于人工智能的深度报道</a>
              <a href="/p/3141592653">一篇关于人工智能的深度报道</a>
              <a href="/p/2718281828">国产大模型再获融资</a>
              <a href="/about">关于</a>
              <a href="/p/1111111111"></a>
            </div>
        "#;
        let mut seen = HashSet::new();
        let candidates = scraper.parse_listing(html, &mut seen);
        assert_eq!(candidates.len(), 2);
        assert!(candidates[0].link.starts_with("https://36kr.com/p/"));
        assert_eq!(candidates[0].tag, "36kr");
    }
}
