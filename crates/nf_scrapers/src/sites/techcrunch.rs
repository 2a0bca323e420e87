use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use nf_core::{clamp_chars, target_date, CONTENT_FETCH_LIMIT, CONTENT_UNAVAILABLE};
use scraper::{Html, Selector};
use tracing::{debug, warn};

use super::{recent_dates, Candidate, Scraper, SiteClient};

const BASE_URL: &str = "https://techcrunch.com";
const TAG: &str = "TechCrunch";
const LISTING_PAGES: u32 = 4;
const DATE_WINDOW_DAYS: u64 = 3;

/// TechCrunch publishes the article date inside the URL path
/// (`/YYYY/MM/DD/slug/`), which makes date filtering reliable.
pub struct TechCrunchScraper {
    client: SiteClient,
}

impl TechCrunchScraper {
    pub fn new() -> Self {
        Self {
            client: SiteClient::new(),
        }
    }

    fn parse_listing(&self, html: &str, window: &[NaiveDate], seen: &mut HashSet<String>) -> Vec<Candidate> {
        let document = Html::parse_document(html);
        let link_selector = Selector::parse("h3.loop-card__title a.loop-card__title-link").unwrap();

        let mut candidates = Vec::new();
        for element in document.select(&link_selector) {
            let Some(link) = element.value().attr("href") else {
                continue;
            };
            let title = element.text().collect::<String>().trim().to_string();
            if title.is_empty() || !seen.insert(link.to_string()) {
                continue;
            }
            match date_from_link(link) {
                Some(published) if window.contains(&published) => {
                    candidates.push(Candidate {
                        title,
                        link: link.to_string(),
                        tag: TAG.to_string(),
                        date: target_date(),
                    });
                }
                _ => {}
            }
        }
        candidates
    }
}

impl Default for TechCrunchScraper {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract `YYYY-MM-DD` from a TechCrunch article URL.
fn date_from_link(link: &str) -> Option<NaiveDate> {
    let path = link.strip_prefix("https://")?.splitn(2, '/').nth(1)?;
    let mut segments = path.split('/');
    let year = segments.next()?;
    let month = segments.next()?;
    let day = segments.next()?;
    NaiveDate::parse_from_str(&format!("{}-{}-{}", year, month, day), "%Y-%m-%d").ok()
}

#[async_trait]
impl Scraper for TechCrunchScraper {
    fn tag(&self) -> &str {
        TAG
    }

    async fn list_candidates(&self) -> Vec<Candidate> {
        let window = recent_dates(DATE_WINDOW_DAYS);
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for page in 1..=LISTING_PAGES {
            let url = format!("{}/latest/page/{}/", BASE_URL, page);
            match self.client.get_text(&url).await {
                Ok(html) => {
                    let found = self.parse_listing(&html, &window, &mut seen);
                    debug!(page, count = found.len(), "TechCrunch listing page parsed");
                    candidates.extend(found);
                }
                Err(e) => {
                    warn!(page, error = %e, "TechCrunch listing page unavailable");
                }
            }
        }
        candidates
    }

    async fn fetch_content(&self, link: &str) -> String {
        let html = match self.client.get_text(link).await {
            Ok(html) => html,
            Err(e) => {
                warn!(link, error = %e, "TechCrunch article fetch failed");
                return CONTENT_UNAVAILABLE.to_string();
            }
        };

        let document = Html::parse_document(&html);
        let scoped = Selector::parse("div.entry-content p").unwrap();
        let fallback = Selector::parse("p").unwrap();

        let mut paragraphs: Vec<String> = document
            .select(&scoped)
            .map(|p| p.text().collect::<String>().trim().to_string())
            .filter(|p| p.chars().count() > 10)
            .collect();
        if paragraphs.is_empty() {
            paragraphs = document
                .select(&fallback)
                .map(|p| p.text().collect::<String>().trim().to_string())
                .filter(|p| p.chars().count() > 10)
                .collect();
        }

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
    fn test_date_from_link() {
        assert_eq!(
            date_from_link("https://techcrunch.com/2026/08/27/some-story/"),
            NaiveDate::from_ymd_opt(2026, 8, 27)
        );
        assert_eq!(date_from_link("https://techcrunch.com/tag/ai/"), None);
        assert_eq!(date_from_link("not-a-url"), None);
    }

    #[test]
    fn test_parse_listing_filters_and_dedups() {
        let scraper = TechCrunchScraper::new();
        let recent = recent_dates(3)[1];
        let html = format!(
            r#"
            <ul>
              <li><h3 class="loop-card__title"><a class="loop-card__title-link"
                  href="https://techcrunch.com/{0}/fresh-story/">Fresh story</a></h3></li>
              <li><h3 class="loop-card__title"><a class="loop-card__title-link"
                  href="https://techcrunch.com/{0}/fresh-story/">Fresh story repeated</a></h3></li>
              <li><h3 class="loop-card__title"><a class="loop-card__title-link"
                  href="https://techcrunch.com/2020/01/01/stale-story/">Stale story</a></h3></li>
            </ul>
            "#,
            recent.format("%Y/%m/%d"),
        );

        let mut seen = HashSet::new();
        let candidates = scraper.parse_listing(&html, &recent_dates(3), &mut seen);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Fresh story");
        assert_eq!(candidates[0].tag, "TechCrunch");
        assert_eq!(candidates[0].date, target_date());
    }
}
