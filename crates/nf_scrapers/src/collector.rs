use nf_core::Article;
use tracing::info;

use crate::sites::Scraper;

/// Runs every configured scraper in a fixed order and concatenates their
/// output, capping the candidates taken from any single source.
///
/// Failure isolation is per-source: a scraper that yields nothing (its
/// contract turns all internal failures into an empty list) contributes
/// zero items and collection continues. No cross-source dedup happens
/// here: the same story reported by two sources is a different citation.
pub struct Collector {
    scrapers: Vec<Box<dyn Scraper>>,
    per_source_limit: usize,
}

impl Collector {
    pub fn new(scrapers: Vec<Box<dyn Scraper>>, per_source_limit: usize) -> Self {
        Self {
            scrapers,
            per_source_limit,
        }
    }

    pub fn source_tags(&self) -> Vec<&str> {
        self.scrapers.iter().map(|s| s.tag()).collect()
    }

    pub async fn fetch_all(&self) -> Vec<Article> {
        let mut articles = Vec::new();

        for scraper in &self.scrapers {
            let candidates = scraper.list_candidates().await;
            let taken = candidates.len().min(self.per_source_limit);
            info!(
                source = scraper.tag(),
                found = candidates.len(),
                taken,
                "📰 source collected"
            );

            for candidate in candidates.into_iter().take(self.per_source_limit) {
                let content = scraper.fetch_content(&candidate.link).await;
                articles.push(Article {
                    tag: candidate.tag,
                    title: candidate.title,
                    link: candidate.link,
                    content,
                    date: candidate.date,
                });
            }
        }

        info!(total = articles.len(), "🎯 collection finished");
        articles
    }
}
