pub mod collector;
pub mod sites;

#[cfg(feature = "browser")]
pub mod browser;

pub use collector::Collector;
pub use sites::{default_scrapers, Candidate, Scraper, SiteClient};
