pub mod config;
pub mod error;
pub mod notify;
pub mod types;

pub use config::AppConfig;
pub use error::Error;
pub use types::{
    clamp_chars, target_date, Article, ProcessedArticle, CONTENT_FETCH_LIMIT, CONTENT_UNAVAILABLE,
    PER_SOURCE_LIMIT, PROMPT_EXCERPT_LIMIT, SUMMARY_FAILED, SUMMARY_MAX, SUMMARY_MIN,
};

pub type Result<T> = std::result::Result<T, Error>;
