use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("scrape error: {0}")]
    Scrape(String),

    #[error("agent invocation failed: {0}")]
    Agent(String),

    #[error("structured response parse failed: {0}")]
    Parse(String),

    #[error("storage error: {0}")]
    Storage(String),
}
