use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("relay error from {0}: {1}")]
    Relay(String, String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("cache decode error: {0}")]
    CacheDecode(String),

    #[error("cache write error: {0}")]
    CacheWrite(String),

    #[error("output write error: {0}")]
    OutputWrite(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FeedError>;
