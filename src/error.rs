use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedtuiError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("network error: {0}")]
    Transport(String),

    #[error("server rejected the request ({0}): {1}")]
    Server(u16, String),

    #[error("server returned an empty or unreadable response")]
    EmptyResponse,

    #[error("JSON error: {0}")]
    Json(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("not signed in: {0}")]
    Auth(String),

    #[error("error: {0}")]
    Anyhow(String),
}

impl From<serde_json::Error> for FeedtuiError {
    fn from(err: serde_json::Error) -> Self {
        FeedtuiError::Json(err.to_string())
    }
}

impl From<io::Error> for FeedtuiError {
    fn from(err: io::Error) -> Self {
        FeedtuiError::Io(err.to_string())
    }
}

impl From<anyhow::Error> for FeedtuiError {
    fn from(err: anyhow::Error) -> Self {
        FeedtuiError::Anyhow(err.to_string())
    }
}
