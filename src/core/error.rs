use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("credits tier must be 0-5, got {0}")]
    InvalidCreditsTier(u8),
    #[error("zoom level must be 0-{max}, got {value}")]
    InvalidZoom { value: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
