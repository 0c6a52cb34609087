use thiserror::Error;

use crate::kernel::FormatError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// A required environment setting is not configured.
    #[error("{0} 환경변수가 필요합니다.")]
    MissingConfig(&'static str),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream error ({status}): {body}")]
    Upstream { status: u16, body: String },
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("signing error: {0}")]
    Signing(String),
    #[error(transparent)]
    Format(#[from] FormatError),
}
