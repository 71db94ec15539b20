use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::images::services::Photo;
use crate::recognition::dto::Candidate;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("transport: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("unavailable: {0}")]
    Unavailable(String),
}

/// A food classifier. Candidates may come back in any order.
#[async_trait]
pub trait RecognitionBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn classify(&self, photo: &Photo) -> Result<Vec<Candidate>, BackendError>;
}
