use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::images::services::Photo;
use crate::recognition::backend::{BackendError, RecognitionBackend};
use crate::recognition::dto::Candidate;

/// Hosted image classifier (Hugging Face inference API, directly or via proxy).
///
/// The raw image bytes are POSTed with the photo's content type and the
/// response is a JSON array of `{label, score}`.
pub struct RemoteClassifier {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifierResponse {
    Flat(Vec<Candidate>),
    Nested(Vec<Vec<Candidate>>),
    Error { error: String },
}

impl RemoteClassifier {
    pub fn new(endpoint: impl Into<String>, token: Option<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            token: token.filter(|t| !t.trim().is_empty()),
            timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(&self, photo: &Photo) -> Result<Vec<Candidate>, BackendError> {
        let mut req = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, photo.content_type.as_str())
            .body(photo.bytes.clone());
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let response = req
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Http {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        parse_response(&body)
    }
}

fn parse_response(body: &str) -> Result<Vec<Candidate>, BackendError> {
    let parsed: ClassifierResponse =
        serde_json::from_str(body).map_err(|e| BackendError::Decode(e.to_string()))?;
    match parsed {
        ClassifierResponse::Flat(candidates) => Ok(candidates),
        ClassifierResponse::Nested(batches) => Ok(batches.into_iter().next().unwrap_or_default()),
        ClassifierResponse::Error { error } => Err(BackendError::Unavailable(error)),
    }
}

#[async_trait]
impl RecognitionBackend for RemoteClassifier {
    fn name(&self) -> &str {
        "remote"
    }

    async fn classify(&self, photo: &Photo) -> Result<Vec<Candidate>, BackendError> {
        debug!(endpoint = %self.endpoint, size = photo.len(), "calling remote classifier");
        // dropping the request future aborts the in-flight call
        match tokio::time::timeout(self.timeout, self.request(photo)).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout(self.timeout)),
        }
    }
}
