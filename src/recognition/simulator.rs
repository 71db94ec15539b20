use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::images::services::Photo;
use crate::recognition::backend::{BackendError, RecognitionBackend};
use crate::recognition::dto::Candidate;

pub const DEFAULT_CANDIDATES: [&str; 12] = [
    "pizza",
    "hamburger",
    "sushi",
    "ramen",
    "fried rice",
    "salad",
    "pasta",
    "steak",
    "pancake",
    "dumpling",
    "fried chicken",
    "ice cream",
];

/// Offline stand-in for the remote classifier.
///
/// The result depends only on the photo's byte length: three consecutive
/// entries of the candidate list, starting at `len % candidates.len()`.
/// Only the latency is random.
pub struct LocalSimulator {
    candidates: Vec<String>,
    min_delay: Duration,
    max_delay: Duration,
}

impl LocalSimulator {
    pub fn new(min_delay: Duration, max_delay: Duration) -> Self {
        Self::with_candidates(
            DEFAULT_CANDIDATES.iter().map(|c| c.to_string()).collect(),
            min_delay,
            max_delay,
        )
    }

    pub fn with_candidates(
        candidates: Vec<String>,
        min_delay: Duration,
        max_delay: Duration,
    ) -> Self {
        let (min_delay, max_delay) = if min_delay <= max_delay {
            (min_delay, max_delay)
        } else {
            (max_delay, min_delay)
        };
        Self {
            candidates,
            min_delay,
            max_delay,
        }
    }

    /// No artificial latency.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn predict(&self, byte_len: usize) -> Result<Vec<Candidate>, BackendError> {
        let n = self.candidates.len();
        if n == 0 {
            return Err(BackendError::Unavailable("simulator has no candidates".into()));
        }
        let start = byte_len % n;
        let primary = 0.70 + (byte_len % 25) as f64 / 100.0;
        let scores = [primary, primary - 0.30, primary - 0.45];

        Ok(scores
            .iter()
            .enumerate()
            .map(|(i, score)| Candidate::new(self.candidates[(start + i) % n].clone(), *score))
            .collect())
    }

    fn delay(&self) -> Duration {
        let lo = self.min_delay.as_millis() as u64;
        let hi = self.max_delay.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(lo..=hi))
    }
}

#[async_trait]
impl RecognitionBackend for LocalSimulator {
    fn name(&self) -> &str {
        "simulator"
    }

    async fn classify(&self, photo: &Photo) -> Result<Vec<Candidate>, BackendError> {
        let delay = self.delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.predict(photo.len())
    }
}
