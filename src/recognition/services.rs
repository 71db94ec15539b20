use std::sync::Arc;

use tracing::{info, warn};

use crate::config::RecognitionConfig;
use crate::error::AppError;
use crate::images::services::Photo;
use crate::recognition::backend::{BackendError, RecognitionBackend};
use crate::recognition::dto::{confidence_percent, Candidate, RecognitionOutcome, ScoredLabel};
use crate::recognition::remote::RemoteClassifier;
use crate::recognition::simulator::LocalSimulator;

/// Number of candidates reported: the primary plus two alternates.
pub const MAX_RESULTS: usize = 3;

/// Next step after the primary backend answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Accept,
    Fallback,
}

/// Primary backend with a single fallback. Which one serves a request is a
/// pure function of the primary's outcome.
pub struct FallbackStrategy {
    primary: Option<Arc<dyn RecognitionBackend>>,
    fallback: Arc<dyn RecognitionBackend>,
}

impl FallbackStrategy {
    pub fn new(
        primary: Option<Arc<dyn RecognitionBackend>>,
        fallback: Arc<dyn RecognitionBackend>,
    ) -> Self {
        Self { primary, fallback }
    }

    pub fn next_stage(primary: &Result<Vec<Candidate>, BackendError>) -> Stage {
        match primary {
            Ok(_) => Stage::Accept,
            Err(_) => Stage::Fallback,
        }
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    /// Runs the primary (if any), falling back once on failure.
    pub async fn classify(&self, photo: &Photo) -> Result<Vec<Candidate>, BackendError> {
        let Some(primary) = &self.primary else {
            return self.fallback.classify(photo).await;
        };

        let outcome = primary.classify(photo).await;
        match Self::next_stage(&outcome) {
            Stage::Accept => outcome,
            Stage::Fallback => {
                if let Err(e) = &outcome {
                    warn!(
                        error = %e,
                        backend = primary.name(),
                        fallback = self.fallback.name(),
                        "recognition backend failed, falling back"
                    );
                }
                self.fallback.classify(photo).await
            }
        }
    }
}

/// Classification followed by confidence filtering.
pub struct FoodRecognitionService {
    strategy: FallbackStrategy,
    threshold: f64,
    enabled: bool,
}

impl FoodRecognitionService {
    pub fn new(strategy: FallbackStrategy, threshold: f64) -> Self {
        Self {
            strategy,
            threshold,
            enabled: true,
        }
    }

    pub fn from_config(config: &RecognitionConfig) -> Self {
        let primary = config.remote_target().map(|(endpoint, token)| {
            Arc::new(RemoteClassifier::new(endpoint, token, config.timeout))
                as Arc<dyn RecognitionBackend>
        });
        let simulator = Arc::new(LocalSimulator::new(
            config.simulator_min_delay,
            config.simulator_max_delay,
        )) as Arc<dyn RecognitionBackend>;

        Self {
            strategy: FallbackStrategy::new(primary, simulator),
            threshold: config.confidence_threshold,
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn uses_remote(&self) -> bool {
        self.strategy.has_primary()
    }

    pub async fn recognize(&self, photo: &Photo) -> Result<RecognitionOutcome, AppError> {
        if !self.enabled {
            return Err(AppError::FeatureDisabled("ai_recognition"));
        }

        let candidates = self
            .strategy
            .classify(photo)
            .await
            .map_err(backend_failure)?;
        let outcome = filter_candidates(candidates, self.threshold)?;
        info!(
            food = %outcome.food_label,
            confidence = outcome.confidence_percent,
            alternates = outcome.alternates.len(),
            "food recognized"
        );
        Ok(outcome)
    }
}

fn backend_failure(e: BackendError) -> AppError {
    match e {
        BackendError::Timeout(after) => AppError::RecognitionTimeout(after),
        other => AppError::RecognitionBackendFailure(other.to_string()),
    }
}

/// Drops candidates below `threshold`, orders the rest by descending score
/// (stable) and keeps the first [`MAX_RESULTS`].
pub fn filter_candidates(
    candidates: Vec<Candidate>,
    threshold: f64,
) -> Result<RecognitionOutcome, AppError> {
    let mut kept: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| c.score.is_finite() && c.score >= threshold)
        .collect();
    kept.sort_by(|a, b| b.score.total_cmp(&a.score));
    kept.truncate(MAX_RESULTS);

    let mut iter = kept.into_iter();
    let primary = iter.next().ok_or(AppError::LowConfidence)?;
    Ok(RecognitionOutcome {
        food_label: primary.label,
        confidence_percent: confidence_percent(primary.score),
        alternates: iter
            .map(|c| ScoredLabel {
                label: c.label,
                confidence_percent: confidence_percent(c.score),
            })
            .collect(),
    })
}
