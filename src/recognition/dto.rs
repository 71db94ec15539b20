use serde::{Deserialize, Serialize};

/// One (label, score) pair as produced by a classifier, score in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub label: String,
    pub score: f64,
}

impl Candidate {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredLabel {
    pub label: String,
    pub confidence_percent: f64,
}

/// Filtered recognition result: the primary label plus up to two alternates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognitionOutcome {
    pub food_label: String,
    pub confidence_percent: f64,
    pub alternates: Vec<ScoredLabel>,
}

/// `score * 100`, rounded to one decimal.
pub fn confidence_percent(score: f64) -> f64 {
    (score * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_rounded_to_one_decimal() {
        assert_eq!(confidence_percent(0.8766), 87.7);
        assert_eq!(confidence_percent(0.3), 30.0);
        assert_eq!(confidence_percent(1.0), 100.0);
        assert_eq!(confidence_percent(0.12345), 12.3);
    }
}
