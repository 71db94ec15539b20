use time::OffsetDateTime;

use crate::meals::dto::{LabeledCandidate, RecognitionRecord};
use crate::nutrition::NutritionService;
use crate::recognition::dto::RecognitionOutcome;

/// What replacing a meal's photo does to its stored recognition.
///
/// Keeping it means a nutrition result may describe a photo that is no
/// longer shown; existing data was written under that rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PhotoSwapPolicy {
    #[default]
    KeepRecognition,
    ClearRecognition,
}

impl PhotoSwapPolicy {
    pub fn clears_recognition(self) -> bool {
        matches!(self, PhotoSwapPolicy::ClearRecognition)
    }
}

/// Confidence used for records entered by hand.
pub const MANUAL_CONFIDENCE_PERCENT: f64 = 100.0;

/// Snapshots nutrition for the primary label of `outcome`.
pub fn record_from_outcome(
    outcome: &RecognitionOutcome,
    nutrition: &NutritionService,
    at: OffsetDateTime,
) -> RecognitionRecord {
    RecognitionRecord {
        food_label: outcome.food_label.clone(),
        confidence_percent: outcome.confidence_percent,
        nutrition: nutrition.lookup(&outcome.food_label),
        recognized_at: at,
    }
}

pub fn manual_record(
    label: &str,
    nutrition: &NutritionService,
    at: OffsetDateTime,
) -> RecognitionRecord {
    RecognitionRecord {
        food_label: label.trim().to_string(),
        confidence_percent: MANUAL_CONFIDENCE_PERCENT,
        nutrition: nutrition.lookup(label),
        recognized_at: at,
    }
}

pub fn localized_alternates(
    outcome: &RecognitionOutcome,
    nutrition: &NutritionService,
) -> Vec<LabeledCandidate> {
    outcome
        .alternates
        .iter()
        .map(|alt| LabeledCandidate {
            label: alt.label.clone(),
            display_name: nutrition.localize(&alt.label),
            confidence_percent: alt.confidence_percent,
        })
        .collect()
}
