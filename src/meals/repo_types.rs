use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use crate::meals::dto::RecognitionRecord;
use crate::nutrition::NutritionInfo;

/// JSON layout of a `_ai` value: `{foodName, confidence, nutrition, timestamp}`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecognition {
    pub food_name: String,
    #[serde(deserialize_with = "number_or_string")]
    pub confidence: f64,
    pub nutrition: NutritionInfo,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

// older writers stored the confidence as a fixed-point string ("87.3")
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

impl From<StoredRecognition> for RecognitionRecord {
    fn from(r: StoredRecognition) -> Self {
        Self {
            food_label: r.food_name,
            confidence_percent: r.confidence,
            nutrition: r.nutrition,
            recognized_at: r.timestamp,
        }
    }
}

impl From<&RecognitionRecord> for StoredRecognition {
    fn from(r: &RecognitionRecord) -> Self {
        Self {
            food_name: r.food_label.clone(),
            confidence: r.confidence_percent,
            nutrition: r.nutrition.clone(),
            timestamp: r.recognized_at,
        }
    }
}
