mod services;
mod table;

use serde::{Deserialize, Serialize};

pub use services::NutritionService;

/// Nutrition facts for one serving of a reference food.
///
/// Serialized with the field names of the stored `_ai` records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionInfo {
    #[serde(rename = "calories")]
    pub calories_kcal: f64,
    #[serde(rename = "carbs")]
    pub carbs_grams: f64,
    #[serde(rename = "protein")]
    pub protein_grams: f64,
    #[serde(rename = "fat")]
    pub fat_grams: f64,
    #[serde(rename = "unit")]
    pub serving_unit: String,
}

impl NutritionInfo {
    fn from_row(row: &(&str, f64, f64, f64, f64, &str)) -> Self {
        Self {
            calories_kcal: row.1,
            carbs_grams: row.2,
            protein_grams: row.3,
            fat_grams: row.4,
            serving_unit: row.5.to_string(),
        }
    }
}

/// Immutable reference tables, loaded once and shared by handle.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    nutrition: Vec<(String, NutritionInfo)>,
    unknown: NutritionInfo,
    translations: Vec<(String, String)>,
}

impl ReferenceData {
    pub fn builtin() -> Self {
        Self {
            nutrition: table::NUTRITION
                .iter()
                .map(|row| (row.0.to_string(), NutritionInfo::from_row(row)))
                .collect(),
            unknown: NutritionInfo::from_row(&table::UNKNOWN),
            translations: table::TRANSLATIONS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Custom tables; keys are normalized (trimmed, lowercased) and order is kept.
    pub fn new(
        nutrition: Vec<(String, NutritionInfo)>,
        unknown: NutritionInfo,
        translations: Vec<(String, String)>,
    ) -> Self {
        Self {
            nutrition: nutrition
                .into_iter()
                .map(|(k, v)| (normalize_label(&k), v))
                .collect(),
            unknown,
            translations: translations
                .into_iter()
                .map(|(k, v)| (normalize_label(&k), v))
                .collect(),
        }
    }

    pub fn nutrition_entries(&self) -> &[(String, NutritionInfo)] {
        &self.nutrition
    }

    pub fn unknown(&self) -> &NutritionInfo {
        &self.unknown
    }

    pub fn translations(&self) -> &[(String, String)] {
        &self.translations
    }
}

pub(crate) fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}
