use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::images::services::Photo;
use crate::nutrition::NutritionInfo;

/// One of the three fixed daily meals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    /// Canonical enumeration used when counting "all meals logged".
    pub const ALL: [MealSlot; 3] = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];

    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealSlot {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealSlot::Breakfast),
            "lunch" => Ok(MealSlot::Lunch),
            "dinner" => Ok(MealSlot::Dinner),
            other => anyhow::bail!("unknown meal slot: {other}"),
        }
    }
}

/// Result of a successful recognition run, persisted per meal slot.
///
/// The nutrition is a snapshot taken at recognition time and is never
/// looked up again.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionRecord {
    pub food_label: String,
    pub confidence_percent: f64,
    pub nutrition: NutritionInfo,
    pub recognized_at: OffsetDateTime,
}

/// Everything stored for a single (date, meal) pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealEntry {
    pub photo: Option<Photo>,
    pub note: Option<String>,
    pub recognition: Option<RecognitionRecord>,
}

impl MealEntry {
    pub fn is_logged(&self) -> bool {
        self.photo.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayView {
    pub date: Date,
    pub breakfast: MealEntry,
    pub lunch: MealEntry,
    pub dinner: MealEntry,
}

impl DayView {
    pub fn meal(&self, meal: MealSlot) -> &MealEntry {
        match meal {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
        }
    }

    pub fn logged_count(&self) -> usize {
        MealSlot::ALL
            .iter()
            .filter(|m| self.meal(**m).is_logged())
            .count()
    }
}

/// A recognized label with its display name and confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledCandidate {
    pub label: String,
    pub display_name: String,
    pub confidence_percent: f64,
}

/// Outcome of the full analysis pipeline for one meal.
#[derive(Debug, Clone, PartialEq)]
pub struct MealAnalysis {
    pub date: Date,
    pub meal: MealSlot,
    pub record: RecognitionRecord,
    pub display_name: String,
    pub alternates: Vec<LabeledCandidate>,
}
