use serde::Serialize;
use time::Date;

use crate::clock::Clock;
use crate::config::DailyGoals;
use crate::error::AppError;
use crate::meals::dto::MealSlot;
use crate::meals::repo::DayRecordRepository;

/// Upper bound on the backward scan; the streak never exceeds it.
pub const MAX_STREAK_DAYS: u32 = 365;

/// Counters shown above the day view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayStats {
    pub logged_meals: usize,
    pub streak_days: u32,
}

/// Number of slots with a stored photo on `date` (0..=3).
pub async fn meal_count(repo: &DayRecordRepository, date: Date) -> Result<usize, AppError> {
    let mut count = 0;
    for meal in MealSlot::ALL {
        if repo.has_meal(date, meal).await? {
            count += 1;
        }
    }
    Ok(count)
}

pub async fn today_meal_count(
    repo: &DayRecordRepository,
    clock: &dyn Clock,
) -> Result<usize, AppError> {
    meal_count(repo, clock.today()).await
}

/// Consecutive days, walking back from the clock's today inclusive, on
/// which all three meals were logged.
pub async fn current_streak(
    repo: &DayRecordRepository,
    clock: &dyn Clock,
) -> Result<u32, AppError> {
    let mut streak = 0;
    let mut day = clock.today();

    while streak < MAX_STREAK_DAYS {
        if meal_count(repo, day).await? != MealSlot::ALL.len() {
            break;
        }
        streak += 1;
        match day.previous_day() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    Ok(streak)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NutritionTotals {
    pub calories_kcal: f64,
    pub carbs_grams: f64,
    pub protein_grams: f64,
    pub fat_grams: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyNutritionSummary {
    pub date: Date,
    pub recognized_meals: usize,
    pub totals: NutritionTotals,
    /// Percent of each daily goal, one decimal.
    pub percent_of_goal: NutritionTotals,
}

fn percent(value: f64, goal: f64) -> f64 {
    if goal <= 0.0 {
        return 0.0;
    }
    (value / goal * 1000.0).round() / 10.0
}

/// Sums the nutrition snapshots of the day's recognized meals.
pub async fn daily_nutrition(
    repo: &DayRecordRepository,
    date: Date,
    goals: &DailyGoals,
) -> Result<DailyNutritionSummary, AppError> {
    let mut totals = NutritionTotals::default();
    let mut recognized_meals = 0;

    for meal in MealSlot::ALL {
        if let Some(record) = repo.get_recognition(date, meal).await? {
            recognized_meals += 1;
            totals.calories_kcal += record.nutrition.calories_kcal;
            totals.carbs_grams += record.nutrition.carbs_grams;
            totals.protein_grams += record.nutrition.protein_grams;
            totals.fat_grams += record.nutrition.fat_grams;
        }
    }

    Ok(DailyNutritionSummary {
        date,
        recognized_meals,
        totals,
        percent_of_goal: NutritionTotals {
            calories_kcal: percent(totals.calories_kcal, goals.calories),
            carbs_grams: percent(totals.carbs_grams, goals.carbs),
            protein_grams: percent(totals.protein_grams, goals.protein),
            fat_grams: percent(totals.fat_grams, goals.fat),
        },
    })
}
