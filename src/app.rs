use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use bytes::Bytes;
use time::{Date, Duration};
use tracing::{debug, info, instrument};

use crate::error::AppError;
use crate::images::services::prepare_upload;
use crate::meals::dto::{DayView, MealAnalysis, MealSlot, RecognitionRecord};
use crate::meals::repo::DayRecordRepository;
use crate::meals::services::{localized_alternates, manual_record, record_from_outcome};
use crate::nutrition::NutritionService;
use crate::state::AppState;
use crate::stats::{self, DailyNutritionSummary, DayStats};

// wider than any range `Date` can span; keeps `Duration::days` from overflowing
const MAX_DELTA_DAYS: u64 = 1 << 32;

const WEEKDAYS: [&str; 7] = ["週日", "週一", "週二", "週三", "週四", "週五", "週六"];

/// The day-view session: the currently viewed date plus every operation a
/// front end needs on it.
pub struct DailyMeals {
    state: AppState,
    repo: DayRecordRepository,
    nutrition: NutritionService,
    current: RwLock<Date>,
    in_flight: Mutex<HashSet<(Date, MealSlot)>>,
}

/// Marks one (date, meal) analysis as running until dropped.
struct InFlight<'a> {
    slots: &'a Mutex<HashSet<(Date, MealSlot)>>,
    slot: (Date, MealSlot),
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(self.slots).remove(&self.slot);
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl DailyMeals {
    pub fn new(state: AppState) -> Self {
        let today = state.clock.today();
        Self {
            repo: state.repo(),
            nutrition: state.nutrition(),
            state,
            current: RwLock::new(today),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn repo(&self) -> &DayRecordRepository {
        &self.repo
    }

    pub fn current_date(&self) -> Date {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn today(&self) -> Date {
        self.state.clock.today()
    }

    /// Moves the viewed date by `delta_days`. A move past the representable
    /// range fails like any other out-of-bounds date and keeps the view.
    pub fn change_date(&self, delta_days: i64) -> Result<Date, AppError> {
        let target = (delta_days.unsigned_abs() <= MAX_DELTA_DAYS)
            .then(|| self.current_date().checked_add(Duration::days(delta_days)))
            .flatten();

        match target {
            Some(date) => self.go_to(date),
            None if delta_days > 0 => Err(AppError::FutureDateRejected {
                requested: Date::MAX,
                today: self.today(),
            }),
            None => Err(AppError::DateOutOfRange { delta_days }),
        }
    }

    /// Views `date`; dates after today are rejected and the view stays put.
    pub fn go_to(&self, date: Date) -> Result<Date, AppError> {
        let today = self.today();
        if date > today {
            debug!(requested = %date, %today, "future date rejected");
            return Err(AppError::FutureDateRejected {
                requested: date,
                today,
            });
        }
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = date;
        Ok(date)
    }

    pub fn date_label(&self) -> String {
        format_date_label(self.current_date(), self.today())
    }

    pub async fn load_day(&self) -> Result<DayView, AppError> {
        self.repo.load_day(self.current_date()).await
    }

    pub async fn upload_photo(
        &self,
        meal: MealSlot,
        content_type: &str,
        bytes: impl Into<Bytes>,
    ) -> Result<(), AppError> {
        let photo = prepare_upload(content_type, bytes)?;
        self.repo.set_photo(self.current_date(), meal, &photo).await
    }

    pub async fn save_note(&self, meal: MealSlot, text: &str) -> Result<(), AppError> {
        self.repo.set_note(self.current_date(), meal, text).await
    }

    fn begin_analysis(&self, date: Date, meal: MealSlot) -> Result<InFlight<'_>, AppError> {
        if !lock(&self.in_flight).insert((date, meal)) {
            return Err(AppError::RecognitionInProgress { date, meal });
        }
        Ok(InFlight {
            slots: &self.in_flight,
            slot: (date, meal),
        })
    }

    /// Recognizes the stored photo of `meal`, snapshots its nutrition and
    /// persists the record. Nothing is written unless every step succeeds.
    #[instrument(skip(self))]
    pub async fn analyze_meal(&self, meal: MealSlot) -> Result<MealAnalysis, AppError> {
        let date = self.current_date();
        let _guard = self.begin_analysis(date, meal)?;

        let photo = self
            .repo
            .get_photo(date, meal)
            .await?
            .ok_or(AppError::MissingPhoto { date, meal })?;

        let outcome = self.state.recognizer.recognize(&photo).await?;
        let record = record_from_outcome(&outcome, &self.nutrition, self.state.clock.now());
        self.repo.set_recognition(date, meal, &record).await?;

        Ok(MealAnalysis {
            date,
            meal,
            display_name: self.nutrition.localize(&record.food_label),
            alternates: localized_alternates(&outcome, &self.nutrition),
            record,
        })
    }

    /// Stores a hand-entered food for a meal that already has a photo.
    pub async fn record_manual_food(
        &self,
        meal: MealSlot,
        label: &str,
    ) -> Result<RecognitionRecord, AppError> {
        if !self.state.config.features.manual_input {
            return Err(AppError::FeatureDisabled("manual_input"));
        }
        if label.trim().is_empty() {
            return Err(AppError::EmptyFoodName);
        }

        let date = self.current_date();
        let record = manual_record(label, &self.nutrition, self.state.clock.now());
        self.repo.set_recognition(date, meal, &record).await?;
        info!(%date, %meal, food = %record.food_label, "manual food recorded");
        Ok(record)
    }

    /// Meals logged on the viewed date and the streak ending today.
    pub async fn stats(&self) -> Result<DayStats, AppError> {
        Ok(DayStats {
            logged_meals: stats::meal_count(&self.repo, self.current_date()).await?,
            streak_days: stats::current_streak(&self.repo, self.state.clock.as_ref()).await?,
        })
    }

    /// `None` when nutrition tracking is switched off.
    pub async fn nutrition_summary(&self) -> Result<Option<DailyNutritionSummary>, AppError> {
        if !self.state.config.features.nutrition_tracking {
            return Ok(None);
        }
        let summary =
            stats::daily_nutrition(&self.repo, self.current_date(), &self.state.config.goals)
                .await?;
        Ok(Some(summary))
    }
}

pub fn format_date_label(date: Date, today: Date) -> String {
    let month = u8::from(date.month());
    let weekday = WEEKDAYS[date.weekday().number_days_from_sunday() as usize];
    if date == today {
        format!("今天 {}月{}日 {}", month, date.day(), weekday)
    } else {
        format!("{}年{}月{}日 {}", date.year(), month, date.day(), weekday)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::recognition::simulator::LocalSimulator;
    use crate::recognition::{FallbackStrategy, FoodRecognitionService};
    use std::sync::Arc;
    use time::macros::date;

    const TODAY: Date = date!(2024 - 05 - 20);

    fn png(len: usize) -> Vec<u8> {
        let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.resize(len, 0);
        bytes
    }

    fn app() -> DailyMeals {
        DailyMeals::new(AppState::fake(TODAY))
    }

    fn app_with_config(config: AppConfig) -> DailyMeals {
        DailyMeals::new(AppState {
            config: Arc::new(config),
            ..AppState::fake(TODAY)
        })
    }

    #[test]
    fn date_labels() {
        assert_eq!(format_date_label(TODAY, TODAY), "今天 5月20日 週一");
        assert_eq!(
            format_date_label(date!(2024 - 05 - 19), TODAY),
            "2024年5月19日 週日"
        );
        assert_eq!(
            format_date_label(date!(2023 - 12 - 30), TODAY),
            "2023年12月30日 週六"
        );
    }

    #[test]
    fn navigation_refuses_the_future() {
        let app = app();
        assert_eq!(app.current_date(), TODAY);

        let err = app.change_date(1).unwrap_err();
        assert!(matches!(err, AppError::FutureDateRejected { requested, today }
            if requested == date!(2024 - 05 - 21) && today == TODAY));
        assert_eq!(app.current_date(), TODAY);

        assert_eq!(app.change_date(-3).unwrap(), date!(2024 - 05 - 17));
        assert_eq!(app.change_date(2).unwrap(), date!(2024 - 05 - 19));
        assert!(app.go_to(date!(2025 - 01 - 01)).is_err());
        assert_eq!(app.current_date(), date!(2024 - 05 - 19));
        assert_eq!(app.go_to(TODAY).unwrap(), TODAY);
        assert!(app.date_label().starts_with("今天"));
    }

    #[test]
    fn navigation_out_of_range_keeps_the_view() {
        let app = app();
        app.change_date(-2).unwrap();
        let viewed = app.current_date();

        assert!(matches!(
            app.change_date(i64::MAX),
            Err(AppError::FutureDateRejected { today, .. }) if today == TODAY
        ));
        assert!(matches!(
            app.change_date(-4_500_000),
            Err(AppError::DateOutOfRange { delta_days: -4_500_000 })
        ));
        assert!(matches!(
            app.change_date(i64::MIN),
            Err(AppError::DateOutOfRange { .. })
        ));
        assert_eq!(app.current_date(), viewed);
    }

    #[tokio::test]
    async fn upload_note_and_stats_follow_the_viewed_date() {
        let app = app();
        app.upload_photo(MealSlot::Breakfast, "", png(32)).await.unwrap();
        app.upload_photo(MealSlot::Lunch, "image/png", png(40)).await.unwrap();
        app.save_note(MealSlot::Lunch, "  with soup ").await.unwrap();

        let day = app.load_day().await.unwrap();
        assert_eq!(day.logged_count(), 2);
        assert_eq!(
            day.breakfast.photo.as_ref().map(|p| p.content_type.as_str()),
            Some("image/png")
        );
        assert_eq!(day.lunch.note.as_deref(), Some("with soup"));

        let stats = app.stats().await.unwrap();
        assert_eq!(stats, DayStats { logged_meals: 2, streak_days: 0 });

        app.upload_photo(MealSlot::Dinner, "image/png", png(24)).await.unwrap();
        assert_eq!(app.stats().await.unwrap().streak_days, 1);

        app.change_date(-1).unwrap();
        let stats = app.stats().await.unwrap();
        assert_eq!(stats.logged_meals, 0);
        assert_eq!(stats.streak_days, 1);
    }

    #[tokio::test]
    async fn rejected_upload_leaves_slot_empty() {
        let app = app();
        let err = app
            .upload_photo(MealSlot::Dinner, "text/plain", b"hello".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidPhoto(_)));
        assert!(!app.load_day().await.unwrap().dinner.is_logged());
    }

    #[tokio::test]
    async fn analyze_meal_persists_localized_result() {
        let app = app();
        app.upload_photo(MealSlot::Lunch, "image/png", png(16)).await.unwrap();

        let analysis = app.analyze_meal(MealSlot::Lunch).await.unwrap();
        assert_eq!(analysis.record.food_label, "fried rice");
        assert_eq!(analysis.display_name, "炒飯");
        assert_eq!(analysis.record.confidence_percent, 86.0);
        assert_eq!(analysis.record.nutrition.calories_kcal, 350.0);
        let alternates: Vec<&str> = analysis
            .alternates
            .iter()
            .map(|a| a.display_name.as_str())
            .collect();
        assert_eq!(alternates, vec!["沙拉", "義大利麵"]);

        let stored = app.load_day().await.unwrap().lunch.recognition;
        assert_eq!(stored, Some(analysis.record));
    }

    #[tokio::test]
    async fn analyze_without_photo_fails_and_writes_nothing() {
        let app = app();
        let err = app.analyze_meal(MealSlot::Dinner).await.unwrap_err();
        assert!(matches!(err, AppError::MissingPhoto { meal: MealSlot::Dinner, .. }));
        assert!(app.load_day().await.unwrap().dinner.recognition.is_none());

        // the slot is free again after a failure
        app.upload_photo(MealSlot::Dinner, "image/png", png(16)).await.unwrap();
        assert!(app.analyze_meal(MealSlot::Dinner).await.is_ok());
    }

    #[tokio::test]
    async fn concurrent_analysis_of_same_slot_is_refused() {
        let recognizer = FoodRecognitionService::new(
            FallbackStrategy::new(
                None,
                Arc::new(LocalSimulator::new(
                    std::time::Duration::from_millis(50),
                    std::time::Duration::from_millis(50),
                )),
            ),
            0.3,
        );
        let app = DailyMeals::new(AppState {
            recognizer: Arc::new(recognizer),
            ..AppState::fake(TODAY)
        });
        app.upload_photo(MealSlot::Breakfast, "image/png", png(16)).await.unwrap();
        app.upload_photo(MealSlot::Lunch, "image/png", png(16)).await.unwrap();

        let (first, second, other) = tokio::join!(
            app.analyze_meal(MealSlot::Breakfast),
            app.analyze_meal(MealSlot::Breakfast),
            app.analyze_meal(MealSlot::Lunch),
        );
        assert!(first.is_ok());
        assert!(matches!(
            second,
            Err(AppError::RecognitionInProgress { meal: MealSlot::Breakfast, .. })
        ));
        assert!(other.is_ok());

        assert!(app.analyze_meal(MealSlot::Breakfast).await.is_ok());
    }

    #[tokio::test]
    async fn disabled_recognition_is_reported() {
        let recognizer = FoodRecognitionService::new(
            FallbackStrategy::new(None, Arc::new(LocalSimulator::instant())),
            0.3,
        )
        .disabled();
        let app = DailyMeals::new(AppState {
            recognizer: Arc::new(recognizer),
            ..AppState::fake(TODAY)
        });
        app.upload_photo(MealSlot::Lunch, "image/png", png(16)).await.unwrap();
        assert!(matches!(
            app.analyze_meal(MealSlot::Lunch).await,
            Err(AppError::FeatureDisabled("ai_recognition"))
        ));
    }

    #[tokio::test]
    async fn manual_food_entry() {
        let app = app();
        assert!(matches!(
            app.record_manual_food(MealSlot::Dinner, "ramen").await,
            Err(AppError::MissingPhoto { .. })
        ));

        app.upload_photo(MealSlot::Dinner, "image/png", png(20)).await.unwrap();
        assert!(matches!(
            app.record_manual_food(MealSlot::Dinner, "   ").await,
            Err(AppError::EmptyFoodName)
        ));

        let record = app.record_manual_food(MealSlot::Dinner, " Ramen ").await.unwrap();
        assert_eq!(record.food_label, "Ramen");
        assert_eq!(record.confidence_percent, 100.0);
        assert_eq!(record.nutrition.calories_kcal, 436.0);

        let summary = app.nutrition_summary().await.unwrap().expect("tracking on");
        assert_eq!(summary.recognized_meals, 1);
        assert_eq!(summary.totals.calories_kcal, 436.0);
    }

    #[tokio::test]
    async fn feature_flags_gate_manual_entry_and_summary() {
        let mut config = AppConfig::default();
        config.features.manual_input = false;
        config.features.nutrition_tracking = false;
        let app = app_with_config(config);
        app.upload_photo(MealSlot::Dinner, "image/png", png(20)).await.unwrap();

        assert!(matches!(
            app.record_manual_food(MealSlot::Dinner, "ramen").await,
            Err(AppError::FeatureDisabled("manual_input"))
        ));
        assert!(app.nutrition_summary().await.unwrap().is_none());
    }
}
