use std::sync::Arc;

use time::Date;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::images::services::{validate_photo, Photo};
use crate::meals::dto::{DayView, MealEntry, MealSlot, RecognitionRecord};
use crate::meals::repo_types::StoredRecognition;
use crate::meals::services::PhotoSwapPolicy;
use crate::storage::KvStore;

/// Namespace prefix of every persisted key.
pub const KEY_NAMESPACE: &str = "dailymeals";

/// Which fact of a meal a key addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Photo,
    Note,
    Recognition,
}

impl Field {
    fn suffix(self) -> &'static str {
        match self {
            Field::Photo => "",
            Field::Note => "_note",
            Field::Recognition => "_ai",
        }
    }
}

/// `YYYY-MM-DD`
pub fn iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// `dailymeals_<YYYY-MM-DD>_<meal>[_note|_ai]`
pub fn storage_key(date: Date, meal: MealSlot, field: Field) -> String {
    format!(
        "{}_{}_{}{}",
        KEY_NAMESPACE,
        iso_date(date),
        meal.as_str(),
        field.suffix()
    )
}

/// Per-day meal records on top of a [`KvStore`]. Every query is a direct
/// key lookup; there is no index.
#[derive(Clone)]
pub struct DayRecordRepository {
    store: Arc<dyn KvStore>,
    swap_policy: PhotoSwapPolicy,
}

impl DayRecordRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            swap_policy: PhotoSwapPolicy::default(),
        }
    }

    pub fn with_swap_policy(mut self, policy: PhotoSwapPolicy) -> Self {
        self.swap_policy = policy;
        self
    }

    pub async fn get_photo(&self, date: Date, meal: MealSlot) -> Result<Option<Photo>, AppError> {
        let key = storage_key(date, meal, Field::Photo);
        match self.store.get(&key).await? {
            Some(raw) if !raw.is_empty() => Photo::from_data_uri(&raw)
                .map(Some)
                .map_err(|reason| AppError::CorruptRecord { key, reason }),
            _ => Ok(None),
        }
    }

    /// Stores `photo`, replacing any previous one. The note is kept; what
    /// happens to an existing recognition is decided by the swap policy.
    pub async fn set_photo(
        &self,
        date: Date,
        meal: MealSlot,
        photo: &Photo,
    ) -> Result<(), AppError> {
        validate_photo(photo)?;

        let key = storage_key(date, meal, Field::Photo);
        let had_photo = self.has_meal(date, meal).await?;
        if let Err(e) = self.store.set(&key, &photo.to_data_uri()).await {
            warn!(error = %e, %key, size = photo.len(), "photo write rejected");
            return Err(e.into());
        }
        debug!(%key, size = photo.len(), "photo stored");

        if had_photo && self.swap_policy.clears_recognition() {
            self.store
                .remove(&storage_key(date, meal, Field::Recognition))
                .await?;
        }
        Ok(())
    }

    pub async fn get_note(&self, date: Date, meal: MealSlot) -> Result<Option<String>, AppError> {
        let note = self
            .store
            .get(&storage_key(date, meal, Field::Note))
            .await?;
        Ok(note.filter(|n| !n.is_empty()))
    }

    /// Trims `text`; an empty result removes the note.
    pub async fn set_note(&self, date: Date, meal: MealSlot, text: &str) -> Result<(), AppError> {
        let key = storage_key(date, meal, Field::Note);
        let note = text.trim();
        if note.is_empty() {
            self.store.remove(&key).await?;
            debug!(%key, "note cleared");
        } else {
            if let Err(e) = self.store.set(&key, note).await {
                warn!(error = %e, %key, "note write rejected");
                return Err(e.into());
            }
            debug!(%key, "note stored");
        }
        Ok(())
    }

    pub async fn get_recognition(
        &self,
        date: Date,
        meal: MealSlot,
    ) -> Result<Option<RecognitionRecord>, AppError> {
        let key = storage_key(date, meal, Field::Recognition);
        let Some(raw) = self.store.get(&key).await? else {
            return Ok(None);
        };
        let stored: StoredRecognition =
            serde_json::from_str(&raw).map_err(|e| AppError::CorruptRecord {
                key,
                reason: e.to_string(),
            })?;
        Ok(Some(stored.into()))
    }

    /// Overwrites the slot's recognition. The slot must hold a photo.
    pub async fn set_recognition(
        &self,
        date: Date,
        meal: MealSlot,
        record: &RecognitionRecord,
    ) -> Result<(), AppError> {
        if !self.has_meal(date, meal).await? {
            return Err(AppError::MissingPhoto { date, meal });
        }

        let key = storage_key(date, meal, Field::Recognition);
        let json = serde_json::to_string(&StoredRecognition::from(record))
            .map_err(|e| AppError::Storage(e.into()))?;
        if let Err(e) = self.store.set(&key, &json).await {
            warn!(error = %e, %key, "recognition write rejected");
            return Err(e.into());
        }
        debug!(%key, food = %record.food_label, "recognition stored");
        Ok(())
    }

    /// A meal counts as logged iff a (non-empty) photo is stored.
    pub async fn has_meal(&self, date: Date, meal: MealSlot) -> Result<bool, AppError> {
        let raw = self
            .store
            .get(&storage_key(date, meal, Field::Photo))
            .await?;
        Ok(matches!(raw, Some(v) if !v.is_empty()))
    }

    pub async fn load_meal(&self, date: Date, meal: MealSlot) -> Result<MealEntry, AppError> {
        Ok(MealEntry {
            photo: self.get_photo(date, meal).await?,
            note: self.get_note(date, meal).await?,
            recognition: self.get_recognition(date, meal).await?,
        })
    }

    pub async fn load_day(&self, date: Date) -> Result<DayView, AppError> {
        Ok(DayView {
            date,
            breakfast: self.load_meal(date, MealSlot::Breakfast).await?,
            lunch: self.load_meal(date, MealSlot::Lunch).await?,
            dinner: self.load_meal(date, MealSlot::Dinner).await?,
        })
    }
}
