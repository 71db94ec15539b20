use std::time::Duration;

use thiserror::Error;
use time::Date;

use crate::meals::dto::MealSlot;

/// Failure of a key-value store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage quota exceeded")]
    Exhausted,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.into())
    }
}

/// Errors surfaced by the meal log core.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid photo: {0}")]
    InvalidPhoto(String),

    #[error("photo is {size} bytes, limit is {max} bytes")]
    PhotoTooLarge { size: usize, max: usize },

    #[error("storage quota exceeded")]
    StorageExhausted,

    #[error("storage backend error: {0}")]
    Storage(#[source] anyhow::Error),

    #[error("stored value under {key} cannot be decoded: {reason}")]
    CorruptRecord { key: String, reason: String },

    #[error("recognition timed out after {0:?}")]
    RecognitionTimeout(Duration),

    #[error("recognition backend failed: {0}")]
    RecognitionBackendFailure(String),

    #[error("no candidate reached the confidence threshold")]
    LowConfidence,

    #[error("recognition already running for {meal} on {date}")]
    RecognitionInProgress { date: Date, meal: MealSlot },

    #[error("no photo stored for {meal} on {date}")]
    MissingPhoto { date: Date, meal: MealSlot },

    #[error("{requested} is after today ({today})")]
    FutureDateRejected { requested: Date, today: Date },

    #[error("feature disabled: {0}")]
    FeatureDisabled(&'static str),

    #[error("food name is empty")]
    EmptyFoodName,

    #[error("moving {delta_days} days leaves the supported date range")]
    DateOutOfRange { delta_days: i64 },
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Exhausted => AppError::StorageExhausted,
            StoreError::Backend(inner) => AppError::Storage(inner),
        }
    }
}

/// Short message shown to the user (zh-TW, the app's locale).
impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidPhoto(_) => "請選擇圖片檔案".to_string(),
            AppError::PhotoTooLarge { .. } => {
                "圖片檔案過大，請選擇小於 5MB 的圖片".to_string()
            }
            AppError::StorageExhausted => {
                "儲存空間已滿，請清除部分舊資料".to_string()
            }
            AppError::Storage(_) | AppError::CorruptRecord { .. } => {
                "讀取資料時發生錯誤，請稍後再試".to_string()
            }
            AppError::RecognitionTimeout(_) => "辨識逾時，請稍後再試".to_string(),
            AppError::RecognitionBackendFailure(_) => "辨識服務暫時無法使用".to_string(),
            AppError::LowConfidence => {
                "無法辨識食物，請重新拍攝或手動輸入".to_string()
            }
            AppError::RecognitionInProgress { .. } => "正在辨識中，請稍候".to_string(),
            AppError::MissingPhoto { .. } => "請先上傳照片".to_string(),
            AppError::FutureDateRejected { .. } => "無法查看未來的日期".to_string(),
            AppError::FeatureDisabled(_) => "此功能目前未開啟".to_string(),
            AppError::EmptyFoodName => "請輸入食物名稱".to_string(),
            AppError::DateOutOfRange { .. } => "日期超出範圍".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_app_errors() {
        assert!(matches!(
            AppError::from(StoreError::Exhausted),
            AppError::StorageExhausted
        ));
        let backend = StoreError::Backend(anyhow::anyhow!("disk gone"));
        match AppError::from(backend) {
            AppError::Storage(inner) => assert!(inner.to_string().contains("disk gone")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn user_messages_are_localized() {
        assert_eq!(
            AppError::InvalidPhoto("text/plain".into()).user_message(),
            "請選擇圖片檔案"
        );
        assert_eq!(
            AppError::StorageExhausted.user_message(),
            "儲存空間已滿，請清除部分舊資料"
        );
        let today = time::macros::date!(2024 - 05 - 01);
        let err = AppError::FutureDateRejected {
            requested: today.next_day().expect("valid date"),
            today,
        };
        assert_eq!(err.user_message(), "無法查看未來的日期");
    }
}
