pub mod dto;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use dto::{DayView, MealAnalysis, MealEntry, MealSlot, RecognitionRecord};
pub use repo::DayRecordRepository;
