pub mod app;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod images;
pub mod meals;
pub mod nutrition;
pub mod recognition;
pub mod state;
pub mod stats;
pub mod storage;

pub use app::DailyMeals;
pub use error::AppError;
pub use state::AppState;
