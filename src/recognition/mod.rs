//! Food recognition: pluggable classifier backends, silent fallback to the
//! local simulator, and confidence filtering.

pub mod backend;
pub mod dto;
pub mod remote;
pub mod services;
pub mod simulator;

pub use backend::{BackendError, RecognitionBackend};
pub use dto::{Candidate, RecognitionOutcome, ScoredLabel};
pub use services::{FallbackStrategy, FoodRecognitionService};
