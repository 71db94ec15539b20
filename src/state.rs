use crate::clock::{Clock, FixedClock, SystemClock};
use crate::config::AppConfig;
use crate::db::SqliteStore;
use crate::meals::repo::DayRecordRepository;
use crate::nutrition::{NutritionService, ReferenceData};
use crate::recognition::simulator::LocalSimulator;
use crate::recognition::{FallbackStrategy, FoodRecognitionService};
use crate::storage::{KvStore, MemoryStore};
use std::sync::Arc;
use time::Date;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn KvStore>,
    pub reference: Arc<ReferenceData>,
    pub clock: Arc<dyn Clock>,
    pub recognizer: Arc<FoodRecognitionService>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = match &config.storage.db_path {
            Some(path) => {
                info!(path = %path.display(), "opening sqlite store");
                Arc::new(SqliteStore::open(path, config.storage.quota_bytes).await?)
                    as Arc<dyn KvStore>
            }
            None => {
                info!("no DAILYMEALS_DB_PATH set, keeping meals in memory");
                Arc::new(MemoryStore::with_quota(config.storage.quota_bytes)) as Arc<dyn KvStore>
            }
        };

        let mut recognizer = FoodRecognitionService::from_config(&config.recognition);
        if !config.features.ai_recognition {
            recognizer = recognizer.disabled();
        }

        Ok(Self::from_parts(
            config,
            store,
            Arc::new(ReferenceData::builtin()),
            Arc::new(SystemClock),
            Arc::new(recognizer),
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        store: Arc<dyn KvStore>,
        reference: Arc<ReferenceData>,
        clock: Arc<dyn Clock>,
        recognizer: Arc<FoodRecognitionService>,
    ) -> Self {
        Self {
            config,
            store,
            reference,
            clock,
            recognizer,
        }
    }

    /// In-memory state frozen on `today`, with an instant simulator as the
    /// only recognition backend.
    pub fn fake(today: Date) -> Self {
        let config = Arc::new(AppConfig::default());
        let recognizer = FoodRecognitionService::new(
            FallbackStrategy::new(None, Arc::new(LocalSimulator::instant())),
            config.recognition.confidence_threshold,
        );

        Self::from_parts(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(ReferenceData::builtin()),
            Arc::new(FixedClock::on(today)),
            Arc::new(recognizer),
        )
    }

    pub fn repo(&self) -> DayRecordRepository {
        DayRecordRepository::new(self.store.clone())
    }

    pub fn nutrition(&self) -> NutritionService {
        NutritionService::new(self.reference.clone())
    }
}
