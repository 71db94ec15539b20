use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PROXY_ENDPOINT: &str = "https://dailymeals-api.dailymeals-api.workers.dev";
pub const DEFAULT_MODEL: &str = "nateraw/food";
pub const DEFAULT_DIRECT_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/nateraw/food";

#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    /// SQLite file; `None` keeps everything in memory.
    pub db_path: Option<PathBuf>,
    /// Capacity in bytes of key + value; `None` is unlimited.
    pub quota_bytes: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct RecognitionConfig {
    pub enabled: bool,
    pub use_proxy: bool,
    pub proxy_endpoint: String,
    pub token: String,
    pub model: String,
    pub direct_endpoint: String,
    pub timeout: Duration,
    pub confidence_threshold: f64,
    pub simulator_min_delay: Duration,
    pub simulator_max_delay: Duration,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            use_proxy: true,
            proxy_endpoint: DEFAULT_PROXY_ENDPOINT.into(),
            token: String::new(),
            model: DEFAULT_MODEL.into(),
            direct_endpoint: DEFAULT_DIRECT_ENDPOINT.into(),
            timeout: Duration::from_millis(15_000),
            confidence_threshold: 0.3,
            simulator_min_delay: Duration::from_millis(1_500),
            simulator_max_delay: Duration::from_millis(2_500),
        }
    }
}

impl RecognitionConfig {
    /// Endpoint and bearer token of the remote classifier, if one is usable.
    pub fn remote_target(&self) -> Option<(String, Option<String>)> {
        if !self.enabled {
            return None;
        }
        if self.use_proxy {
            let endpoint = self.proxy_endpoint.trim();
            (!endpoint.is_empty()).then(|| (endpoint.to_string(), None))
        } else {
            let token = self.token.trim();
            let endpoint = self.direct_endpoint.trim();
            (!token.is_empty() && !endpoint.is_empty())
                .then(|| (endpoint.to_string(), Some(token.to_string())))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    pub ai_recognition: bool,
    pub nutrition_tracking: bool,
    pub manual_input: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            ai_recognition: true,
            nutrition_tracking: true,
            manual_input: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyGoals {
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
}

impl Default for DailyGoals {
    fn default() -> Self {
        Self {
            calories: 2000.0,
            carbs: 250.0,
            protein: 80.0,
            fat: 65.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub recognition: RecognitionConfig,
    pub features: FeatureFlags,
    pub goals: DailyGoals,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unparseable values fall back
    /// to the defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<f64>().ok());
        let millis = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(default)
        };
        let flag = |key: &str, default: bool| {
            lookup(key)
                .map(|v| {
                    matches!(
                        v.trim().to_ascii_lowercase().as_str(),
                        "1" | "true" | "yes" | "on"
                    )
                })
                .unwrap_or(default)
        };
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let defaults = RecognitionConfig::default();
        let confidence_threshold = parsed("HF_CONFIDENCE_THRESHOLD")
            .unwrap_or(defaults.confidence_threshold);
        if !(0.0..=1.0).contains(&confidence_threshold) {
            anyhow::bail!(
                "HF_CONFIDENCE_THRESHOLD must be within 0..=1, got {confidence_threshold}"
            );
        }

        let features = FeatureFlags {
            ai_recognition: flag("FEATURE_AI_RECOGNITION", true),
            nutrition_tracking: flag("FEATURE_NUTRITION_TRACKING", true),
            manual_input: flag("FEATURE_MANUAL_INPUT", true),
        };

        let recognition = RecognitionConfig {
            enabled: flag("HF_API_ENABLED", defaults.enabled),
            use_proxy: flag("HF_USE_PROXY", defaults.use_proxy),
            proxy_endpoint: text("HF_PROXY_ENDPOINT", &defaults.proxy_endpoint),
            token: text("HF_API_TOKEN", &defaults.token),
            model: text("HF_MODEL", &defaults.model),
            direct_endpoint: text("HF_DIRECT_ENDPOINT", &defaults.direct_endpoint),
            timeout: millis("HF_TIMEOUT_MS", defaults.timeout),
            confidence_threshold,
            simulator_min_delay: millis("SIMULATOR_DELAY_MIN_MS", defaults.simulator_min_delay),
            simulator_max_delay: millis("SIMULATOR_DELAY_MAX_MS", defaults.simulator_max_delay),
        };

        let storage = StorageConfig {
            db_path: lookup("DAILYMEALS_DB_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            quota_bytes: lookup("DAILYMEALS_STORAGE_QUOTA_BYTES")
                .and_then(|v| v.trim().parse::<usize>().ok()),
        };

        let base = DailyGoals::default();
        let goals = DailyGoals {
            calories: parsed("GOAL_CALORIES").unwrap_or(base.calories),
            carbs: parsed("GOAL_CARBS").unwrap_or(base.carbs),
            protein: parsed("GOAL_PROTEIN").unwrap_or(base.protein),
            fat: parsed("GOAL_FAT").unwrap_or(base.fat),
        };

        Ok(Self {
            storage,
            recognition,
            features,
            goals,
        })
    }
}
