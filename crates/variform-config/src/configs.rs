use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// Logging settings: level plus optional rolling file sink.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DebugConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default)]
    pub rotation: Option<String>,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: None,
            rotation: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Fallback tuning knobs for [`crate::Config`] consumers that don't build a
/// `VariationConfig` explicitly for every call site.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EngineDefaults {
    #[validate(range(min = 1))]
    #[serde(default = "default_variations_per_field")]
    pub variations_per_field: usize,

    #[serde(default = "default_max_variations")]
    pub max_variations: usize,

    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for EngineDefaults {
    fn default() -> Self {
        Self {
            variations_per_field: default_variations_per_field(),
            max_variations: default_max_variations(),
            random_seed: None,
        }
    }
}

fn default_variations_per_field() -> usize {
    variform_constants::DEFAULT_VARIATIONS_PER_FIELD
}

fn default_max_variations() -> usize {
    variform_constants::DEFAULT_MAX_VARIATIONS
}

/// Top-level configuration, assembled from environment variables and an
/// optional TOML file by [`Config::new`].
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct Config {
    #[serde(default)]
    #[validate(nested)]
    pub debug: DebugConfig,

    #[serde(default)]
    #[validate(nested)]
    pub engine: EngineDefaults,
}
