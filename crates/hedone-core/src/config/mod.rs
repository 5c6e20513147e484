//! Engine configuration.
//!
//! Defaults reproduce the constants the analytics pipeline was calibrated
//! against; overriding them is supported for experimentation, but the
//! session-level and trait-level dominance thresholds serve different
//! consumers and must not be collapsed into one knob.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Tunable thresholds and analytics knobs.
///
/// Loaded from `config/default.toml`, an optional `config/{HEDONE_ENV}.toml`
/// overlay, and `HEDONE__`-prefixed environment variables; every field has
/// a default so an absent config file yields a working engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Intensity threshold for session-level dominant dimensions
    /// (post-hoc analysis).
    pub session_dominant_threshold: f32,
    /// Value threshold for profile-level trait dominance. Deliberately
    /// separate from the session-level threshold.
    pub trait_dominant_threshold: f32,
    /// Centroid magnitude below which a dimension counts as underexplored.
    pub underexplored_threshold: f32,
    /// Neighbors retrieved for the session-comparison finding.
    pub neighbor_k: usize,
    /// Cluster count requested by the weekly finding.
    pub weekly_cluster_k: usize,
    /// How many recent sessions the next-suggestion finding looks at.
    pub recent_window: usize,
    /// Assign/recompute iterations per clustering run.
    pub kmeans_iterations: usize,
    /// Seed for clustering centroid selection, giving scheduled analytics
    /// reproducible output across runs.
    pub cluster_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            session_dominant_threshold: 0.3,
            trait_dominant_threshold: 0.6,
            underexplored_threshold: 0.2,
            neighbor_k: 5,
            weekly_cluster_k: 4,
            recent_window: 10,
            kmeans_iterations: 10,
            cluster_seed: 7,
        }
    }
}

impl EngineConfig {
    /// Load configuration from files and environment.
    ///
    /// Sources, later overriding earlier:
    /// 1. `config/default.toml` (optional)
    /// 2. `config/{HEDONE_ENV}.toml` (optional)
    /// 3. environment variables with the `HEDONE` prefix (`__` separator)
    pub fn load() -> EngineResult<Self> {
        let env = std::env::var("HEDONE_ENV").unwrap_or_else(|_| "development".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(config::Environment::with_prefix("HEDONE").separator("__"));

        let loaded: EngineConfig = builder.build()?.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Load configuration from a single TOML file.
    pub fn from_file(path: &std::path::Path) -> EngineResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::Config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        let loaded: EngineConfig = toml::from_str(&content)
            .map_err(|e| EngineError::Config(format!("failed to parse config file: {e}")))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> EngineResult<()> {
        for (name, value) in [
            ("session_dominant_threshold", self.session_dominant_threshold),
            ("trait_dominant_threshold", self.trait_dominant_threshold),
            ("underexplored_threshold", self.underexplored_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) || value.is_nan() {
                return Err(EngineError::Config(format!(
                    "{name} must be within [0.0, 1.0], got {value}"
                )));
            }
        }

        for (name, value) in [
            ("neighbor_k", self.neighbor_k),
            ("weekly_cluster_k", self.weekly_cluster_k),
            ("recent_window", self.recent_window),
            ("kmeans_iterations", self.kmeans_iterations),
        ] {
            if value == 0 {
                return Err(EngineError::Config(format!(
                    "{name} must be greater than 0"
                )));
            }
        }

        Ok(())
    }
}
