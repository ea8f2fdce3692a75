//! # Engine Configuration
//!
//! All tunable settings in one serde-friendly struct. Every section falls back to its
//! defaults, so a configuration file only needs the values it changes:
//!
//! ```json
//! { "noise": { "seed": "hills", "height": 24 }, "chunk": { "cache_capacity": 256 } }
//! ```

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::engine_state::physics::PhysicsConfig;
use crate::engine_state::raycast::targeting::TargetingConfig;
use crate::engine_state::voxels::chunk_manager::ChunkSettings;
use crate::engine_state::voxels::noise_field::NoiseConfig;

/// Settings for every engine subsystem.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Terrain noise
    pub noise: NoiseConfig,
    /// Chunk size and cache capacity
    pub chunk: ChunkSettings,
    /// Player movement
    pub physics: PhysicsConfig,
    /// Block targeting and mining
    pub targeting: TargetingConfig,
}

impl EngineConfig {
    /// Reads a JSON configuration file.
    ///
    /// # Arguments
    /// * `path` - Location of the file
    ///
    /// # Returns
    /// The parsed configuration, or an error naming the file that could not be read or
    /// parsed.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Parses a JSON configuration.
    pub fn from_json_str(text: &str) -> anyhow::Result<Self> {
        let config: EngineConfig = serde_json::from_str(text).context("invalid engine configuration")?;
        if config.chunk.size < 2 {
            anyhow::bail!("chunk size must be at least 2, got {}", config.chunk.size);
        }
        Ok(config)
    }

    /// Reads `path` if given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<impl AsRef<Path>>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{ "noise": { "seed": "hills", "height": 24 }, "chunk": { "cache_capacity": 256 } }"#,
        )
        .expect("valid config");
        assert_eq!(config.noise.seed, "hills");
        assert_eq!(config.noise.height, 24.0);
        assert_eq!(config.noise.octaves, NoiseConfig::default().octaves);
        assert_eq!(config.chunk.cache_capacity, 256);
        assert_eq!(config.chunk.size, 64);
        assert_eq!(config.physics, PhysicsConfig::default());
    }

    #[test]
    fn empty_object_is_the_default_config() {
        assert_eq!(
            EngineConfig::from_json_str("{}").expect("valid config"),
            EngineConfig::default()
        );
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(EngineConfig::from_json_str("{ noise: ").is_err());
        assert!(EngineConfig::from_json_str(r#"{ "chunk": { "size": 1 } }"#).is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let error = EngineConfig::load("/nonexistent/terrain.json").expect_err("file is missing");
        assert!(format!("{:#}", error).contains("/nonexistent/terrain.json"));
    }

    #[test]
    fn config_round_trips_through_a_file() {
        let mut config = EngineConfig::default();
        config.targeting.mine_duration_ms = 250;
        let path = std::env::temp_dir().join("voxel-terrain-config-test.json");
        fs::write(&path, serde_json::to_string_pretty(&config).expect("serializable"))
            .expect("temp dir is writable");
        let loaded = EngineConfig::load(&path).expect("valid config");
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn no_path_means_defaults() {
        let config = EngineConfig::load_or_default(None::<&str>).expect("defaults");
        assert_eq!(config, EngineConfig::default());
    }
}
