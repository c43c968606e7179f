// src/config.rs

//! Configuration loading utilities.
//!
//! Convenience functions for loading the planner configuration and ground
//! seed files.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::{Config, GroundSeed};

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file cannot be read, but rejects values
/// that fail validation.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = Config::load_or_default(path);
    config
        .validate()
        .map_err(|e| AppError::config(format!("Invalid configuration in {path:?}: {e}")))?;
    Ok(config)
}

/// Load and validate a ground seed file.
pub fn load_ground_seed(path: &Path) -> Result<GroundSeed> {
    let seed = GroundSeed::load(path)
        .map_err(|e| AppError::config(format!("Failed to load ground seed from {path:?}: {e}")))?;
    seed.validate()
        .map_err(|e| AppError::config(format!("Invalid ground seed: {e}")))?;
    Ok(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ruleset;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config.generation.default_ruleset, Ruleset::Dsb3d);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[logging]\nlevel = \"loud\"\n").unwrap();

        assert!(matches!(load_config(&path), Err(AppError::Config(_))));
    }

    #[test]
    fn test_seed_without_lanes_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ground.toml");
        std::fs::write(&path, "name = \"Leer\"\n").unwrap();

        let err = load_ground_seed(&path).unwrap_err();
        assert!(err.to_string().contains("No lanes"));
    }
}
