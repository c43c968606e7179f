//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{GenerationOptions, Ruleset};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Tournament generation defaults
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if !matches!(
            self.logging.level.to_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error" | "off"
        ) {
            return Err(AppError::validation(format!(
                "logging.level '{}' is not a log level",
                self.logging.level
            )));
        }
        if self.generation.default_target_count == 0 {
            return Err(AppError::validation(
                "generation.default_target_count must be > 0",
            ));
        }
        Ok(())
    }
}

/// Defaults applied when a generation request leaves them open.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Ruleset used when none is given
    #[serde(default = "defaults::ruleset")]
    pub default_ruleset: Ruleset,

    /// Target count used when none is given
    #[serde(default = "defaults::target_count")]
    pub default_target_count: u32,

    /// Draw new stake distances every round
    #[serde(default)]
    pub randomize_stakes_between_rounds: bool,

    /// Include training-only lanes and targets
    #[serde(default)]
    pub include_training_only: bool,

    /// Run the validation rules over freshly generated assignments
    #[serde(default = "defaults::verify_output")]
    pub verify_output: bool,

    /// Fixed seed for reproducible runs; random when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl GenerationConfig {
    pub fn options(&self) -> GenerationOptions {
        GenerationOptions {
            randomize_stakes_between_rounds: self.randomize_stakes_between_rounds,
            include_training_only: self.include_training_only,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_ruleset: defaults::ruleset(),
            default_target_count: defaults::target_count(),
            randomize_stakes_between_rounds: false,
            include_training_only: false,
            verify_output: defaults::verify_output(),
            seed: None,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level ("debug", "info", ...)
    #[serde(default = "defaults::log_level")]
    pub level: String,

    /// Print per-step progress lines and the closing summary of generation runs
    #[serde(default = "defaults::show_progress")]
    pub show_progress: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
            show_progress: defaults::show_progress(),
        }
    }
}

mod defaults {
    use crate::models::Ruleset;

    pub fn ruleset() -> Ruleset {
        Ruleset::Dsb3d
    }
    pub fn target_count() -> u32 {
        28
    }
    pub fn verify_output() -> bool {
        true
    }
    pub fn log_level() -> String {
        "info".into()
    }
    pub fn show_progress() -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_unknown_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_target_count() {
        let mut config = Config::default();
        config.generation.default_target_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [generation]
            default_ruleset = "WA_3D"
            seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.generation.default_ruleset, Ruleset::Wa3d);
        assert_eq!(config.generation.seed, Some(7));
        assert!(config.generation.verify_output);
        assert_eq!(config.logging.level, "info");
    }
}
