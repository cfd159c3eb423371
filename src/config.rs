use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::CacheSettings;
use crate::error::LiftRsError;
use crate::logging::LogConfig;
use crate::plateau::PlateauConfig;
use crate::progression::OverloadConfig;
use crate::recovery::RecoveryConfig;
use crate::validation::MAX_WEEKLY_TARGET;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    #[serde(default)]
    pub metadata: ConfigMetadata,

    /// Logging output
    #[serde(default)]
    pub logging: LogConfig,

    /// Readiness scoring windows and defaults
    #[serde(default)]
    pub recovery: RecoveryConfig,

    /// Plateau detection windows and thresholds
    #[serde(default)]
    pub plateau: PlateauConfig,

    /// Next-set recommendation windows and defaults
    #[serde(default)]
    pub overload: OverloadConfig,

    /// Caller-side result cache
    #[serde(default)]
    pub cache: CacheSettings,
}

/// Configuration metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Default for ConfigMetadata {
    fn default() -> Self {
        let now = Utc::now();
        ConfigMetadata {
            version: "1.0".to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            metadata: ConfigMetadata::default(),
            logging: LogConfig::default(),
            recovery: RecoveryConfig::default(),
            plateau: PlateauConfig::default(),
            overload: OverloadConfig::default(),
            cache: CacheSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.validate()?;
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let toml_content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".liftrs")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    ///
    /// A missing file is normal; an unreadable or invalid one is logged.
    pub fn load_or_default() -> Self {
        let config_path = Self::default_config_path();
        if !config_path.exists() {
            return Self::default();
        }

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    path = %config_path.display(),
                    error = %e,
                    "Ignoring unusable config file, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Save configuration to default location
    pub fn save_default(&mut self) -> Result<PathBuf> {
        let config_path = Self::default_config_path();
        self.save_to_file(&config_path)?;
        Ok(config_path)
    }

    /// Reject settings no analyzer can work with
    pub fn validate(&self) -> crate::Result<()> {
        let invalid = |message: &str| -> crate::Result<()> {
            Err(LiftRsError::Configuration(message.to_string()))
        };

        if self.recovery.lookback_days == 0 {
            return invalid("recovery.lookback_days must be at least 1");
        }
        if self.recovery.default_weekly_target > MAX_WEEKLY_TARGET {
            return invalid("recovery.default_weekly_target must be at most 14");
        }
        if self.plateau.lookback_days == 0 {
            return invalid("plateau.lookback_days must be at least 1");
        }
        if self.plateau.min_weekly_buckets == 0 || self.plateau.min_data_points == 0 {
            return invalid("plateau minimums must be at least 1");
        }
        if self.overload.lookback_days == 0 {
            return invalid("overload.lookback_days must be at least 1");
        }
        if self.overload.max_sets < 2 {
            return invalid("overload.max_sets must be at least 2");
        }
        if self.overload.default_target_reps == 0 {
            return invalid("overload.default_target_reps must be at least 1");
        }

        Ok(())
    }
}
