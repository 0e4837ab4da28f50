//! Hook Configuration Module
//!
//! Loads [`HookConfig`] from a TOML file with environment variable overrides.

use crate::logging::LoggingConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use rebound_amm::{SizingConfig, SizingError, BPS_DENOMINATOR};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "REBOUND";

/// Invalid configuration values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid sizing settings: {0}")]
    Sizing(#[from] SizingError),

    #[error("initial cardinality target must be at least 1")]
    ZeroInitialCardinality,

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
}

/// Main hook configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HookConfig {
    pub sizing: SizingSettings,
    pub oracle: OracleSettings,
    pub logging: LoggingConfig,
}

/// Backrun tier boundaries
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SizingSettings {
    pub min_tick_delta: u32,
    pub limit_tick_delta: u32,
    pub tolerance_bps: u32,
}

impl Default for SizingSettings {
    fn default() -> Self {
        let defaults = SizingConfig::default();
        Self {
            min_tick_delta: defaults.min_tick_delta,
            limit_tick_delta: defaults.limit_tick_delta,
            tolerance_bps: defaults.tolerance_bps,
        }
    }
}

impl From<&SizingSettings> for SizingConfig {
    fn from(settings: &SizingSettings) -> Self {
        SizingConfig {
            min_tick_delta: settings.min_tick_delta,
            limit_tick_delta: settings.limit_tick_delta,
            tolerance_bps: settings.tolerance_bps,
        }
    }
}

/// Observation buffer settings applied to every new pool
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OracleSettings {
    /// Capacity target set right after a pool is initialized
    pub initial_cardinality_next: u16,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            initial_cardinality_next: 1,
        }
    }
}

impl HookConfig {
    /// Load configuration from `path` with `REBOUND_` environment overrides
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Same as [`HookConfig::load`], reading overrides from `env` instead of
    /// the process environment when given
    pub fn load_with_env(path: &Path, env: Option<HashMap<String, String>>) -> Result<Self> {
        info!("Loading hook config: {:?}", path);

        let config = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(true))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .context("Failed to build configuration")?;

        let hook_config: HookConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        hook_config
            .validate()
            .with_context(|| format!("Invalid configuration in {:?}", path))?;

        debug!(?hook_config, "hook config loaded");
        Ok(hook_config)
    }

    /// Parse configuration from a TOML string, without environment overrides
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let hook_config: HookConfig =
            toml::from_str(contents).context("Failed to parse TOML configuration")?;
        hook_config.validate()?;
        Ok(hook_config)
    }

    /// Render as TOML, e.g. to seed a config file with the defaults
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sizing_config().validate()?;
        if self.oracle.initial_cardinality_next == 0 {
            return Err(ConfigError::ZeroInitialCardinality);
        }
        self.logging.validate()?;
        Ok(())
    }

    pub fn sizing_config(&self) -> SizingConfig {
        SizingConfig::from(&self.sizing)
    }
}

impl From<&HookConfig> for SizingConfig {
    fn from(config: &HookConfig) -> Self {
        config.sizing_config()
    }
}

/// Convenience function to load configuration and report the effective tiers
pub fn load_config(path: &Path) -> Result<HookConfig> {
    let config = HookConfig::load(path)?;
    info!(
        min_tick_delta = config.sizing.min_tick_delta,
        limit_tick_delta = config.sizing.limit_tick_delta,
        "backrun tolerance {}/{}",
        config.sizing.tolerance_bps,
        BPS_DENOMINATOR
    );
    Ok(config)
}
