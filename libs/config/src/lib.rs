//! # Rebound Configuration
//!
//! Layered configuration for the backrun hook and the logging bootstrap shared
//! by every binary and test harness in the workspace.
//!
//! ## Sources
//!
//! 1. Built-in defaults ([`HookConfig::default`])
//! 2. A TOML file
//! 3. `REBOUND_`-prefixed environment variables, `__` between nested keys
//!    (`REBOUND_SIZING__MIN_TICK_DELTA=25`)
//!
//! ## Usage
//!
//! ```rust
//! use rebound_config::HookConfig;
//!
//! let config = HookConfig::default();
//! config.validate().unwrap();
//! assert_eq!(config.sizing.min_tick_delta, 10);
//! assert_eq!(config.oracle.initial_cardinality_next, 1);
//! ```

pub mod hook_config;
pub mod logging;

pub use hook_config::{load_config, ConfigError, HookConfig, OracleSettings, SizingSettings};
pub use logging::{init_logging, LogFormat, LoggingConfig};
