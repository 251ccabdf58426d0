//! Engine configuration
//!
//! Settings come from defaults, an optional YAML/TOML file and `TABRS_*`
//! environment variables, in that order of precedence. A process-wide
//! configuration is seeded from the environment the first time it is read;
//! [`GroupBy::with_config`](crate::groupby::GroupBy::with_config) overrides
//! it for a single call.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

use crate::core::error::{Error, Result};

pub mod loader;

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Accelerated group-by settings
    pub accelerated: AcceleratedConfig,
}

/// Settings of the accelerated aggregation strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceleratedConfig {
    /// Use the accelerated strategy when it supports a call
    pub enabled: bool,
    /// Keep resolved kernels in the process-wide cache
    pub cache_kernels: bool,
    /// Minimum number of groups before reducing in parallel
    pub parallel_threshold: usize,
}

impl Default for AcceleratedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_kernels: true,
            parallel_threshold: 10_000,
        }
    }
}

impl AcceleratedConfig {
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_cache_kernels(mut self, cache_kernels: bool) -> Self {
        self.cache_kernels = cache_kernels;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accelerated(mut self, accelerated: AcceleratedConfig) -> Self {
        self.accelerated = accelerated;
        self
    }

    /// Shorthand for toggling the accelerated strategy
    pub fn with_accelerated_enabled(mut self, enabled: bool) -> Self {
        self.accelerated.enabled = enabled;
        self
    }

    /// Defaults overridden by the `TABRS_*` environment variables
    pub fn from_env() -> Result<Self> {
        loader::load_from_env()
    }

    /// Load a YAML or TOML file, chosen by extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        loader::load_from_file(path.as_ref())
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        loader::load_from_yaml(yaml)
    }

    pub fn from_toml(toml: &str) -> Result<Self> {
        loader::load_from_toml(toml)
    }

    /// Defaults, then the file if any, then the environment
    pub fn load_with_precedence<P: AsRef<Path>>(config_file: Option<P>) -> Result<Self> {
        loader::load_with_precedence(config_file)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}

static GLOBAL_CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// The process-wide configuration, seeded from the environment on first use
///
/// An invalid environment falls back to the defaults with a warning.
pub fn global_config() -> &'static EngineConfig {
    GLOBAL_CONFIG.get_or_init(|| {
        let config = EngineConfig::from_env().unwrap_or_else(|err| {
            warn!("ignoring invalid environment configuration: {}", err);
            EngineConfig::default()
        });
        info!(
            "engine configuration: accelerated={} cache_kernels={} parallel_threshold={}",
            config.accelerated.enabled,
            config.accelerated.cache_kernels,
            config.accelerated.parallel_threshold
        );
        config
    })
}

/// Install the process-wide configuration
///
/// Only possible before the first [`global_config`] call.
pub fn set_global_config(config: EngineConfig) -> Result<()> {
    GLOBAL_CONFIG.set(config).map_err(|_| {
        Error::InvalidOperation("the global configuration is already initialized".into())
    })
}
