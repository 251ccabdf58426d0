//! Configuration loading from the environment and from files

use std::env;
use std::fs;
use std::path::Path;

use super::EngineConfig;
use crate::core::error::{Error, Result};

pub const ENV_ACCELERATED: &str = "TABRS_ACCELERATED";
pub const ENV_KERNEL_CACHE: &str = "TABRS_KERNEL_CACHE";
pub const ENV_PARALLEL_THRESHOLD: &str = "TABRS_PARALLEL_THRESHOLD";

/// Defaults overridden by the process environment
pub fn load_from_env() -> Result<EngineConfig> {
    let mut config = EngineConfig::default();
    apply_env_overrides(&mut config, |key| env::var(key).ok())?;
    Ok(config)
}

/// Apply `TABRS_*` settings found through `lookup` on top of `config`
pub fn apply_env_overrides<F>(config: &mut EngineConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_ACCELERATED) {
        config.accelerated.enabled = parse_flag(ENV_ACCELERATED, &value)?;
    }
    if let Some(value) = lookup(ENV_KERNEL_CACHE) {
        config.accelerated.cache_kernels = parse_flag(ENV_KERNEL_CACHE, &value)?;
    }
    if let Some(value) = lookup(ENV_PARALLEL_THRESHOLD) {
        config.accelerated.parallel_threshold = value.trim().parse().map_err(|e| {
            Error::ConfigurationError(format!("Invalid {}: {}", ENV_PARALLEL_THRESHOLD, e))
        })?;
    }
    Ok(())
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(Error::ConfigurationError(format!(
            "Invalid {}: expected a boolean, found {:?}",
            key, other
        ))),
    }
}

/// Load configuration from a file (YAML or TOML based on extension)
pub fn load_from_file(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        return Err(Error::ConfigurationError(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path)?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => load_from_yaml(&contents),
        Some("toml") => load_from_toml(&contents),
        Some(ext) => Err(Error::ConfigurationError(format!(
            "Unsupported config file format: {}",
            ext
        ))),
        None => load_from_yaml(&contents).or_else(|_| load_from_toml(&contents)),
    }
}

pub fn load_from_yaml(yaml: &str) -> Result<EngineConfig> {
    Ok(serde_yaml::from_str(yaml)?)
}

pub fn load_from_toml(toml: &str) -> Result<EngineConfig> {
    Ok(toml::from_str(toml)?)
}

/// Load configuration with precedence: defaults -> file -> environment
pub fn load_with_precedence<P: AsRef<Path>>(config_file: Option<P>) -> Result<EngineConfig> {
    let mut config = match config_file {
        Some(path) => load_from_file(path.as_ref())?,
        None => EngineConfig::default(),
    };
    apply_env_overrides(&mut config, |key| env::var(key).ok())?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn flags_accept_common_spellings() -> Result<()> {
        for (text, expected) in [("on", true), ("YES", true), ("1", true), ("off", false), ("No", false)] {
            assert_eq!(parse_flag(ENV_ACCELERATED, text)?, expected);
        }
        assert!(parse_flag(ENV_ACCELERATED, "maybe").is_err());
        Ok(())
    }

    #[test]
    fn overrides_only_touch_present_keys() -> Result<()> {
        let env = vars(&[(ENV_KERNEL_CACHE, "off"), (ENV_PARALLEL_THRESHOLD, " 64 ")]);
        let mut config = EngineConfig::default();
        apply_env_overrides(&mut config, |k| env.get(k).cloned())?;
        assert!(config.accelerated.enabled);
        assert!(!config.accelerated.cache_kernels);
        assert_eq!(config.accelerated.parallel_threshold, 64);
        Ok(())
    }

    #[test]
    fn bad_threshold_is_a_configuration_error() {
        let env = vars(&[(ENV_PARALLEL_THRESHOLD, "many")]);
        let mut config = EngineConfig::default();
        let err = apply_env_overrides(&mut config, |k| env.get(k).cloned());
        assert!(matches!(err, Err(Error::ConfigurationError(_))));
    }

    #[test]
    fn missing_file() {
        let err = load_from_file(Path::new("/nonexistent/tabrs.yml"));
        assert!(matches!(err, Err(Error::ConfigurationError(_))));
    }
}
