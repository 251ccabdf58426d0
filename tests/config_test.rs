use std::env;
use std::fs;
use std::sync::Mutex;

use tabrs::config::loader::{ENV_ACCELERATED, ENV_KERNEL_CACHE, ENV_PARALLEL_THRESHOLD};
use tabrs::{agg, AcceleratedConfig, EngineConfig, Error, Result, Table, Vector};
use tempfile::tempdir;

// Serializes the tests that touch the process environment
static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
    let _lock = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let keys = [ENV_ACCELERATED, ENV_KERNEL_CACHE, ENV_PARALLEL_THRESHOLD];
    let saved: Vec<_> = keys.iter().map(|k| (*k, env::var(k).ok())).collect();
    for key in keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }
    let out = f();
    for (key, value) in saved {
        match value {
            Some(v) => env::set_var(key, v),
            None => env::remove_var(key),
        }
    }
    out
}

#[test]
fn test_from_env() -> Result<()> {
    let config = with_env(
        &[(ENV_ACCELERATED, "off"), (ENV_PARALLEL_THRESHOLD, "250")],
        EngineConfig::from_env,
    )?;
    assert!(!config.accelerated.enabled);
    assert!(config.accelerated.cache_kernels);
    assert_eq!(config.accelerated.parallel_threshold, 250);
    Ok(())
}

#[test]
fn test_invalid_env_value() {
    let result = with_env(&[(ENV_KERNEL_CACHE, "sometimes")], EngineConfig::from_env);
    assert!(matches!(result, Err(Error::ConfigurationError(_))));
}

#[test]
fn test_yaml_and_toml_files() -> Result<()> {
    let dir = tempdir()?;

    let yaml = dir.path().join("tabrs.yml");
    fs::write(&yaml, "accelerated:\n  enabled: false\n  parallel_threshold: 32\n")?;
    let config = EngineConfig::from_file(&yaml)?;
    assert!(!config.accelerated.enabled);
    assert_eq!(config.accelerated.parallel_threshold, 32);

    let toml = dir.path().join("tabrs.toml");
    fs::write(&toml, "[accelerated]\ncache_kernels = false\n")?;
    let config = EngineConfig::from_file(&toml)?;
    assert!(config.accelerated.enabled);
    assert!(!config.accelerated.cache_kernels);

    let ini = dir.path().join("tabrs.ini");
    fs::write(&ini, "enabled=1")?;
    assert!(matches!(
        EngineConfig::from_file(&ini),
        Err(Error::ConfigurationError(_))
    ));
    Ok(())
}

#[test]
fn test_environment_overrides_the_file() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("tabrs.yaml");
    fs::write(&path, "accelerated:\n  enabled: false\n  parallel_threshold: 32\n")?;

    let config = with_env(&[(ENV_ACCELERATED, "yes")], || {
        EngineConfig::load_with_precedence(Some(&path))
    })?;
    assert!(config.accelerated.enabled);
    assert_eq!(config.accelerated.parallel_threshold, 32);
    Ok(())
}

#[test]
fn test_toml_round_trip() -> Result<()> {
    let config = EngineConfig::default()
        .with_accelerated(AcceleratedConfig::default().with_parallel_threshold(5).with_enabled(false));
    assert_eq!(EngineConfig::from_toml(&config.to_toml()?)?, config);
    Ok(())
}

#[test]
fn test_per_call_config_does_not_change_results() -> Result<()> {
    let t = Table::from_columns([
        ("k", Vector::from(vec!["a", "b", "a"])),
        ("v", Vector::from(vec![1.5, 2.0, 2.5])),
    ])?;
    let run = |config: EngineConfig| -> Result<Table> {
        t.group_by(["k"])?
            .with_config(config)
            .aggregate([("s", agg::sum("v")), ("m", agg::max("v"))])
    };
    let on = run(EngineConfig::default())?;
    let off = run(EngineConfig::default().with_accelerated_enabled(false))?;
    let uncached = run(EngineConfig::default().with_accelerated(
        AcceleratedConfig::default().with_cache_kernels(false),
    ))?;
    assert!(on.equal(&off));
    assert!(on.equal(&uncached));
    assert_eq!(on.floats("s")?, &[4.0, 2.0]);
    Ok(())
}
