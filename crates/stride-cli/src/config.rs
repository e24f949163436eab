//! Animator config on disk – `~/.stride/config.toml` unless overridden.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use stride_types::AnimatorConfig;
use tracing::warn;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "STRIDE_CONFIG";

/// Pick the config file: an explicit `--config` path wins, then
/// `$STRIDE_CONFIG`, then `~/.stride/config.toml`.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    resolve_path(
        explicit,
        std::env::var(CONFIG_ENV).ok(),
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Pure form of [`config_path`] so the precedence can be tested without
/// touching the process environment.
pub(crate) fn resolve_path(explicit: Option<&Path>, from_env: Option<String>, home: &str) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match from_env {
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => config_path_for_home(home),
    }
}

pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".stride").join("config.toml")
}

/// Load a config file.  `Ok(None)` when it does not exist.
pub(crate) fn load_from(path: &Path) -> Result<Option<AnimatorConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    let cfg = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config at {}", path.display()))?;
    Ok(Some(cfg))
}

/// Load the config the CLI should run with: file (or defaults), then env
/// overrides, then validation.
pub fn load_effective(path: &Path) -> Result<AnimatorConfig> {
    let mut cfg = match load_from(path)? {
        Some(cfg) => cfg,
        None => {
            warn!(path = %path.display(), "no config file; using defaults");
            AnimatorConfig::default()
        }
    };
    apply_env_overrides(&mut cfg);
    cfg.validate()
        .with_context(|| format!("invalid config at {}", path.display()))?;
    Ok(cfg)
}

/// Apply `STRIDE_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `STRIDE_STEP_SIZE` | `step_size` |
/// | `STRIDE_STEP_INTERVAL` | `step_interval` |
/// | `STRIDE_DEBUG` | `debug` (`1`/`true`/`0`/`false`) |
///
/// Unparseable values are ignored with a warning.
pub fn apply_env_overrides(cfg: &mut AnimatorConfig) {
    if let Some(v) = env_parsed::<f32>("STRIDE_STEP_SIZE") {
        cfg.step_size = v;
    }
    if let Some(v) = env_parsed::<f32>("STRIDE_STEP_INTERVAL") {
        cfg.step_interval = v;
    }
    if let Ok(v) = std::env::var("STRIDE_DEBUG") {
        match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => cfg.debug = true,
            "0" | "false" | "no" | "off" => cfg.debug = false,
            other => warn!(var = "STRIDE_DEBUG", value = other, "ignoring unrecognised value"),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(var: &str) -> Option<T> {
    let raw = std::env::var(var).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(var, value = %raw, "ignoring unparseable value");
            None
        }
    }
}

/// Write `cfg` as pretty TOML, creating parent directories.
pub fn save_to(cfg: &AnimatorConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let raw = toml::to_string_pretty(cfg).context("failed to serialise config")?;
    fs::write(path, raw).with_context(|| format!("failed to write config at {}", path.display()))?;
    Ok(())
}
