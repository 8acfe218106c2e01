mod schema;
pub mod init;

pub use schema::{Config, RevenueConfig, ServerConfig, DEFAULT_BIND};

use anyhow::{Context, Result};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::attribution::lift::validate_model;
use crate::scoring::RangeOp;

/// Get the config directory path (~/.config/dealer-score/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("dealer-score"))
}

/// Get the default config file path (~/.config/dealer-score/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// With no explicit `path` the default location is tried, and a missing file
/// there means built-in defaults. An explicit path that does not exist is an
/// error.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            path
        }
        None => {
            let default_path = get_config_path()?;
            if !default_path.exists() {
                tracing::debug!(path = %default_path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            default_path
        }
    };

    read_config(&config_path)
}

fn read_config(path: &Path) -> Result<Config> {
    let config_content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", path.display()))?;

    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref engines) = config.engines {
        if engines.is_empty() {
            errors.push("engines: at least one engine is required".to_string());
        }
        for (engine, weight) in engines.iter() {
            if !weight.is_finite() || weight < 0.0 {
                errors.push(format!("engines.{}: must be non-negative, got {}", engine, weight));
            }
        }
        if !engines.is_empty() && engines.total() <= 0.0 {
            errors.push("engines: weights must not all be zero".to_string());
        }
    }

    if let Some(ref revenue) = config.revenue {
        if let Err(model_errors) = validate_model(&revenue.lift_model()) {
            errors.extend(model_errors.iter().map(|e| e.to_string()));
        }
        for (i, band) in revenue.percentile_bands.iter().enumerate() {
            if let Err(e) = RangeOp::parse(&band.range) {
                errors.push(format!(
                    "revenue.percentile_bands[{}].range: invalid '{}' - {}",
                    i, band.range, e
                ));
            }
            if band.percentile > 100 {
                errors.push(format!(
                    "revenue.percentile_bands[{}].percentile: must be at most 100",
                    i
                ));
            }
        }
    }

    if let Some(ref server) = config.server {
        if let Err(e) = server.bind.parse::<SocketAddr>() {
            errors.push(format!("server.bind: invalid address '{}' - {}", server.bind, e));
        }
        if let Err(e) = server.request_timeout() {
            errors.push(format!(
                "server.request_timeout: invalid duration '{}' - {}",
                server.request_timeout, e
            ));
        }
        if server.max_body_bytes == 0 {
            errors.push("server.max_body_bytes: must be greater than zero".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
