use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

/// Returns true when `ENVIRONMENT=prod`, in which case every setting must be
/// supplied explicitly.
pub fn is_production() -> bool {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod"
}

/// Read `key` from the environment.
///
/// Outside production a missing key falls back to `default`; keys without a
/// default are always required.
pub fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

/// Like [`get_env`], but tries each key in order before giving up.
pub fn get_env_any(keys: &[&str], default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    if let Some(val) = keys.iter().find_map(|key| env::var(key).ok()) {
        return Ok(val);
    }
    let primary = keys.first().copied().unwrap_or_default();
    get_env(primary, default, is_prod)
}
