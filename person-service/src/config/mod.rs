use serde::Deserialize;
use service_core::config::{self as core_config, get_env, get_env_any, is_production};
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct PersonConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub mongodb: MongoConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Path prefix shared by every person route, e.g. `/api`.
    pub base_path: String,
}

impl PersonConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;
        let is_prod = is_production();

        Ok(PersonConfig {
            common: common_config,
            service_name: "person-service".to_string(),
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|e| !e.is_empty()),
            mongodb: MongoConfig {
                uri: get_env_any(&["MONGODB_URI", "MONGO_URI"], None, is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("person_db"), is_prod)?,
            },
            http: HttpConfig {
                base_path: normalize_base_path(&get_env("API_BASE_PATH", Some("/api"), is_prod)?),
            },
        })
    }
}

impl HttpConfig {
    /// Full path of the person collection, e.g. `/api/persons`.
    pub fn persons_path(&self) -> String {
        format!("{}/persons", self.base_path)
    }
}

/// Leading slash, no trailing slash; the root becomes the empty string.
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_path_is_normalized() {
        assert_eq!(normalize_base_path("/api"), "/api");
        assert_eq!(normalize_base_path("api/"), "/api");
        assert_eq!(normalize_base_path("/api/v1/"), "/api/v1");
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path(""), "");
    }

    #[test]
    fn persons_path_joins_base_path() {
        let http = HttpConfig {
            base_path: "/api".to_string(),
        };
        assert_eq!(http.persons_path(), "/api/persons");

        let root = HttpConfig {
            base_path: String::new(),
        };
        assert_eq!(root.persons_path(), "/persons");
    }
}
