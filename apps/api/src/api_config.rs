use std::env;

use sentra_application::OwnershipConfig;
use sentra_core::AppError;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub ownership: OwnershipConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let defaults = OwnershipConfig::default();
        let ownership = OwnershipConfig {
            temporary_grant_ttl_seconds: seconds_env(
                "TEMPORARY_GRANT_TTL_SECONDS",
                defaults.temporary_grant_ttl_seconds,
            )?,
            ownership_cache_ttl_seconds: seconds_env(
                "OWNERSHIP_CACHE_TTL_SECONDS",
                defaults.ownership_cache_ttl_seconds,
            )?,
        };

        Ok(Self {
            migrate_only,
            database_url,
            api_host,
            api_port,
            ownership,
        })
    }
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} must be set")))
}

fn seconds_env(name: &str, default: u32) -> Result<u32, AppError> {
    match env::var(name) {
        Ok(value) => value
            .parse::<u32>()
            .map_err(|_| AppError::Validation(format!("{name} must be a number of seconds"))),
        Err(_) => Ok(default),
    }
}
