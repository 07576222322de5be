use crate::error::AppError;
use secrecy::Secret;
use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub lookup: LookupSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub mongodb: MongoSettings,
}

#[derive(Debug, Clone)]
pub struct MongoSettings {
    pub uri: String,
    pub database: String,
}

/// Connection settings for the external barcode lookup provider.
#[derive(Debug, Clone)]
pub struct LookupSettings {
    pub base_url: String,
    pub api_key: Secret<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo,
    Memory,
}

impl Settings {
    pub fn load() -> Result<Self, AppError> {
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(Settings {
            server: ServerSettings {
                host: get_env("HOST", Some("0.0.0.0"), is_prod)?,
                port: get_env("PORT", Some("8080"), is_prod)?
                    .parse()
                    .map_err(|e| {
                        AppError::ConfigError(anyhow::anyhow!("invalid PORT value: {}", e))
                    })?,
            },
            storage: StorageSettings {
                backend: get_env("STORAGE_BACKEND", Some("mongo"), is_prod)?
                    .parse()
                    .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
                mongodb: MongoSettings {
                    uri: get_env("MONGODB_URI", Some("mongodb://localhost:27017"), is_prod)?,
                    database: get_env("MONGODB_DATABASE", Some("inventory_db"), is_prod)?,
                },
            },
            lookup: LookupSettings {
                base_url: get_env(
                    "LOOKUP_BASE_URL",
                    Some("https://api.barcodelookup.com/v3"),
                    is_prod,
                )?,
                api_key: Secret::new(get_env("LOOKUP_API_KEY", Some(""), is_prod)?),
            },
        })
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongo" => Ok(StorageBackend::Mongo),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(format!("Invalid storage backend: {}", s)),
        }
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}
