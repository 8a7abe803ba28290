use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub default_page_size: u32,
    pub max_page_size: u32,
    /// Default size of the popular/recent blog lists
    pub featured_limit: u32,
    pub max_tags: usize,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

impl Environment {
    fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        }
    }
}

impl AppConfig {
    /// Defaults for `APP_ENV`, then per-setting environment overrides.
    pub fn from_env() -> Self {
        let environment = Environment::from_name(env::var("APP_ENV").ok().as_deref());
        Self::defaults(environment).with_env_overrides()
    }

    fn defaults(environment: Environment) -> Self {
        let mut config = Self::development();
        config.environment = environment;
        match environment {
            Environment::Development => {}
            Environment::Staging => {
                config.database.max_connections = 20;
                config.database.connection_timeout = 10;
                config.api.max_page_size = 50;
                config.api.request_timeout_secs = 15;
                config.security.jwt_secret.clear();
                config.security.jwt_expiry_hours = 24;
                config.security.cors_origins = vec!["https://staging.example.com".to_string()];
            }
            Environment::Production => {
                config.database.max_connections = 50;
                config.database.connection_timeout = 5;
                config.api.max_page_size = 50;
                config.api.request_timeout_secs = 10;
                config.security.jwt_secret.clear();
                config.security.jwt_expiry_hours = 4;
                config.security.cors_origins = vec!["https://app.example.com".to_string()];
            }
        }
        config
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                port: 5000,
                default_page_size: 10,
                max_page_size: 100,
                featured_limit: 5,
                max_tags: 10,
                request_timeout_secs: 30,
            },
            security: SecurityConfig {
                jwt_secret: "JWT_SECRET".to_string(),
                jwt_expiry_hours: 24 * 7,
                enable_cors: true,
                cors_origins: vec!["http://localhost:5173".to_string()],
            },
            storage: StorageConfig { backend: StorageBackend::Postgres },
        }
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = env::var("DATABASE_URL") {
            self.database.url = Some(url);
        }
        override_from_env("DATABASE_MAX_CONNECTIONS", &mut self.database.max_connections);
        override_from_env("DATABASE_CONNECTION_TIMEOUT", &mut self.database.connection_timeout);

        override_from_env("PORT", &mut self.api.port);
        override_from_env("API_PORT", &mut self.api.port);
        override_from_env("API_DEFAULT_PAGE_SIZE", &mut self.api.default_page_size);
        override_from_env("API_MAX_PAGE_SIZE", &mut self.api.max_page_size);
        override_from_env("API_FEATURED_LIMIT", &mut self.api.featured_limit);
        override_from_env("API_MAX_TAGS", &mut self.api.max_tags);
        override_from_env("API_REQUEST_TIMEOUT_SECS", &mut self.api.request_timeout_secs);

        if let Ok(secret) = env::var("JWT_SECRET") {
            self.security.jwt_secret = secret;
        }
        override_from_env("SECURITY_JWT_EXPIRY_HOURS", &mut self.security.jwt_expiry_hours);
        override_from_env("SECURITY_ENABLE_CORS", &mut self.security.enable_cors);
        if let Ok(origins) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }

        match env::var("STORAGE_BACKEND").as_deref() {
            Ok("memory") => self.storage.backend = StorageBackend::Memory,
            Ok("postgres") | Ok("postgresql") => self.storage.backend = StorageBackend::Postgres,
            Ok(other) => tracing::warn!("Ignoring unknown STORAGE_BACKEND={}", other),
            Err(_) => {}
        }

        self
    }
}

/// Replaces `target` when `name` is set and parses; unparsable values keep
/// the default.
fn override_from_env<T: FromStr>(name: &str, target: &mut T) {
    if let Ok(raw) = env::var(name) {
        match raw.trim().parse() {
            Ok(value) => *target = value,
            Err(_) => tracing::warn!("Ignoring invalid {}={}", name, raw),
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
