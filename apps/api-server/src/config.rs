//! Application configuration loaded from environment variables.

use std::env;

use quill_infra::database::DatabaseConfig;

/// Media storage configuration.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub bucket: String,
    pub public_base_url: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub media: Option<MediaConfig>,
    /// Base URL the shared default images are served from.
    pub cloud_url: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        });

        let cloud_url =
            env::var("CLOUD_URL").unwrap_or_else(|_| "https://cdn.example.com".to_string());

        let media = env::var("S3_BUCKET").ok().map(|bucket| MediaConfig {
            bucket,
            public_base_url: env::var("MEDIA_BASE_URL").unwrap_or_else(|_| cloud_url.clone()),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database,
            media,
            cloud_url,
        }
    }
}
