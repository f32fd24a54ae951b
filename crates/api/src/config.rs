use std::path::PathBuf;

use skudesk_core::thumbnail::{ThumbnailSpec, DEFAULT_THUMB_QUALITY, DEFAULT_THUMB_WIDTH};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for running next to the data files in
/// the working directory.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Catalog JSON file.
    pub data_file: PathBuf,
    /// Directory for uploaded photos and thumbnails, served at `/uploads`.
    pub uploads_dir: PathBuf,
    /// Static client assets served as the fallback route.
    pub public_dir: PathBuf,
    /// Admin credential file, rewritten on every boot.
    pub credentials_file: PathBuf,
    pub admin_username: String,
    pub admin_password: String,
    /// PIN required to clear the catalog.
    pub clear_pin: String,
    pub thumbnail: ThumbnailSpec,
    /// Request body limit for uploads, in bytes.
    pub max_upload_bytes: usize,
    /// Base URL of the spreadsheet service used for sheet imports.
    pub sheets_base_url: String,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `DATA_FILE`            | `data.json`                |
    /// | `UPLOADS_DIR`          | `uploads`                  |
    /// | `PUBLIC_DIR`           | `public`                   |
    /// | `CREDENTIALS_FILE`     | `credentials.json`         |
    /// | `ADMIN_USERNAME`       | `admin`                    |
    /// | `ADMIN_PASSWORD`       | `admin`                    |
    /// | `CLEAR_PIN`            | `8892`                     |
    /// | `THUMB_WIDTH`          | `300`                      |
    /// | `THUMB_QUALITY`        | `80`                       |
    /// | `MAX_UPLOAD_MB`        | `50`                       |
    /// | `SHEETS_BASE_URL`      | `https://docs.google.com`  |
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let thumbnail = ThumbnailSpec {
            width: env_or("THUMB_WIDTH", &DEFAULT_THUMB_WIDTH.to_string())
                .parse()
                .expect("THUMB_WIDTH must be a valid u32"),
            quality: env_or("THUMB_QUALITY", &DEFAULT_THUMB_QUALITY.to_string())
                .parse()
                .expect("THUMB_QUALITY must be a number between 1 and 100"),
        };
        assert!(thumbnail.width > 0, "THUMB_WIDTH must be positive");

        let max_upload_mb: usize = env_or("MAX_UPLOAD_MB", "50")
            .parse()
            .expect("MAX_UPLOAD_MB must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            data_file: env_or("DATA_FILE", "data.json").into(),
            uploads_dir: env_or("UPLOADS_DIR", "uploads").into(),
            public_dir: env_or("PUBLIC_DIR", "public").into(),
            credentials_file: env_or("CREDENTIALS_FILE", "credentials.json").into(),
            admin_username: env_or("ADMIN_USERNAME", "admin"),
            admin_password: env_or("ADMIN_PASSWORD", "admin"),
            clear_pin: env_or("CLEAR_PIN", "8892"),
            thumbnail,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            sheets_base_url: env_or("SHEETS_BASE_URL", "https://docs.google.com"),
            jwt: JwtConfig::from_env(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
