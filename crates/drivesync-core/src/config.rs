//! Configuration module
//!
//! Settings for the intake service are read once from the environment (with `.env`
//! support) and exposed through getters on the cloneable [`Config`].

use std::env;
use std::path::PathBuf;

const SERVER_PORT: u16 = 4000;
const MAX_UPLOAD_SIZE_MB: usize = 64;
const REQUEST_TIMEOUT_SECS: u64 = 60;
const SYNC_TOKEN_FILE: &str = "./data/sync_token";
const ASSET_STORAGE_PATH: &str = "./data/media";
const ASSET_BASE_URL: &str = "http://localhost:4000/media";
const ALLOWED_MIME_TYPES: &str = "image/*,video/*,audio/*,application/pdf,text/plain,text/csv,\
application/msword,application/vnd.openxmlformats-officedocument.wordprocessingml.document,\
application/vnd.ms-excel,application/vnd.openxmlformats-officedocument.spreadsheetml.sheet,\
application/vnd.ms-powerpoint,application/vnd.openxmlformats-officedocument.presentationml.presentation,\
application/zip";

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

/// Raw settings behind [`Config`].
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub server_port: u16,
    pub environment: String,
    pub sync_token_file: PathBuf,
    pub upload_temp_dir: PathBuf,
    pub asset_storage_path: PathBuf,
    pub asset_base_url: String,
    pub max_upload_size_bytes: usize,
    pub allowed_mime_types: Vec<String>,
    pub serve_media: bool,
    pub request_timeout_secs: u64,
    pub log_format: LogFormat,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    fn inner(&self) -> &ServiceConfig {
        &self.0
    }

    pub fn new(config: ServiceConfig) -> Self {
        Config(Box::new(config))
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.inner().server_port
    }

    pub fn environment(&self) -> &str {
        &self.inner().environment
    }

    pub fn sync_token_file(&self) -> &PathBuf {
        &self.inner().sync_token_file
    }

    pub fn upload_temp_dir(&self) -> &PathBuf {
        &self.inner().upload_temp_dir
    }

    pub fn asset_storage_path(&self) -> &PathBuf {
        &self.inner().asset_storage_path
    }

    pub fn asset_base_url(&self) -> &str {
        &self.inner().asset_base_url
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.inner().max_upload_size_bytes
    }

    /// Largest request body accepted: base64 expands 3 bytes into 4, plus room for the
    /// JSON envelope and the other fields.
    pub fn max_request_body_bytes(&self) -> usize {
        self.max_upload_size_bytes()
            .saturating_mul(4)
            .div_ceil(3)
            .saturating_add(64 * 1024)
    }

    pub fn allowed_mime_types(&self) -> &[String] {
        &self.inner().allowed_mime_types
    }

    pub fn serve_media(&self) -> bool {
        self.inner().serve_media
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.inner().request_timeout_secs
    }

    pub fn log_format(&self) -> LogFormat {
        self.inner().log_format
    }
}

fn env_list(name: &str, default: &str) -> Vec<String> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|s| s.to_lowercase().parse().ok())
        .unwrap_or(default)
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let log_format = match env::var("LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        };

        let config = ServiceConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            sync_token_file: env::var("SYNC_TOKEN_FILE")
                .unwrap_or_else(|_| SYNC_TOKEN_FILE.to_string())
                .into(),
            upload_temp_dir: env::var("UPLOAD_TEMP_DIR")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            asset_storage_path: env::var("ASSET_STORAGE_PATH")
                .unwrap_or_else(|_| ASSET_STORAGE_PATH.to_string())
                .into(),
            asset_base_url: env::var("ASSET_BASE_URL")
                .unwrap_or_else(|_| ASSET_BASE_URL.to_string()),
            max_upload_size_bytes: max_upload_size_mb.saturating_mul(1024 * 1024),
            allowed_mime_types: env_list("ALLOWED_MIME_TYPES", ALLOWED_MIME_TYPES),
            serve_media: env_bool("SERVE_MEDIA", true),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| REQUEST_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(REQUEST_TIMEOUT_SECS),
            log_format,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB cannot be 0"));
        }

        if self.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("REQUEST_TIMEOUT_SECS cannot be 0"));
        }

        if !self.asset_base_url.starts_with("http://") && !self.asset_base_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "ASSET_BASE_URL must be an http(s) URL, got '{}'",
                self.asset_base_url
            ));
        }

        if self.allowed_mime_types.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_MIME_TYPES cannot be empty"));
        }

        Ok(())
    }
}
