//! Configuration module
//!
//! This module provides the configuration structures for the API: server
//! settings, storage backend selection and upload behavior. Everything is read
//! from the environment (a `.env` file is loaded first when present).

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{DEFAULT_SHUTDOWN_GRACE_PERIOD, DEFAULT_SIGNED_URL_TTL};
use crate::storage_types::StorageBackend;

// Common constants
const DEFAULT_PORT: u16 = 8080;
/// No request deadline unless configured; uploads may stream for as long as they need.
const REQUEST_TIMEOUT_SECS: u64 = 0;

/// How failures are mapped onto HTTP status codes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorStatusMode {
    /// Every failure is answered with 500 (what existing clients expect).
    #[default]
    Flat,
    /// Client-input failures get 4xx, storage failures 502.
    Typed,
}

impl FromStr for ErrorStatusMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flat" => Ok(ErrorStatusMode::Flat),
            "typed" => Ok(ErrorStatusMode::Typed),
            _ => Err(anyhow::anyhow!("Invalid error status mode: {}", s)),
        }
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

/// Server-level configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub log_format: LogFormat,
    /// Per-request deadline. `None` disables the timeout layer.
    pub request_timeout: Option<Duration>,
    pub shutdown_grace_period: Duration,
}

/// Storage and upload configuration
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub base: BaseConfig,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub public_base_url: String,
    pub url_signing_secret: Option<String>,
    // Upload behavior
    /// `None` means no ceiling.
    pub max_upload_size_bytes: Option<u64>,
    pub upload_forwarding_enabled: bool,
    pub signed_url_ttl: Duration,
    pub error_status_mode: ErrorStatusMode,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    fn as_service(&self) -> &ServiceConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.as_service().base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = ServiceConfig::from_vars(|key| env::var(key).ok())?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_service().validate()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.as_service().base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.as_service().base.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_service().base.cors_origins
    }

    pub fn log_format(&self) -> LogFormat {
        self.as_service().base.log_format
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.as_service().base.request_timeout
    }

    pub fn shutdown_grace_period(&self) -> Duration {
        self.as_service().base.shutdown_grace_period
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_service().storage_backend
    }

    pub fn bucket(&self) -> Option<&str> {
        self.as_service().bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.as_service().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_service().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.as_service().aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_service().local_storage_path.as_deref()
    }

    pub fn public_base_url(&self) -> &str {
        &self.as_service().public_base_url
    }

    pub fn url_signing_secret(&self) -> Option<&str> {
        self.as_service().url_signing_secret.as_deref()
    }

    pub fn max_upload_size_bytes(&self) -> Option<u64> {
        self.as_service().max_upload_size_bytes
    }

    pub fn upload_forwarding_enabled(&self) -> bool {
        self.as_service().upload_forwarding_enabled
    }

    pub fn signed_url_ttl(&self) -> Duration {
        self.as_service().signed_url_ttl
    }

    pub fn error_status_mode(&self) -> ErrorStatusMode {
        self.as_service().error_status_mode
    }
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    value
        .map(|v| v.trim().to_lowercase())
        .and_then(|v| match v.as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

impl ServiceConfig {
    /// Build the configuration from a variable lookup (the process environment
    /// in production, a map in tests).
    pub fn from_vars<F>(var: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = match var("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => DEFAULT_PORT,
        };

        let log_format = match var("LOG_FORMAT") {
            Some(format) => format.parse()?,
            None => LogFormat::default(),
        };

        let request_timeout_secs = var("REQUEST_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(REQUEST_TIMEOUT_SECS);

        let shutdown_grace_period = var("SHUTDOWN_GRACE_PERIOD_MS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SHUTDOWN_GRACE_PERIOD);

        let base = BaseConfig {
            server_port,
            environment,
            cors_origins,
            log_format,
            request_timeout: (request_timeout_secs > 0)
                .then(|| Duration::from_secs(request_timeout_secs)),
            shutdown_grace_period,
        };

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(backend) => backend.parse()?,
            None => StorageBackend::Gcs,
        };

        // 0 and unset both mean "no ceiling".
        let max_upload_size_bytes = match var("MAX_UPLOAD_SIZE_BYTES") {
            Some(value) => {
                let bytes = value.trim().parse::<u64>().map_err(|_| {
                    anyhow::anyhow!("MAX_UPLOAD_SIZE_BYTES must be a non-negative integer")
                })?;
                (bytes > 0).then_some(bytes)
            }
            None => None,
        };

        let signed_url_ttl = match var("SIGNED_URL_TTL_SECS") {
            Some(value) => Duration::from_secs(value.trim().parse::<u64>().map_err(|_| {
                anyhow::anyhow!("SIGNED_URL_TTL_SECS must be a number of seconds")
            })?),
            None => DEFAULT_SIGNED_URL_TTL,
        };

        let error_status_mode = match var("ERROR_STATUS_MODE") {
            Some(mode) => mode.parse()?,
            None => ErrorStatusMode::default(),
        };

        let public_base_url = var("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{}", server_port))
            .trim_end_matches('/')
            .to_string();

        Ok(ServiceConfig {
            base,
            storage_backend,
            bucket: var("STORAGE_BUCKET").filter(|s| !s.trim().is_empty()),
            s3_region: var("S3_REGION"),
            s3_endpoint: var("S3_ENDPOINT"),
            aws_region: var("AWS_REGION"),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            public_base_url,
            url_signing_secret: var("URL_SIGNING_SECRET").filter(|s| !s.is_empty()),
            max_upload_size_bytes,
            upload_forwarding_enabled: parse_bool(var("UPLOAD_FORWARDING_ENABLED"), true),
            signed_url_ttl,
            error_status_mode,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let is_production = {
            let env = self.base.environment.to_lowercase();
            env == "production" || env == "prod"
        };

        if is_production && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.signed_url_ttl.is_zero() {
            return Err(anyhow::anyhow!("SIGNED_URL_TTL_SECS cannot be 0"));
        }

        match self.storage_backend {
            StorageBackend::Gcs | StorageBackend::S3 => {
                if self.bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "STORAGE_BUCKET must be set when using the {} storage backend",
                        self.storage_backend
                    ));
                }
                if self.storage_backend == StorageBackend::S3
                    && self.s3_region.is_none()
                    && self.aws_region.is_none()
                {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using the s3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using the local storage backend"
                    ));
                }
            }
            StorageBackend::Memory => {}
        }

        if self.storage_backend.signs_locally()
            && is_production
            && self.url_signing_secret.is_none()
        {
            return Err(anyhow::anyhow!(
                "URL_SIGNING_SECRET must be set in production for the {} storage backend",
                self.storage_backend
            ));
        }

        Ok(())
    }
}
