//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ledgers: LedgerConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// AI provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AiConfig {
    /// Base URL of the model-serving API; model ids are appended per call
    #[serde(default = "default_ai_base_url")]
    pub base_url: String,
    /// Bearer token, if the provider requires one
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_moderation_model")]
    pub moderation_model: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

fn default_ai_base_url() -> String {
    "http://localhost:9000/ai/run".to_string()
}

fn default_image_model() -> String {
    "@cf/lykon/dreamshaper-8-lcm".to_string()
}

fn default_moderation_model() -> String {
    "@cf/meta/llama-2-7b-chat-fp16".to_string()
}

fn default_text_model() -> String {
    "@cf/meta/llama-2-7b-chat-fp16".to_string()
}

fn default_timeout() -> u64 {
    60000
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: default_ai_base_url(),
            api_key: None,
            image_model: default_image_model(),
            moderation_model: default_moderation_model(),
            text_model: default_text_model(),
            timeout_ms: default_timeout(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_images_path")]
    pub images_path: String,
    #[serde(default = "default_ledgers_path")]
    pub ledgers_path: String,
}

fn default_images_path() -> String {
    "./data/images".to_string()
}

fn default_ledgers_path() -> String {
    "./data/ledgers".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            images_path: default_images_path(),
            ledgers_path: default_ledgers_path(),
        }
    }
}

/// Ledger identities. One shared gallery and report ledger per deployment;
/// a multi-tenant deployment would derive these ids from authentication.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedgerConfig {
    #[serde(default = "default_gallery_id")]
    pub gallery_id: String,
    #[serde(default = "default_reports_id")]
    pub reports_id: String,
}

fn default_gallery_id() -> String {
    "shared-gallery".to_string()
}

fn default_reports_id() -> String {
    "shared-reports".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            gallery_id: default_gallery_id(),
            reports_id: default_reports_id(),
        }
    }
}

/// Rate limiting configuration. Disabled by default: provider calls are
/// bounded only by the provider's own throttling.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_rps")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst_size: u32,
}

fn default_rps() -> u32 {
    100
}

fn default_burst() -> u32 {
    200
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            requests_per_second: default_rps(),
            burst_size: default_burst(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/default.toml")
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            // Load from configuration file
            .add_source(
                File::with_name(path.as_ref().to_str().unwrap_or("config/default"))
                    .required(false),
            )
            // Override with environment variables (prefixed with CANVASSPARK_)
            .add_source(
                Environment::with_prefix("CANVASSPARK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Server port cannot be 0".to_string(),
            )));
        }

        if self.ai.base_url.is_empty() {
            return Err(AppError::Config(config::ConfigError::Message(
                "ai.base_url cannot be empty".to_string(),
            )));
        }

        if self.ledgers.gallery_id.is_empty() || self.ledgers.reports_id.is_empty() {
            return Err(AppError::Config(config::ConfigError::Message(
                "Ledger ids cannot be empty".to_string(),
            )));
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            ai: AiConfig::default(),
            storage: StorageConfig::default(),
            ledgers: LedgerConfig::default(),
            rate_limit: RateLimitConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
