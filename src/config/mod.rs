//! Configuration module

mod settings;

pub use settings::{
    AiConfig, LedgerConfig, LoggingConfig, RateLimitConfig, ServerConfig, Settings, StorageConfig,
};
