/// Bot configuration
use crate::error::{BotError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub telegram: TelegramSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_extractor")]
    pub extractor: ExtractorSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelegramSettings {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractorSettings {
    #[serde(default = "default_ytdlp_path")]
    pub ytdlp_path: PathBuf,
}

impl BotConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        let mut settings = config::Config::builder();

        // Load from config file if it exists
        let config_path = PathBuf::from("config.toml");
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        }

        // Override with environment variables (prefixed with WATCHQ_)
        settings = settings.add_source(
            config::Environment::with_prefix("WATCHQ")
                .separator("_")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| BotError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| BotError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.telegram.token.is_empty() {
            return Err(BotError::Config(
                "Telegram token is required (set WATCHQ_TELEGRAM_TOKEN)".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/watchq.db".to_string()
}

fn default_extractor() -> ExtractorSettings {
    ExtractorSettings {
        ytdlp_path: default_ytdlp_path(),
    }
}

fn default_ytdlp_path() -> PathBuf {
    PathBuf::from("yt-dlp")
}
