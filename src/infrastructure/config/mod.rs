//! Configuration management

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use crate::application::errors::ConfigError;

/// Console runs keep their own state under the data dir
pub const CONSOLE_DATA_DIR: &str = "console";

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub discord: DiscordConfig,
    pub access: AccessConfig,
    pub storage: StorageConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    /// Prefix for typed commands in console mode, besides `/`
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DiscordConfig {
    pub token: Option<String>,
    pub application_id: Option<String>,
    /// Hex-encoded Ed25519 key used to verify interaction requests
    pub public_key: Option<String>,
    /// Channel that holds the board message
    pub channel_id: u64,
}

/// Single-principal access control
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AccessConfig {
    pub allowed_user_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServerConfig {
    pub listen_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "status-board-bot".to_string(),
                prefix: "?".to_string(),
            },
            discord: DiscordConfig {
                token: None,
                application_id: None,
                public_key: None,
                channel_id: 1427685251135569950,
            },
            access: AccessConfig {
                allowed_user_id: "1372549650225168436".to_string(),
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("."),
            },
            server: ServerConfig {
                listen_addr: "0.0.0.0:8080".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    pub fn load_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay values from an environment-like lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("DISCORD_TOKEN") {
            self.discord.token = Some(token);
        }
        if let Some(app_id) = lookup("DISCORD_APPLICATION_ID") {
            self.discord.application_id = Some(app_id);
        }
        if let Some(key) = lookup("DISCORD_PUBLIC_KEY") {
            self.discord.public_key = Some(key);
        }
        if let Some(channel) = lookup("STATUS_CHANNEL_ID") {
            self.discord.channel_id = channel
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("STATUS_CHANNEL_ID={}", channel)))?;
        }
        if let Some(user) = lookup("ALLOWED_USER_ID") {
            self.access.allowed_user_id = user.trim().to_string();
        }
        if let Some(dir) = lookup("DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(addr) = lookup("LISTEN_ADDR") {
            self.server.listen_addr = addr;
        }
        Ok(())
    }

    /// Checks shared by every mode
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.discord.channel_id == 0 {
            return Err(ConfigError::MissingField("discord.channel-id".to_string()));
        }
        if self.access.allowed_user_id.trim().is_empty() {
            return Err(ConfigError::MissingField("access.allowed-user-id".to_string()));
        }
        Ok(())
    }

    /// Checks for running against Discord
    pub fn validate_discord(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.discord.token.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingField("discord.token".to_string()));
        }
        if self.discord.application_id.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingField("discord.application-id".to_string()));
        }
        match self.discord.public_key.as_deref() {
            None | Some("") => return Err(ConfigError::MissingField("discord.public-key".to_string())),
            Some(key) if !matches!(hex::decode(key), Ok(bytes) if bytes.len() == 32) => {
                return Err(ConfigError::InvalidValue(
                    "discord.public-key must be 64 hex characters".to_string(),
                ));
            }
            Some(_) => {}
        }
        self.listen_addr()?;
        Ok(())
    }

    /// Where list files and the board message id live for a given mode
    pub fn store_dir(&self, console: bool) -> PathBuf {
        if console {
            self.storage.data_dir.join(CONSOLE_DATA_DIR)
        } else {
            self.storage.data_dir.clone()
        }
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .listen_addr
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("server.listen-addr={}", self.server.listen_addr)))
    }
}
