//! Discord adapter

pub mod interactions;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{BoardTarget, ChannelId, CommandRegistry, DisplayPayload, MessageId};
use crate::domain::traits::{BoardChannel, BotInfo};
use crate::application::errors::{BotError, SyncError};

pub use interactions::{InteractionServer, InteractionVerifier};

/// Discord REST API base URL
const API_BASE: &str = "https://discord.com/api/v10";

/// Application command type for chat input (slash) commands
const CHAT_INPUT: u8 = 1;
/// Application command option type for strings
const STRING_OPTION: u8 = 3;

/// Global slash command definition as Discord expects it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplicationCommand {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ApplicationCommandOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplicationCommandOption {
    #[serde(rename = "type")]
    pub kind: u8,
    pub name: String,
    pub description: String,
    pub required: bool,
}

#[derive(Serialize)]
struct MessageBody<'a> {
    embeds: [&'a DisplayPayload; 1],
}

#[derive(Deserialize)]
struct CreatedMessage {
    id: String,
}

/// Discord bot adapter over the REST API
pub struct DiscordAdapter {
    token: String,
    application_id: String,
    client: Client,
    info: BotInfo,
    api_base: String,
}

impl DiscordAdapter {
    pub fn new(token: impl Into<String>, application_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            application_id: application_id.into(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: "status-board-bot".to_string(),
                username: "status-board-bot".to_string(),
            },
            api_base: API_BASE.to_string(),
        }
    }

    /// Point the adapter at a different API root
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the API URL for a path
    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token))
    }

    /// Fetch bot info from Discord API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct CurrentUser {
            id: String,
            username: String,
            global_name: Option<String>,
        }

        let response = self
            .authorized(self.client.get(self.api_url("users/@me")))
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!("Discord API error: {}", response.status())));
        }

        let user: CurrentUser = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        self.info = BotInfo {
            id: user.id,
            name: user.global_name.unwrap_or_else(|| user.username.clone()),
            username: user.username,
        };

        Ok(())
    }

    /// Slash command definitions for every registered command
    pub fn command_definitions(registry: &CommandRegistry) -> Vec<ApplicationCommand> {
        registry
            .all()
            .map(|cmd| ApplicationCommand {
                name: cmd.name.clone(),
                description: cmd.description.clone().unwrap_or_else(|| cmd.name.clone()),
                kind: CHAT_INPUT,
                options: cmd
                    .options
                    .iter()
                    .map(|opt| ApplicationCommandOption {
                        kind: STRING_OPTION,
                        name: opt.name.clone(),
                        description: opt.description.clone(),
                        required: opt.required,
                    })
                    .collect(),
            })
            .collect()
    }

    /// Overwrite the application's global slash commands
    pub async fn register_commands(&self, registry: &CommandRegistry) -> Result<usize, BotError> {
        let commands = Self::command_definitions(registry);
        let url = self.api_url(&format!("applications/{}/commands", self.application_id));

        let response = self
            .authorized(self.client.put(&url))
            .json(&commands)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(BotError::Network(format!("Failed to register commands: {}", error)));
        }

        tracing::info!("Synced {} global command(s)", commands.len());
        Ok(commands.len())
    }

    /// Map a failed response onto the board error taxonomy
    async fn status_error(response: Response, what: &str) -> SyncError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN => {
                SyncError::TargetUnavailable(format!("{} ({}): {}", what, status, body))
            }
            _ => SyncError::Transport(format!("Discord API error for {} ({}): {}", what, status, body)),
        }
    }
}

#[async_trait]
impl BoardChannel for DiscordAdapter {
    async fn resolve_channel(&self, channel_id: ChannelId) -> Result<(), SyncError> {
        let url = self.api_url(&format!("channels/{}", channel_id));
        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response, &format!("channel {}", channel_id)).await);
        }
        Ok(())
    }

    async fn send_payload(&self, channel_id: ChannelId, payload: &DisplayPayload) -> Result<MessageId, SyncError> {
        let url = self.api_url(&format!("channels/{}/messages", channel_id));
        let response = self
            .authorized(self.client.post(&url))
            .json(&MessageBody { embeds: [payload] })
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response, &format!("channel {}", channel_id)).await);
        }

        let created: CreatedMessage = response
            .json()
            .await
            .map_err(|e| SyncError::Transport(format!("Unexpected message response: {}", e)))?;
        created
            .id
            .parse()
            .map_err(|_| SyncError::Transport(format!("Invalid message id: {}", created.id)))
    }

    async fn edit_payload(&self, target: &BoardTarget, payload: &DisplayPayload) -> Result<(), SyncError> {
        let url = self.api_url(&format!(
            "channels/{}/messages/{}",
            target.channel_id, target.message_id
        ));
        tracing::debug!("Editing board message {}", target.message_id);

        let response = self
            .authorized(self.client.patch(&url))
            .json(&MessageBody { embeds: [payload] })
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response, &format!("message {}", target.message_id)).await);
        }
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
