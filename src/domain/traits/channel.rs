use async_trait::async_trait;
use crate::domain::entities::{BoardTarget, ChannelId, DisplayPayload, MessageId};
use crate::application::errors::SyncError;

/// BoardChannel trait - the part of a messaging platform the board needs
#[async_trait]
pub trait BoardChannel: Send + Sync {
    /// Confirm the channel exists and is reachable
    async fn resolve_channel(&self, channel_id: ChannelId) -> Result<(), SyncError>;

    /// Post a new message carrying the payload, returning its id
    async fn send_payload(&self, channel_id: ChannelId, payload: &DisplayPayload) -> Result<MessageId, SyncError>;

    /// Replace the content of an existing message.
    /// A missing message is `SyncError::TargetUnavailable`.
    async fn edit_payload(&self, target: &BoardTarget, payload: &DisplayPayload) -> Result<(), SyncError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}
