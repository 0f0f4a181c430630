use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::errors::SyncError;
use crate::domain::entities::{BoardTarget, ChannelId, DisplayPayload};
use crate::domain::traits::{BoardChannel, Store};

/// Lifecycle of the board message within this process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Uninitialized,
    Created,
    Synced,
}

struct SyncInner {
    state: SyncState,
    target: Option<BoardTarget>,
}

/// Owns the board message and keeps it in step with the lists.
///
/// The message is created once, its id persisted through the `Store`, and
/// every later render edits that same message. A message that disappears is
/// reported, never silently recreated.
pub struct BoardSync {
    channel: Arc<dyn BoardChannel>,
    store: Arc<dyn Store>,
    channel_id: ChannelId,
    inner: Mutex<SyncInner>,
}

impl BoardSync {
    pub fn new(channel: Arc<dyn BoardChannel>, store: Arc<dyn Store>, channel_id: ChannelId) -> Self {
        Self {
            channel,
            store,
            channel_id,
            inner: Mutex::new(SyncInner {
                state: SyncState::Uninitialized,
                target: None,
            }),
        }
    }

    pub async fn state(&self) -> SyncState {
        self.inner.lock().await.state
    }

    /// Find or create the board message.
    ///
    /// Reuses the persisted message id when there is one; otherwise posts
    /// `initial` and persists the new id. Once a target is known, later calls
    /// return it without touching the platform.
    pub async fn ensure_target(&self, initial: &DisplayPayload) -> Result<BoardTarget, SyncError> {
        let mut inner = self.inner.lock().await;
        if let Some(target) = inner.target {
            return Ok(target);
        }

        self.channel
            .resolve_channel(self.channel_id)
            .await
            .map_err(|e| match e {
                unavailable @ SyncError::TargetUnavailable(_) => unavailable,
                other => SyncError::TargetUnavailable(format!(
                    "channel {} could not be resolved: {}",
                    self.channel_id, other
                )),
            })?;

        let target = match self.store.load_message_id().await? {
            Some(message_id) => {
                tracing::info!("Found existing board message ID: {}", message_id);
                BoardTarget::new(self.channel_id, message_id)
            }
            None => {
                let message_id = self.channel.send_payload(self.channel_id, initial).await?;
                self.store.save_message_id(message_id).await?;
                tracing::info!("Board message sent with ID: {}", message_id);
                BoardTarget::new(self.channel_id, message_id)
            }
        };

        inner.target = Some(target);
        inner.state = SyncState::Created;
        Ok(target)
    }

    /// Replace the board message content with `payload`
    pub async fn push(&self, payload: &DisplayPayload) -> Result<(), SyncError> {
        let mut inner = self.inner.lock().await;
        let target = inner.target.ok_or_else(|| {
            SyncError::TargetUnavailable("board message has not been created yet".to_string())
        })?;

        self.channel.edit_payload(&target, payload).await?;
        inner.state = SyncState::Synced;
        tracing::debug!("Board message {} updated", target.message_id);
        Ok(())
    }
}
