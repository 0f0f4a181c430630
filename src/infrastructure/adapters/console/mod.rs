//! Console adapter for development/testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::application::errors::{BotError, SyncError};
use crate::application::messaging::{CommandDispatcher, MessageParser};
use crate::domain::entities::{BoardTarget, ChannelId, DisplayPayload, MessageId, User};
use crate::domain::traits::{BoardChannel, BotInfo};

/// Console bot adapter for local development.
///
/// The board is printed to stdout instead of being posted anywhere.
pub struct ConsoleAdapter {
    info: BotInfo,
    next_message_id: AtomicU64,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "status-board-bot".to_string(),
                username: "console".to_string(),
            },
            next_message_id: AtomicU64::new(1),
        }
    }

    /// Read command lines until EOF, running each as `caller`
    pub async fn run<R>(&self, input: R, parser: &MessageParser, dispatcher: &CommandDispatcher, caller: &User) -> Result<(), BotError>
    where
        R: AsyncBufRead + Unpin,
    {
        tracing::info!("Starting console bot (dev mode) as user {}", caller);
        let mut lines = input.lines();

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| BotError::Internal(format!("Failed to read input: {}", e)))?
        {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parser.parse(line, caller.clone()) {
                Some(invocation) => {
                    let reply = dispatcher.dispatch(&invocation).await;
                    println!("{}", reply.to_plain_text());
                }
                None => println!("Commands start with /, e.g. /add_ally <entry> or /show_enemies"),
            }
        }

        tracing::info!("Console input closed");
        Ok(())
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BoardChannel for ConsoleAdapter {
    async fn resolve_channel(&self, _channel_id: ChannelId) -> Result<(), SyncError> {
        Ok(())
    }

    async fn send_payload(&self, channel_id: ChannelId, payload: &DisplayPayload) -> Result<MessageId, SyncError> {
        let id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        println!("[BOARD #{} in {}]\n{}", id, channel_id, payload.to_plain_text());
        Ok(id)
    }

    async fn edit_payload(&self, target: &BoardTarget, payload: &DisplayPayload) -> Result<(), SyncError> {
        println!("[BOARD #{} updated]\n{}", target.message_id, payload.to_plain_text());
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
