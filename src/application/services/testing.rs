//! Test doubles shared by the service tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use crate::application::errors::{StorageError, SyncError};
use crate::domain::entities::{BoardTarget, ChannelId, DisplayPayload, ListName, MessageId};
use crate::domain::traits::{BoardChannel, BotInfo, Store};

/// Records every send and edit instead of talking to a platform
pub struct RecordingChannel {
    pub sent: Mutex<Vec<(ChannelId, DisplayPayload)>>,
    pub edits: Mutex<Vec<(BoardTarget, DisplayPayload)>>,
    next_message_id: AtomicU64,
    channel_missing: AtomicBool,
    message_missing: AtomicBool,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            edits: Mutex::new(Vec::new()),
            next_message_id: AtomicU64::new(9000),
            channel_missing: AtomicBool::new(false),
            message_missing: AtomicBool::new(false),
        }
    }

    pub fn set_channel_missing(&self, missing: bool) {
        self.channel_missing.store(missing, Ordering::SeqCst);
    }

    /// Simulates the board message being deleted by hand
    pub fn set_message_missing(&self, missing: bool) {
        self.message_missing.store(missing, Ordering::SeqCst);
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn edit_count(&self) -> usize {
        self.edits.lock().unwrap().len()
    }

    pub fn last_edit(&self) -> Option<DisplayPayload> {
        self.edits.lock().unwrap().last().map(|(_, p)| p.clone())
    }
}

#[async_trait]
impl BoardChannel for RecordingChannel {
    async fn resolve_channel(&self, channel_id: ChannelId) -> Result<(), SyncError> {
        if self.channel_missing.load(Ordering::SeqCst) {
            return Err(SyncError::Transport(format!("unknown channel {}", channel_id)));
        }
        Ok(())
    }

    async fn send_payload(&self, channel_id: ChannelId, payload: &DisplayPayload) -> Result<MessageId, SyncError> {
        self.sent.lock().unwrap().push((channel_id, payload.clone()));
        Ok(self.next_message_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn edit_payload(&self, target: &BoardTarget, payload: &DisplayPayload) -> Result<(), SyncError> {
        if self.message_missing.load(Ordering::SeqCst) {
            return Err(SyncError::TargetUnavailable(format!("unknown message {}", target.message_id)));
        }
        self.edits.lock().unwrap().push((*target, payload.clone()));
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            id: "test".to_string(),
            name: "status-board-bot".to_string(),
            username: "test".to_string(),
        }
    }
}

/// Store kept entirely in memory, with switchable write failures
pub struct MemoryStore {
    lists: Mutex<HashMap<ListName, Vec<String>>>,
    message_id: Mutex<Option<MessageId>>,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            lists: Mutex::new(HashMap::new()),
            message_id: Mutex::new(None),
            fail_saves: AtomicBool::new(false),
        }
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn saved(&self, name: ListName) -> Option<Vec<String>> {
        self.lists.lock().unwrap().get(&name).cloned()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn load_list(&self, name: ListName) -> Result<Vec<String>, StorageError> {
        Ok(self.saved(name).unwrap_or_default())
    }

    async fn save_list(&self, name: ListName, entries: &[String]) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only store",
            )));
        }
        self.lists.lock().unwrap().insert(name, entries.to_vec());
        Ok(())
    }

    async fn load_message_id(&self) -> Result<Option<MessageId>, StorageError> {
        Ok(*self.message_id.lock().unwrap())
    }

    async fn save_message_id(&self, id: MessageId) -> Result<(), StorageError> {
        *self.message_id.lock().unwrap() = Some(id);
        Ok(())
    }
}
