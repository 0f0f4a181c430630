use async_trait::async_trait;
use crate::application::errors::StorageError;
use crate::domain::entities::{ListName, MessageId};

/// Store trait - abstraction for durable board state
#[async_trait]
pub trait Store: Send + Sync {
    // List operations
    /// Missing storage reads as an empty list.
    async fn load_list(&self, name: ListName) -> Result<Vec<String>, StorageError>;
    async fn save_list(&self, name: ListName, entries: &[String]) -> Result<(), StorageError>;

    // Board target operations
    async fn load_message_id(&self) -> Result<Option<MessageId>, StorageError>;
    async fn save_message_id(&self, id: MessageId) -> Result<(), StorageError>;
}
