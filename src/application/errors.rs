//! Application layer errors

use thiserror::Error;

use crate::domain::entities::ListName;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Board error: {0}")]
    Sync(#[from] SyncError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Outcomes of a command that are reported back to the caller
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Command not found: {0}")]
    UnknownCommand(String),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Entry must be a single non-empty line")]
    InvalidEntry,

    #[error("Not allowed to modify {0}")]
    Unauthorized(ListName),

    #[error("Entry not found in {list}: {entry}")]
    NotFound { list: ListName, entry: String },

    /// The board could not be updated; the in-memory change was undone.
    #[error("Board update failed, change to {list} was rolled back: {source}")]
    PushFailed {
        list: ListName,
        #[source]
        source: SyncError,
    },

    /// The board shows the change but the list file is stale.
    #[error("Board updated but {list} could not be saved to disk: {source}")]
    PersistFailed {
        list: ListName,
        #[source]
        source: StorageError,
    },
}

/// Errors talking to the board message
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Board target unavailable: {0}")]
    TargetUnavailable(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt data in {file}: {reason}")]
    Corrupt { file: String, reason: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
