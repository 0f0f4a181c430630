//! Application services - Board state, rendering and command handling

pub mod board_sync;
pub mod gateway;
pub mod list_store;
pub mod renderer;

#[cfg(test)]
pub(crate) mod testing;

pub use board_sync::{BoardSync, SyncState};
pub use gateway::{CommandGateway, Mutation, MutationOutcome};
pub use list_store::ListStore;
pub use renderer::{BoardRenderer, BOARD_TITLE, EMPTY_MARKER};
