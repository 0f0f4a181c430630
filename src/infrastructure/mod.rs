//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: Plain-text persistence of lists and the board message id
//! - Adapters: Platform integrations (Discord, console)

pub mod adapters;
pub mod config;
pub mod storage;
