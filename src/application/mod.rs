//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: ListStore, BoardRenderer, BoardSync, CommandGateway
//! - Messaging: Command parsing and dispatching
//! - Errors: Domain-specific errors

pub mod errors;
pub mod messaging;
pub mod services;
