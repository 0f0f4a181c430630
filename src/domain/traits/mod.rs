//! Domain traits - Abstractions for infrastructure implementations

pub mod auth;
pub mod channel;
pub mod store;

pub use auth::{AuthorizationPolicy, SinglePrincipal};
pub use channel::{BoardChannel, BotInfo};
pub use store::Store;
