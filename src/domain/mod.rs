//! Domain layer - Core business objects and the seams around them
//!
//! This layer contains:
//! - Entities: StatusList, Entry, BoardTarget, DisplayPayload, Command, User
//! - Traits: Abstractions for infrastructure (BoardChannel, Store, AuthorizationPolicy)

pub mod entities;
pub mod traits;
