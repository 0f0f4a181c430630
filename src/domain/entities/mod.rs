//! Domain entities - Core business objects with no external dependencies

pub mod board;
pub mod command;
pub mod status_list;
pub mod user;

pub use board::{colors, BoardTarget, ChannelId, DisplayPayload, Field, MessageId};
pub use command::{Command, CommandAction, CommandOption, CommandRegistry};
pub use status_list::{Entry, ListName, StatusList};
pub use user::User;
