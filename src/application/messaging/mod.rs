//! Message handling - Command parsing and dispatch

pub mod dispatcher;
pub mod parser;

pub use dispatcher::{CommandDispatcher, Reply};
pub use parser::{Invocation, MessageParser};
