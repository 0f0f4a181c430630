//! Message dispatcher - Routes slash commands to the gateway

use std::sync::Arc;

use super::parser::Invocation;
use crate::application::errors::CommandError;
use crate::application::services::{CommandGateway, Mutation};
use crate::domain::entities::{CommandAction, CommandRegistry, DisplayPayload};

/// Response to a command. Transports show replies only to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Embed(DisplayPayload),
}

impl Reply {
    pub fn to_plain_text(&self) -> String {
        match self {
            Reply::Text(text) => text.clone(),
            Reply::Embed(payload) => payload.to_plain_text(),
        }
    }
}

/// Maps invocations onto gateway calls and phrases the results
pub struct CommandDispatcher {
    registry: CommandRegistry,
    gateway: Arc<CommandGateway>,
}

impl CommandDispatcher {
    pub fn new(gateway: Arc<CommandGateway>) -> Self {
        Self {
            registry: CommandRegistry::status_board(),
            gateway,
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub async fn dispatch(&self, invocation: &Invocation) -> Reply {
        match self.run(invocation).await {
            Ok(reply) => reply,
            Err(e) => {
                let action = self.registry.find(&invocation.name).map(|c| c.action);
                Reply::Text(describe_error(action, &e))
            }
        }
    }

    async fn run(&self, invocation: &Invocation) -> Result<Reply, CommandError> {
        let command = self
            .registry
            .find(&invocation.name)
            .ok_or_else(|| CommandError::UnknownCommand(invocation.name.clone()))?;

        let mutation = match command.action {
            CommandAction::Show => {
                return Ok(Reply::Embed(self.gateway.handle_query(command.list).await));
            }
            CommandAction::Add => Mutation::Append,
            CommandAction::Remove => Mutation::Remove,
        };

        let entry = invocation
            .entry
            .as_deref()
            .ok_or_else(|| CommandError::InvalidArgs(format!("Usage: /{} <entry>", command.name)))?;

        let outcome = self
            .gateway
            .handle_mutation(&invocation.caller, command.list, mutation, entry)
            .await?;
        Ok(Reply::Text(format!("✅ {}", outcome)))
    }
}

fn describe_error(action: Option<CommandAction>, err: &CommandError) -> String {
    match err {
        CommandError::UnknownCommand(name) => format!("❌ Unknown command: /{}", name),
        CommandError::InvalidArgs(usage) => format!("❌ Missing entry. {}", usage),
        CommandError::Unauthorized(list) => match action {
            Some(CommandAction::Remove) => format!("❌ You are not allowed to remove {} entries.", list),
            _ => format!("❌ You are not allowed to update {}.", list),
        },
        CommandError::NotFound { entry, .. } => format!("❌ Entry not found: {}", entry),
        CommandError::InvalidEntry => "❌ Entry must be a single non-empty line.".to_string(),
        CommandError::PushFailed { source, .. } => {
            format!("⚠️ Could not update the status board, nothing was changed: {}", source)
        }
        CommandError::PersistFailed { list, source } => format!(
            "⚠️ Board updated, but {} could not be saved to disk. Ask the operator to check storage: {}",
            list, source
        ),
    }
}
