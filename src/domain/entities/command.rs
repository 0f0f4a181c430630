use std::collections::BTreeMap;

use super::ListName;

/// What a slash command does to its list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    Add,
    Remove,
    Show,
}

impl CommandAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandAction::Add => "add",
            CommandAction::Remove => "remove",
            CommandAction::Show => "show",
        }
    }

    pub fn is_mutation(&self) -> bool {
        !matches!(self, CommandAction::Show)
    }
}

/// A string option on a slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOption {
    pub name: String,
    pub description: String,
    pub required: bool,
}

/// Represents a bot slash command
#[derive(Debug, Clone)]
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub action: CommandAction,
    pub list: ListName,
    pub options: Vec<CommandOption>,
}

impl Command {
    pub fn new(action: CommandAction, list: ListName) -> Self {
        Self {
            name: format!("{}_{}", action.as_str(), list.as_str()),
            description: None,
            action,
            list,
            options: Vec::new(),
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_option(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.options.push(CommandOption {
            name: name.into(),
            description: description.into(),
            required: true,
        });
        self
    }

    pub fn matches(&self, input: &str) -> bool {
        self.name.eq_ignore_ascii_case(input.trim())
    }
}

/// Command registry for the board's slash commands
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The six commands the board exposes: add, remove and show per list
    pub fn status_board() -> Self {
        let mut registry = Self::new();
        for list in ListName::ALL {
            registry.register(
                Command::new(CommandAction::Add, list)
                    .with_description("Exclusive for the board owner")
                    .with_option("entry", format!("Entry to add to {}", list)),
            );
            registry.register(
                Command::new(CommandAction::Remove, list)
                    .with_description("Exclusive for the board owner")
                    .with_option("entry", format!("Entry to remove from {}", list)),
            );
            registry.register(
                Command::new(CommandAction::Show, list)
                    .with_description(format!("Shows the current {} list", list)),
            );
        }
        registry
    }

    pub fn register(&mut self, command: Command) {
        self.commands.insert(command.name.clone(), command);
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn find(&self, input: &str) -> Option<&Command> {
        self.commands.values().find(|c| c.matches(input))
    }

    pub fn all(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
