//! Message parser - Turns typed command lines into invocations

use crate::domain::entities::User;

/// A slash command as received from any transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub entry: Option<String>,
    pub caller: User,
}

impl Invocation {
    pub fn new(name: impl Into<String>, caller: User) -> Self {
        Self {
            name: name.into(),
            entry: None,
            caller,
        }
    }

    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }
}

/// Parses text lines such as `/add_ally Nyx the Brave`
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    /// Returns `None` for lines that are not commands.
    /// Everything after the command name is the entry, inner spacing kept.
    pub fn parse(&self, text: &str, sender: User) -> Option<Invocation> {
        let text = text.trim();
        let cmd_text = if let Some(rest) = text.strip_prefix('/') {
            rest
        } else if !self.command_prefix.is_empty() {
            text.strip_prefix(self.command_prefix.as_str())?
        } else {
            return None;
        };

        let (name, rest) = match cmd_text.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (cmd_text, ""),
        };
        if name.is_empty() {
            return None;
        }

        let invocation = Invocation::new(name, sender);
        if rest.is_empty() {
            Some(invocation)
        } else {
            Some(invocation.with_entry(rest))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new("1")
    }

    #[test]
    fn test_parse_command_with_entry() {
        let parser = MessageParser::new("?");
        let inv = parser.parse("/add_ally  Nyx  the Brave ", user()).unwrap();

        assert_eq!(inv.name, "add_ally");
        assert_eq!(inv.entry.as_deref(), Some("Nyx  the Brave"));
        assert_eq!(inv.caller, user());
    }

    #[test]
    fn test_parse_custom_prefix_without_entry() {
        let parser = MessageParser::new("?");
        let inv = parser.parse("?show_enemies", user()).unwrap();

        assert_eq!(inv.name, "show_enemies");
        assert_eq!(inv.entry, None);
    }

    #[test]
    fn test_plain_text_is_not_a_command() {
        let parser = MessageParser::new("?");
        assert!(parser.parse("hello there", user()).is_none());
        assert!(parser.parse("/", user()).is_none());
    }
}
