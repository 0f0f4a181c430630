use serde::{Deserialize, Serialize};

pub type ChannelId = u64;
pub type MessageId = u64;

/// The one message that acts as the live board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardTarget {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
}

impl BoardTarget {
    pub fn new(channel_id: ChannelId, message_id: MessageId) -> Self {
        Self {
            channel_id,
            message_id,
        }
    }
}

/// Embed colors, matching the platform's named palette
pub mod colors {
    pub const BLUE: u32 = 0x3498db;
    pub const GREEN: u32 = 0x2ecc71;
    pub const RED: u32 = 0xe74c3c;
}

/// A labeled section of a payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Rendered board snapshot. Serializes as a Discord embed object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPayload {
    pub title: String,
    pub color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fields: Vec<Field>,
}

impl DisplayPayload {
    pub fn new(title: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            color,
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value: value.into(),
            inline: false,
        });
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Plain-text form for terminals
    pub fn to_plain_text(&self) -> String {
        let mut out = format!("== {} ==", self.title);
        if let Some(description) = &self.description {
            out.push('\n');
            out.push_str(description);
        }
        for field in &self.fields {
            out.push_str(&format!("\n[{}]\n{}", field.name, field.value));
        }
        out
    }
}
