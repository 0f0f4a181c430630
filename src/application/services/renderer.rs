use crate::domain::entities::{colors, DisplayPayload, ListName};

pub const BOARD_TITLE: &str = "Status Board";

/// Shown in place of an empty list
pub const EMPTY_MARKER: &str = "*(empty)*";

const BULLET: &str = "- ";

/// Turns lists into display payloads. Pure: no I/O and no hidden state.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoardRenderer;

impl BoardRenderer {
    pub fn new() -> Self {
        Self
    }

    /// The full board: both lists as fields under one title
    pub fn render(&self, ally: &[String], enemies: &[String]) -> DisplayPayload {
        DisplayPayload::new(BOARD_TITLE, colors::BLUE)
            .with_field(ListName::Ally.label(), Self::section(ally))
            .with_field(ListName::Enemies.label(), Self::section(enemies))
    }

    /// A single list on its own, for queries
    pub fn render_list(&self, name: ListName, entries: &[String]) -> DisplayPayload {
        let color = match name {
            ListName::Ally => colors::GREEN,
            ListName::Enemies => colors::RED,
        };
        DisplayPayload::new(name.label(), color).with_description(Self::section(entries))
    }

    fn section(entries: &[String]) -> String {
        if entries.is_empty() {
            return EMPTY_MARKER.to_string();
        }
        entries
            .iter()
            .map(|entry| format!("{}{}", BULLET, entry))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
