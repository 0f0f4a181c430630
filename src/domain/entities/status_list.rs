use std::fmt;
use std::str::FromStr;

/// Which of the two board lists an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListName {
    Ally,
    Enemies,
}

impl ListName {
    pub const ALL: [ListName; 2] = [ListName::Ally, ListName::Enemies];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListName::Ally => "ally",
            ListName::Enemies => "enemies",
        }
    }

    /// Heading used on the board and in replies
    pub fn label(&self) -> &'static str {
        match self {
            ListName::Ally => "Ally",
            ListName::Enemies => "Enemies",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ListName::Ally => "ally_list.txt",
            ListName::Enemies => "enemies_list.txt",
        }
    }
}

impl fmt::Display for ListName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ListName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ally" => Ok(ListName::Ally),
            "enemies" => Ok(ListName::Enemies),
            other => Err(format!("unknown list '{}', expected ally or enemies", other)),
        }
    }
}

/// A single board line. Never empty and never spans more than one line,
/// since lists are stored one entry per line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry(String);

impl Entry {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.contains(|c| c == '\n' || c == '\r') {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, named collection of entries. Insertion order is display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusList {
    name: ListName,
    entries: Vec<String>,
}

impl StatusList {
    pub fn new(name: ListName) -> Self {
        Self {
            name,
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> ListName {
        self.name
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn append(&mut self, entry: Entry) {
        self.entries.push(entry.into_inner());
    }

    /// Remove the first exact match, returning the index it was at.
    /// Later duplicates are left in place.
    pub fn remove(&mut self, entry: &str) -> Option<usize> {
        let index = self.entries.iter().position(|e| e == entry)?;
        self.entries.remove(index);
        Some(index)
    }

    pub fn replace(&mut self, entries: Vec<String>) {
        self.entries = entries;
    }
}
