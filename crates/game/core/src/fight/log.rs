/// Ordered, append-only record of everything that happened in a fight.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FightLog {
    entries: Vec<String>,
}

impl FightLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry and returns its index.
    pub fn push(&mut self, entry: impl Into<String>) -> usize {
        self.entries.push(entry.into());
        self.entries.len() - 1
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Entries appended at or after `index`.
    pub fn since(&self, index: usize) -> &[String] {
        self.entries.get(index..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }
}
