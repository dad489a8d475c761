use crate::state::ChatEntry;

/// Append-only, insertion-ordered list of chat entries.
///
/// Every append bumps `revision`, which is how views find out the history
/// changed without holding callbacks into UI code.
#[derive(Debug, Clone, Default)]
pub struct ChatHistory {
    entries: Vec<ChatEntry>,
    revision: u64,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: ChatEntry) {
        self.entries.push(entry);
        self.revision += 1;
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ChatEntry> {
        self.entries.last()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_insertion_order() {
        let mut history = ChatHistory::new();
        history.append(ChatEntry::user("one"));
        history.append(ChatEntry::bot("two"));
        history.append(ChatEntry::user("three"));

        let texts: Vec<&str> = history.entries().iter().map(|e| e.text()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        assert_eq!(history.last().map(|e| e.text()), Some("three"));
    }

    #[test]
    fn test_revision_bumps_on_every_append() {
        let mut history = ChatHistory::new();
        assert_eq!(history.revision(), 0);
        assert!(history.is_empty());

        history.append(ChatEntry::user("a"));
        history.append(ChatEntry::user("a"));
        assert_eq!(history.revision(), 2);
        assert_eq!(history.len(), 2);
    }
}
