//! UI-agnostic chat state types
//!
//! These types are shared by every front end (the TUI and the one-shot CLI)
//! and don't depend on any specific UI framework.

/// Who a chat entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// One line of the conversation. Fields are private so an entry can't be
/// edited after it has been appended to a history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    text: String,
    sender: Sender,
}

impl ChatEntry {
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Bot)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_constructors() {
        let user = ChatEntry::user("hi");
        assert_eq!(user.sender(), Sender::User);
        assert_eq!(user.text(), "hi");

        let bot = ChatEntry::bot("hello");
        assert_eq!(bot.sender(), Sender::Bot);
    }
}
