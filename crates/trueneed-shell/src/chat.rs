//! Chat view: the current conversation plus archived ones.

use std::mem;

use trueneed_core::advisor::{Message, Role};

const TITLE_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub id: u64,
    pub title: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Default)]
pub struct ChatView {
    messages: Vec<Message>,
    conversations: Vec<Conversation>,
    loading: bool,
    active: bool,
    next_id: u64,
}

impl ChatView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts in chat mode with a prepared conversation.
    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            active: true,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Archived conversations, newest first.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True once the landing page has given way to the chat.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Appends the person's message and waits for a reply.
    ///
    /// Blank input is ignored and returns `None`.
    pub fn submit(&mut self, text: &str) -> Option<&Message> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.active = true;
        self.loading = true;
        self.messages.push(Message::user(text));
        self.messages.last()
    }

    pub fn receive(&mut self, reply: Message) {
        self.loading = false;
        self.messages.push(reply);
    }

    /// Archives a non-empty conversation and starts a fresh one.
    pub fn new_chat(&mut self) {
        if let Some(first) = self.messages.first() {
            let title = format!("{}...", first.text.chars().take(TITLE_CHARS).collect::<String>());
            self.next_id += 1;
            let conversation = Conversation {
                id: self.next_id,
                title,
                messages: mem::take(&mut self.messages),
            };
            tracing::debug!(id = conversation.id, "archived conversation");
            self.conversations.insert(0, conversation);
        }
        self.loading = false;
    }

    /// Returns to the landing page, dropping the current conversation.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.loading = false;
        self.active = false;
    }

    /// Drops everything, including the archive.
    pub fn clear_all(&mut self) {
        self.reset();
        self.conversations.clear();
    }

    pub fn last_reply(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == Role::Assistant)
    }
}

#[cfg(test)]
mod tests {
    use trueneed_core::advisor::{CANNED_REPLY, sample_conversation};

    use super::*;

    #[test]
    fn test_blank_submit_ignored() {
        let mut chat = ChatView::new();
        assert!(chat.submit("   ").is_none());
        assert!(!chat.is_active());
        assert!(chat.messages().is_empty());
    }

    #[test]
    fn test_submit_then_receive() {
        let mut chat = ChatView::new();
        chat.submit("Best phone under ₹20,000?");
        assert!(chat.is_loading());

        chat.receive(Message::assistant(CANNED_REPLY));
        assert!(!chat.is_loading());
        assert_eq!(chat.last_reply().map(|m| m.text.as_str()), Some(CANNED_REPLY));
    }

    #[test]
    fn test_new_chat_archives_with_truncated_title() {
        let mut chat = ChatView::new();
        chat.submit("I need a laptop for coding and video editing under ₹80,000");
        chat.receive(Message::assistant(CANNED_REPLY));

        chat.new_chat();

        assert!(chat.messages().is_empty());
        let archived = &chat.conversations()[0];
        assert_eq!(archived.title, "I need a laptop for coding and...");
        assert_eq!(archived.messages.len(), 2);
    }

    #[test]
    fn test_new_chat_on_empty_history_archives_nothing() {
        let mut chat = ChatView::new();
        chat.new_chat();
        assert!(chat.conversations().is_empty());
    }

    #[test]
    fn test_archive_is_newest_first() {
        let mut chat = ChatView::new();
        chat.submit("first question");
        chat.new_chat();
        chat.submit("second question");
        chat.new_chat();

        let titles: Vec<_> = chat.conversations().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["second question...", "first question..."]);
    }

    #[test]
    fn test_with_messages_starts_in_chat_mode() {
        let mut chat = ChatView::with_messages(sample_conversation());
        assert!(chat.is_active());
        assert!(!chat.is_loading());
        assert_eq!(chat.messages().len(), 4);
        assert_eq!(chat.last_reply().map(|m| m.products.len()), Some(1));

        chat.new_chat();
        assert_eq!(
            chat.conversations()[0].title,
            "I need a laptop for coding and..."
        );
    }

    #[test]
    fn test_reset_returns_to_landing() {
        let mut chat = ChatView::new();
        chat.submit("hello");
        chat.new_chat();
        chat.submit("again");

        chat.reset();

        assert!(!chat.is_active());
        assert!(chat.messages().is_empty());
        assert_eq!(chat.conversations().len(), 1);
    }
}
