//! Chat and commentary components

use serde::{Deserialize, Serialize};

use super::PerformanceRating;

/// Who wrote a chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChatSender {
    System,
    Human,
    Player { id: u32, name: String },
}

impl ChatSender {
    pub fn display_name(&self) -> &str {
        match self {
            ChatSender::System => "System",
            ChatSender::Human => "Du",
            ChatSender::Player { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub sender: ChatSender,
    pub text: String,
    /// Session clock seconds
    pub timestamp: f64,
    /// Set on answer hints: whether the hinted answer is actually correct
    pub is_helpful: Option<bool>,
}

impl ChatMessage {
    pub fn new(sender: ChatSender, text: impl Into<String>, timestamp: f64) -> Self {
        Self {
            id: 0,
            sender,
            text: text.into(),
            timestamp,
            is_helpful: None,
        }
    }

    pub fn system(text: impl Into<String>, timestamp: f64) -> Self {
        Self::new(ChatSender::System, text, timestamp)
    }

    pub fn with_helpful(mut self, helpful: bool) -> Self {
        self.is_helpful = Some(helpful);
        self
    }
}

/// Ordered chat history; assigns message ids on append
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return its assigned id
    pub fn push(&mut self, mut message: ChatMessage) -> u64 {
        self.next_id += 1;
        message.id = self.next_id;
        self.messages.push(message);
        self.next_id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.next_id = 0;
    }
}

/// Live competitive status line for one simulated answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub player_id: u32,
    pub player_name: String,
    pub is_correct: bool,
    pub time_taken: u32,
    pub current_score: u32,
    pub average_time: u32,
    pub accuracy: f32,
    pub status_message: String,
    pub performance_rating: PerformanceRating,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_log_assigns_ids() {
        let mut log = ChatLog::new();
        let a = log.push(ChatMessage::system("Willkommen", 0.0));
        let b = log.push(ChatMessage::new(ChatSender::Human, "Hallo", 1.0));

        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(log.messages()[1].id, 2);

        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.push(ChatMessage::system("again", 2.0)), 1);
    }

    #[test]
    fn test_sender_names() {
        let player = ChatSender::Player {
            id: 3,
            name: "Lena".into(),
        };
        assert_eq!(player.display_name(), "Lena");
        assert_eq!(ChatSender::Human.display_name(), "Du");
    }
}
