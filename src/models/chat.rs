use serde::{ Serialize, Deserialize };

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

/// Append-only message log of the persistent chat.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChatRecord {
    pub messages: Vec<ChatMessage>,
}

impl ChatRecord {
    pub fn push(&mut self, sender: Sender, text: impl Into<String>) {
        self.messages.push(ChatMessage { sender, text: text.into() });
    }

    pub fn last_from(&self, sender: Sender) -> Option<&ChatMessage> {
        self.messages.iter().rev().find(|m| m.sender == sender)
    }
}
