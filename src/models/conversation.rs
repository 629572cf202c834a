use chrono::{ DateTime, Utc };
use crate::error::ChatError;
use crate::models::chat::ChatRecord;
use crate::wizard::WizardRecord;

#[derive(Clone, Debug)]
pub enum ConversationState {
    Chat(ChatRecord),
    Wizard(WizardRecord),
}

impl ConversationState {
    pub fn kind(&self) -> &'static str {
        match self {
            ConversationState::Chat(_) => "chat",
            ConversationState::Wizard(_) => "wizard",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Conversation {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub state: ConversationState,
}

impl Conversation {
    pub fn new(id: String, state: ConversationState) -> Self {
        let now = Utc::now();
        Self {
            id,
            created_at: now,
            updated_at: now,
            state,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn chat(&self) -> Result<&ChatRecord, ChatError> {
        match &self.state {
            ConversationState::Chat(record) => Ok(record),
            other => Err(self.unsupported(other.kind())),
        }
    }

    pub fn chat_mut(&mut self) -> Result<&mut ChatRecord, ChatError> {
        let kind = self.state.kind();
        match &mut self.state {
            ConversationState::Chat(record) => Ok(record),
            _ => Err(ChatError::UnsupportedOperation { id: self.id.clone(), kind }),
        }
    }

    pub fn wizard(&self) -> Result<&WizardRecord, ChatError> {
        match &self.state {
            ConversationState::Wizard(record) => Ok(record),
            other => Err(self.unsupported(other.kind())),
        }
    }

    /// Page title and heading for this conversation; `chat_title` names the persistent chat.
    pub fn title<'a>(&self, chat_title: &'a str) -> &'a str {
        match &self.state {
            ConversationState::Chat(_) => chat_title,
            ConversationState::Wizard(record) => record.flow().title(),
        }
    }

    fn unsupported(&self, kind: &'static str) -> ChatError {
        ChatError::UnsupportedOperation { id: self.id.clone(), kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Sender;
    use crate::wizard::Flow;

    #[test]
    fn accessors_reject_the_other_kind() {
        let mut chat = Conversation::new("main_chat".into(), ConversationState::Chat(ChatRecord::default()));
        assert!(chat.chat().is_ok());
        assert!(matches!(
            chat.wizard(),
            Err(ChatError::UnsupportedOperation { kind: "chat", .. })
        ));
        chat.chat_mut().unwrap().push(Sender::User, "hi");
        assert_eq!(chat.chat().unwrap().messages.len(), 1);

        let mut wizard = Conversation::new(
            "w".into(),
            ConversationState::Wizard(WizardRecord::new(Flow::ResetConfirm))
        );
        assert!(wizard.wizard().is_ok());
        assert!(matches!(
            wizard.chat_mut(),
            Err(ChatError::UnsupportedOperation { kind: "wizard", .. })
        ));
    }

    #[test]
    fn title_follows_the_flow() {
        let chat = Conversation::new("main_chat".into(), ConversationState::Chat(ChatRecord::default()));
        assert_eq!(chat.title("Persistent Chat"), "Persistent Chat");

        let wizard = Conversation::new(
            "w".into(),
            ConversationState::Wizard(WizardRecord::new(Flow::Setup))
        );
        assert_eq!(wizard.title("Persistent Chat"), "Setup Wizard");
    }
}
