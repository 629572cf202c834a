use async_trait::async_trait;
use chrono::{ DateTime, Utc };
use log::{ debug, info };
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{ Mutex, RwLock };
use uuid::Uuid;

use crate::error::ChatError;
use crate::models::conversation::{ Conversation, ConversationState };
use crate::store::{ ConversationStore, SharedConversation };

#[derive(Default)]
pub struct MemoryStore {
    conversations: RwLock<HashMap<String, SharedConversation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn create(&self, state: ConversationState) -> Result<String, ChatError> {
        let id = Uuid::new_v4().to_string();
        let kind = state.kind();
        let conversation = Conversation::new(id.clone(), state);
        self.conversations.write().await.insert(id.clone(), Arc::new(Mutex::new(conversation)));
        info!("Created {} conversation {}", kind, id);
        Ok(id)
    }

    async fn create_fixed(&self, id: &str, state: ConversationState) -> Result<String, ChatError> {
        let mut conversations = self.conversations.write().await;
        if conversations.contains_key(id) {
            debug!("Reusing conversation {}", id);
        } else {
            info!("Created {} conversation {}", state.kind(), id);
            let conversation = Conversation::new(id.to_string(), state);
            conversations.insert(id.to_string(), Arc::new(Mutex::new(conversation)));
        }
        Ok(id.to_string())
    }

    async fn get(&self, id: &str) -> Result<SharedConversation, ChatError> {
        self.conversations
            .read().await
            .get(id)
            .cloned()
            .ok_or_else(|| ChatError::UnknownConversation(id.to_string()))
    }

    async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    async fn evict_idle(&self, cutoff: DateTime<Utc>) -> usize {
        let mut conversations = self.conversations.write().await;
        let before = conversations.len();
        // A record that is locked, or whose handle a request still holds, is being served right
        // now and is not idle. No new handles can appear while the write lock is held.
        conversations.retain(|_, conversation| {
            if Arc::strong_count(conversation) > 1 {
                return true;
            }
            match conversation.try_lock() {
                Ok(guard) => guard.updated_at >= cutoff,
                Err(_) => true,
            }
        });
        before - conversations.len()
    }
}
