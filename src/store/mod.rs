mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{ DateTime, Utc };
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::cli::Args;
use crate::error::ChatError;
use crate::models::conversation::{ Conversation, ConversationState };

/// A conversation shared between requests. Holding the lock serialises every read-modify-write
/// of that record.
pub type SharedConversation = Arc<Mutex<Conversation>>;

#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Inserts `state` under a freshly generated id and returns the id.
    async fn create(&self, state: ConversationState) -> Result<String, ChatError>;

    /// Inserts `state` under `id` unless a conversation with that id already exists.
    async fn create_fixed(&self, id: &str, state: ConversationState) -> Result<String, ChatError>;

    async fn get(&self, id: &str) -> Result<SharedConversation, ChatError>;

    async fn len(&self) -> usize;

    /// Drops conversations last updated before `cutoff`. Returns how many were removed.
    async fn evict_idle(&self, cutoff: DateTime<Utc>) -> usize;
}

pub fn create_store(args: &Args) -> Result<Arc<dyn ConversationStore>, ChatError> {
    match args.store_type.to_lowercase().as_str() {
        "memory" => Ok(Arc::new(MemoryStore::new())),
        _ => Err(ChatError::UnsupportedStore(args.store_type.clone())),
    }
}

pub fn initialize_store(args: &Args) -> Result<Arc<dyn ConversationStore>, ChatError> {
    info!("Conversations will be stored in: {}", args.store_type);
    create_store(args)
}
