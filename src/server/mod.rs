pub mod api;
pub mod page;

use crate::cli::Args;
use crate::store::ConversationStore;
use chrono::Utc;
use log::{ debug, info, warn };
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

pub struct Server {
    store: Arc<dyn ConversationStore>,
    args: Args,
}

impl Server {
    pub fn new(store: Arc<dyn ConversationStore>, args: Args) -> Self {
        Self { store, args }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.args.conversation_ttl_secs > 0 {
            self.start_idle_sweeper();
        }

        api::start_http_server(self.store.clone(), self.args.clone()).await
    }

    fn start_idle_sweeper(&self) {
        let store = self.store.clone();
        let ttl = Duration::from_secs(self.args.conversation_ttl_secs);
        let every = Duration::from_secs(self.args.sweep_interval_secs.max(1));
        info!("Idle conversations expire after {}s (sweep every {}s)", ttl.as_secs(), every.as_secs());

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                sweep_idle(store.as_ref(), ttl).await;
            }
        });
    }
}

/// Evicts conversations idle for longer than `ttl`. Returns how many were removed.
async fn sweep_idle(store: &dyn ConversationStore, ttl: Duration) -> usize {
    let Some(cutoff) = chrono::Duration::from_std(ttl).ok().and_then(|ttl| Utc::now().checked_sub_signed(ttl)) else {
        warn!("Idle TTL of {}s is out of range, skipping sweep", ttl.as_secs());
        return 0;
    };
    let removed = store.evict_idle(cutoff).await;
    if removed > 0 {
        info!("Evicted {} idle conversation(s), {} remaining", removed, store.len().await);
    } else {
        debug!("Idle sweep found nothing to evict");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::conversation::ConversationState;
    use crate::store::MemoryStore;
    use crate::wizard::{ Flow, WizardRecord };

    #[tokio::test]
    async fn sweep_removes_conversations_idle_past_ttl() {
        let store = MemoryStore::new();
        let stale = store.create(ConversationState::Wizard(WizardRecord::new(Flow::Setup))).await.unwrap();
        let fresh = store.create(ConversationState::Wizard(WizardRecord::new(Flow::Setup))).await.unwrap();
        store.get(&stale).await.unwrap().lock().await.updated_at = Utc::now() - chrono::Duration::minutes(10);

        assert_eq!(sweep_idle(&store, Duration::from_secs(60)).await, 1);
        assert!(store.get(&stale).await.is_err());
        assert!(store.get(&fresh).await.is_ok());

        assert_eq!(sweep_idle(&store, Duration::from_secs(60)).await, 0);
    }

    #[tokio::test]
    async fn sweep_with_unrepresentable_ttl_keeps_everything() {
        let store = MemoryStore::new();
        store.create(ConversationState::Wizard(WizardRecord::new(Flow::ResetConfirm))).await.unwrap();

        assert_eq!(sweep_idle(&store, Duration::from_secs(u64::MAX)).await, 0);
        assert_eq!(store.len().await, 1);
    }
}
