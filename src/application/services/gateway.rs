use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::errors::{BotError, CommandError};
use crate::application::services::board_sync::BoardSync;
use crate::application::services::list_store::ListStore;
use crate::application::services::renderer::BoardRenderer;
use crate::domain::entities::{BoardTarget, DisplayPayload, Entry, ListName, User};
use crate::domain::traits::AuthorizationPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Append,
    Remove,
}

impl Mutation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mutation::Append => "append",
            Mutation::Remove => "remove",
        }
    }
}

/// What an accepted mutation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    pub list: ListName,
    pub mutation: Mutation,
    pub entry: String,
}

impl fmt::Display for MutationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mutation {
            Mutation::Append => write!(f, "Added to {}: {}", self.list, self.entry),
            Mutation::Remove => write!(f, "Removed from {}: {}", self.list, self.entry),
        }
    }
}

/// Entry point for every board command.
///
/// Mutations run one at a time: mutate, render, push, persist. A failed push
/// undoes the in-memory change; a failed persist leaves memory and board
/// updated and is reported as `PersistFailed`.
pub struct CommandGateway {
    lists: ListStore,
    renderer: BoardRenderer,
    sync: BoardSync,
    policy: Arc<dyn AuthorizationPolicy>,
    writer: Mutex<()>,
}

impl CommandGateway {
    pub fn new(lists: ListStore, sync: BoardSync, policy: Arc<dyn AuthorizationPolicy>) -> Self {
        Self {
            lists,
            renderer: BoardRenderer::new(),
            sync,
            policy,
            writer: Mutex::new(()),
        }
    }

    pub fn lists(&self) -> &ListStore {
        &self.lists
    }

    pub fn sync(&self) -> &BoardSync {
        &self.sync
    }

    /// Load lists from disk, make sure the board exists and bring it up to date
    pub async fn start(&self) -> Result<BoardTarget, BotError> {
        let _guard = self.writer.lock().await;

        self.lists.load_all().await?;
        let payload = self.render_board().await;
        let target = self.sync.ensure_target(&payload).await?;
        self.sync.push(&payload).await?;
        for name in ListName::ALL {
            self.lists.persist(name).await?;
        }

        tracing::info!(
            "Board ready in channel {} (message {})",
            target.channel_id,
            target.message_id
        );
        Ok(target)
    }

    pub async fn handle_mutation(
        &self,
        caller: &User,
        list: ListName,
        mutation: Mutation,
        entry: &str,
    ) -> Result<MutationOutcome, CommandError> {
        if !self.policy.is_authorized(caller) {
            tracing::warn!(
                "Rejected {} on {} from unauthorized user {}",
                mutation.as_str(),
                list.as_str(),
                caller.id
            );
            return Err(CommandError::Unauthorized(list));
        }
        // New entries are normalized; removal matches the stored text exactly
        let appended = match mutation {
            Mutation::Append => Some(Entry::parse(entry).ok_or(CommandError::InvalidEntry)?),
            Mutation::Remove => None,
        };

        let _guard = self.writer.lock().await;
        let previous = self.lists.snapshot(list).await;

        let entry = match appended {
            Some(appended) => {
                self.lists.append(list, appended.clone()).await;
                appended.into_inner()
            }
            None => {
                self.lists.remove(list, entry).await?;
                entry.to_string()
            }
        };

        let payload = self.render_board().await;
        if let Err(source) = self.sync.push(&payload).await {
            self.lists.replace(list, previous.entries().to_vec()).await;
            tracing::error!("Board push failed, reverted {} on {}: {}", mutation.as_str(), list.as_str(), source);
            return Err(CommandError::PushFailed { list, source });
        }

        if let Err(source) = self.lists.persist(list).await {
            tracing::error!("Saving {} failed, disk no longer matches the board: {}", list.as_str(), source);
            return Err(CommandError::PersistFailed { list, source });
        }

        let outcome = MutationOutcome { list, mutation, entry };
        tracing::info!("{} (by {})", outcome, caller);
        Ok(outcome)
    }

    /// Render one list as it currently stands. Open to everyone.
    pub async fn handle_query(&self, list: ListName) -> DisplayPayload {
        let snapshot = self.lists.snapshot(list).await;
        self.renderer.render_list(list, snapshot.entries())
    }

    async fn render_board(&self) -> DisplayPayload {
        let ally = self.lists.snapshot(ListName::Ally).await;
        let enemies = self.lists.snapshot(ListName::Enemies).await;
        self.renderer.render(ally.entries(), enemies.entries())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::board_sync::SyncState;
    use crate::application::services::renderer::EMPTY_MARKER;
    use crate::application::services::testing::{MemoryStore, RecordingChannel};
    use crate::domain::traits::SinglePrincipal;

    const OWNER: &str = "1372549650225168436";

    struct Harness {
        channel: Arc<RecordingChannel>,
        store: Arc<MemoryStore>,
        gateway: Arc<CommandGateway>,
    }

    async fn started() -> Harness {
        let channel = Arc::new(RecordingChannel::new());
        let store = Arc::new(MemoryStore::new());
        let gateway = Arc::new(CommandGateway::new(
            ListStore::new(store.clone()),
            BoardSync::new(channel.clone(), store.clone(), 77),
            Arc::new(SinglePrincipal::new(OWNER)),
        ));
        gateway.start().await.unwrap();
        Harness { channel, store, gateway }
    }

    fn owner() -> User {
        User::new(OWNER)
    }

    #[tokio::test]
    async fn test_start_creates_and_syncs_board() {
        let h = started().await;

        assert_eq!(h.channel.sent_count(), 1);
        assert_eq!(h.channel.edit_count(), 1);
        assert_eq!(h.gateway.sync().state().await, SyncState::Synced);
    }

    #[tokio::test]
    async fn test_query_empty_list_shows_marker() {
        let h = started().await;

        let payload = h.gateway.handle_query(ListName::Ally).await;

        assert_eq!(payload.description.as_deref(), Some(EMPTY_MARKER));
    }

    #[tokio::test]
    async fn test_adds_render_in_order() {
        let h = started().await;

        h.gateway.handle_mutation(&owner(), ListName::Ally, Mutation::Append, "Nyx").await.unwrap();
        let outcome = h.gateway.handle_mutation(&owner(), ListName::Ally, Mutation::Append, "Vex").await.unwrap();

        assert_eq!(outcome.to_string(), "Added to Ally: Vex");
        let board = h.channel.last_edit().unwrap();
        assert_eq!(board.field("Ally").unwrap().value, "- Nyx\n- Vex");
        assert_eq!(board.field("Enemies").unwrap().value, EMPTY_MARKER);
        assert_eq!(h.store.saved(ListName::Ally).unwrap(), ["Nyx", "Vex"]);
    }

    #[tokio::test]
    async fn test_remove_missing_entry_triggers_nothing() {
        let h = started().await;
        h.gateway.handle_mutation(&owner(), ListName::Enemies, Mutation::Append, "Vex").await.unwrap();
        let edits_before = h.channel.edit_count();

        let err = h
            .gateway
            .handle_mutation(&owner(), ListName::Enemies, Mutation::Remove, "Drogath")
            .await
            .unwrap_err();

        assert!(matches!(err, CommandError::NotFound { .. }));
        assert_eq!(h.channel.edit_count(), edits_before);
        assert_eq!(h.gateway.lists().snapshot(ListName::Enemies).await.entries(), ["Vex"]);
        assert_eq!(h.store.saved(ListName::Enemies).unwrap(), ["Vex"]);
    }

    #[tokio::test]
    async fn test_remove_matches_stored_text_exactly() {
        let h = started().await;
        h.gateway.handle_mutation(&owner(), ListName::Ally, Mutation::Append, "  Nyx  ").await.unwrap();
        let edits_before = h.channel.edit_count();

        let err = h
            .gateway
            .handle_mutation(&owner(), ListName::Ally, Mutation::Remove, "  Nyx  ")
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::NotFound { ref entry, .. } if entry == "  Nyx  "));
        assert_eq!(h.gateway.lists().snapshot(ListName::Ally).await.entries(), ["Nyx"]);
        assert_eq!(h.channel.edit_count(), edits_before);

        let outcome = h
            .gateway
            .handle_mutation(&owner(), ListName::Ally, Mutation::Remove, "Nyx")
            .await
            .unwrap();
        assert_eq!(outcome.to_string(), "Removed from Ally: Nyx");
        assert!(h.gateway.lists().snapshot(ListName::Ally).await.is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_caller_changes_nothing() {
        let h = started().await;
        let edits_before = h.channel.edit_count();
        let stranger = User::new("42").with_username("mallory");

        for mutation in [Mutation::Append, Mutation::Remove] {
            let err = h
                .gateway
                .handle_mutation(&stranger, ListName::Ally, mutation, "Nyx")
                .await
                .unwrap_err();
            assert!(matches!(err, CommandError::Unauthorized(ListName::Ally)));
        }

        assert!(h.gateway.lists().snapshot(ListName::Ally).await.is_empty());
        assert_eq!(h.channel.edit_count(), edits_before);
        assert_eq!(h.channel.sent_count(), 1);
        assert_eq!(h.store.saved(ListName::Ally).unwrap(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_blank_entry_rejected() {
        let h = started().await;

        let err = h
            .gateway
            .handle_mutation(&owner(), ListName::Ally, Mutation::Append, "   ")
            .await
            .unwrap_err();

        assert!(matches!(err, CommandError::InvalidEntry));
        assert!(h.gateway.lists().snapshot(ListName::Ally).await.is_empty());
    }

    #[tokio::test]
    async fn test_push_failure_rolls_back() {
        let h = started().await;
        h.gateway.handle_mutation(&owner(), ListName::Ally, Mutation::Append, "Nyx").await.unwrap();
        h.channel.set_message_missing(true);

        let err = h
            .gateway
            .handle_mutation(&owner(), ListName::Ally, Mutation::Remove, "Nyx")
            .await
            .unwrap_err();

        assert!(matches!(err, CommandError::PushFailed { list: ListName::Ally, .. }));
        assert_eq!(h.gateway.lists().snapshot(ListName::Ally).await.entries(), ["Nyx"]);
        assert_eq!(h.store.saved(ListName::Ally).unwrap(), ["Nyx"]);
        assert_eq!(h.channel.sent_count(), 1);
    }

    #[tokio::test]
    async fn test_persist_failure_is_reported() {
        let h = started().await;
        h.store.set_fail_saves(true);

        let err = h
            .gateway
            .handle_mutation(&owner(), ListName::Enemies, Mutation::Append, "Drogath")
            .await
            .unwrap_err();

        assert!(matches!(err, CommandError::PersistFailed { list: ListName::Enemies, .. }));
        // The board and memory moved on; the disk did not
        assert_eq!(h.channel.last_edit().unwrap().field("Enemies").unwrap().value, "- Drogath");
        assert_eq!(h.gateway.lists().snapshot(ListName::Enemies).await.entries(), ["Drogath"]);
        assert_eq!(h.store.saved(ListName::Enemies).unwrap(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_concurrent_mutations_all_land() {
        let h = started().await;

        let mut handles = Vec::new();
        for i in 0..16 {
            let gateway = h.gateway.clone();
            handles.push(tokio::spawn(async move {
                gateway
                    .handle_mutation(&User::new(OWNER), ListName::Ally, Mutation::Append, &format!("entry-{}", i))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let memory = h.gateway.lists().snapshot(ListName::Ally).await;
        assert_eq!(memory.len(), 16);
        assert_eq!(h.store.saved(ListName::Ally).unwrap(), memory.entries());
        // Start's push plus one per mutation
        assert_eq!(h.channel.edit_count(), 17);
    }
}
