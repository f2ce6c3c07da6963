use std::env;
use std::fs;
use std::process::Command;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::FeedtuiError;
use crate::models::client::{FeedClient, FeedTransport, Session};
use crate::models::config::Config;
use crate::models::guard::MutationGuard;
use crate::models::post::{annotate, Post};
use crate::models::store::{FeedStore, LikePatch};

/// What happened to a requested mutation. `Rejected` means an earlier
/// mutation on the same entity is still in flight; the request was dropped
/// without touching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    Rejected,
}

/// The mutation/reconciliation engine. Applies speculative local updates
/// for likes, serializes mutations per entity, and re-pulls the
/// authoritative feed after every mutation, successful or not.
///
/// Cheap to clone; clones share the store and guard, so the TUI can spawn
/// mutations without blocking the event loop.
pub struct FeedEngine<T: FeedTransport> {
    transport: Arc<T>,
    session: Session,
    store: Arc<Mutex<FeedStore>>,
    guard: Arc<Mutex<MutationGuard>>,
}

impl<T: FeedTransport> Clone for FeedEngine<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            session: self.session.clone(),
            store: Arc::clone(&self.store),
            guard: Arc::clone(&self.guard),
        }
    }
}

impl<T: FeedTransport> FeedEngine<T> {
    pub fn new(transport: T, session: Session) -> Self {
        Self {
            transport: Arc::new(transport),
            session,
            store: Arc::new(Mutex::new(FeedStore::new())),
            guard: Arc::new(Mutex::new(MutationGuard::new())),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Snapshot of the working set for rendering.
    pub async fn posts(&self) -> Vec<Post> {
        self.store.lock().await.posts().to_vec()
    }

    pub async fn is_in_flight(&self, entity_id: &str) -> bool {
        self.guard.lock().await.is_in_flight(entity_id)
    }

    /// Fetch the full feed, newest first, annotate it for the current
    /// viewer and swap it into the store. The single source of truth after
    /// every mutation; a failure here leaves the previous (stale) contents
    /// in place.
    pub async fn reconcile(&self) -> Result<(), FeedtuiError> {
        let raw = self.transport.fetch_posts(&self.session).await?;
        let viewer = self.session.viewer();
        let posts: Vec<Post> = raw
            .into_iter()
            .rev()
            .map(|p| annotate(p, viewer))
            .collect();
        self.store.lock().await.replace_all(posts);
        Ok(())
    }

    /// Toggle the viewer's like on a post: flip `has_liked` and adjust the
    /// count locally first, then confirm with the server. The prediction is
    /// never trusted as final; every path ends in a reconcile.
    pub async fn toggle_like(&self, post_id: &str) -> Result<MutationOutcome, FeedtuiError> {
        if self.session.viewer().is_none() {
            return Err(FeedtuiError::Auth(
                "liking requires a signed-in viewer".to_string(),
            ));
        }

        let admitted = self.guard.lock().await.try_admit(post_id);
        if !admitted {
            return Ok(MutationOutcome::Rejected);
        }

        {
            let mut store = self.store.lock().await;
            if let Some(post) = store.get(post_id) {
                let patch = if post.has_liked {
                    LikePatch {
                        has_liked: false,
                        like_count: post.like_count.saturating_sub(1),
                    }
                } else {
                    LikePatch {
                        has_liked: true,
                        like_count: post.like_count + 1,
                    }
                };
                store.apply_patch(post_id, patch);
            }
        }

        let sent = self.transport.toggle_like(&self.session, post_id).await;
        self.finish_mutation(post_id, "like").await;
        sent.map(|_| MutationOutcome::Applied)
    }

    /// Publish a new post. No entity exists yet, so there is nothing to
    /// guard and nothing to predict; just call and reconcile.
    pub async fn create_post(&self, content: &str) -> Result<(), FeedtuiError> {
        let sent = self.transport.create_post(&self.session, content).await;
        if let Err(e) = self.reconcile().await {
            log::warn!("reconcile after create post failed: {}", e);
        }
        sent
    }

    pub async fn delete_post(&self, post_id: &str) -> Result<MutationOutcome, FeedtuiError> {
        let admitted = self.guard.lock().await.try_admit(post_id);
        if !admitted {
            return Ok(MutationOutcome::Rejected);
        }
        let sent = self.transport.delete_post(&self.session, post_id).await;
        self.finish_mutation(post_id, "delete post").await;
        sent.map(|_| MutationOutcome::Applied)
    }

    /// Comment creation mutates the parent post's comment list, so the
    /// guard key is the parent post id.
    pub async fn create_comment(
        &self,
        post_id: &str,
        content: &str,
    ) -> Result<MutationOutcome, FeedtuiError> {
        let admitted = self.guard.lock().await.try_admit(post_id);
        if !admitted {
            return Ok(MutationOutcome::Rejected);
        }
        let sent = self
            .transport
            .create_comment(&self.session, post_id, content)
            .await;
        self.finish_mutation(post_id, "comment").await;
        sent.map(|_| MutationOutcome::Applied)
    }

    pub async fn delete_comment(
        &self,
        comment_id: &str,
    ) -> Result<MutationOutcome, FeedtuiError> {
        let admitted = self.guard.lock().await.try_admit(comment_id);
        if !admitted {
            return Ok(MutationOutcome::Rejected);
        }
        let sent = self.transport.delete_comment(&self.session, comment_id).await;
        self.finish_mutation(comment_id, "delete comment").await;
        sent.map(|_| MutationOutcome::Applied)
    }

    // Reconcile, then release the guard; the order matters. A failed
    // reconcile keeps the stale store until the next successful one.
    async fn finish_mutation(&self, entity_id: &str, action: &str) {
        if let Err(e) = self.reconcile().await {
            log::warn!("reconcile after {} failed: {}", action, e);
        }
        self.guard.lock().await.release(entity_id);
    }
}

/// Fill in a missing viewer id from the service before the engine starts,
/// and persist it so the next launch skips the round trip.
pub async fn init_session(client: &FeedClient, config: &mut Config) -> Result<(), FeedtuiError> {
    if config.token.is_some() && config.viewer_id.is_none() {
        let viewer = client.fetch_viewer(&config.session()).await?;
        config.viewer_id = Some(viewer.id);
        config.save()?;
    }
    Ok(())
}

/// Open `$EDITOR` on a scratch file and return what the user wrote.
pub fn compose_via_editor() -> Result<String, FeedtuiError> {
    let editor = env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    let mut temp_path = env::temp_dir();
    temp_path.push("feedtui-draft");

    let status = Command::new(editor).arg(&temp_path).status()?;

    if !status.success() {
        return Err(FeedtuiError::Io(
            "Editor exited with non-zero status".to_string(),
        ));
    }

    let content = fs::read_to_string(&temp_path)?;
    let _ = fs::remove_file(&temp_path);
    Ok(content)
}
