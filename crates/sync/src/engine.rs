//! Scope switching and feed pumping for the recipe store.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::backend::{ChangeFeed, FeedSubscription};
use crate::error::ScopeError;
use crate::identity::Identity;
use crate::scope::{CollectionPath, PathResolver};
use crate::store::RecipeStore;
use crate::token::SubscriptionToken;

struct ActiveScope {
	path: CollectionPath,
	token: SubscriptionToken,
}

/// Keeps the [`RecipeStore`] subscribed to the collection of the active identity.
///
/// Each scope switch tears down the previous subscription, resets the store
/// (starting a new generation) and subscribes to the newly resolved path.
/// Batches from a superseded subscription are dropped by the store's
/// generation check, so records of two scopes never blend.
pub struct RecipeSync {
	store: Arc<RecipeStore>,
	feed: Arc<dyn ChangeFeed>,
	resolver: PathResolver,
	active: Mutex<Option<ActiveScope>>,
	path_tx: watch::Sender<Option<CollectionPath>>,
}

impl RecipeSync {
	/// Creates an idle engine; nothing is subscribed until a scope switch.
	pub fn new(store: Arc<RecipeStore>, feed: Arc<dyn ChangeFeed>, resolver: PathResolver) -> Self {
		let (path_tx, _) = watch::channel(None);
		Self {
			store,
			feed,
			resolver,
			active: Mutex::new(None),
			path_tx,
		}
	}

	/// Returns the store this engine feeds.
	pub fn store(&self) -> &Arc<RecipeStore> {
		&self.store
	}

	/// Path of the live subscription, if any.
	pub fn current_path(&self) -> Option<CollectionPath> {
		self.path_tx.borrow().clone()
	}

	/// Observes subscription path changes; `None` while switching or unsubscribed.
	pub fn watch_path(&self) -> watch::Receiver<Option<CollectionPath>> {
		self.path_tx.subscribe()
	}

	/// Re-targets the store at the collection for `identity`.
	///
	/// A switch that resolves to the path already subscribed is a no-op. On
	/// failure the store is left cleared and unsubscribed.
	pub async fn switch_scope(&self, identity: Option<&Identity>) -> Result<CollectionPath, ScopeError> {
		let mut active = self.active.lock().await;
		let resolved = self.resolver.resolve(identity);

		if let (Ok(path), Some(current)) = (&resolved, active.as_ref())
			&& current.path == *path
		{
			debug!(%path, "scope unchanged");
			return Ok(path.clone());
		}

		if let Some(previous) = active.take() {
			previous.token.cancel();
			debug!(path = %previous.path, generation = previous.token.generation(), "subscription discarded");
		}
		self.path_tx.send_replace(None);
		let generation = self.store.reset();

		let path = resolved?;
		let subscription = match self.feed.subscribe(&path).await {
			Ok(subscription) => subscription,
			Err(source) => {
				error!(%path, error = %source, "failed to subscribe to recipe collection");
				return Err(ScopeError::Subscribe { path, source });
			}
		};

		let token = SubscriptionToken::new(generation);
		tokio::spawn(pump(Arc::clone(&self.store), subscription, token.clone(), path.clone()));
		*active = Some(ActiveScope {
			path: path.clone(),
			token,
		});
		self.path_tx.send_replace(Some(path.clone()));
		info!(%path, generation, "subscribed to recipe collection");
		Ok(path)
	}

	/// Tears down the active subscription, leaving the list as it stands.
	pub async fn shutdown(&self) {
		if let Some(previous) = self.active.lock().await.take() {
			previous.token.cancel();
			debug!(path = %previous.path, "subscription shut down");
		}
		self.path_tx.send_replace(None);
	}
}

/// Applies batches from one subscription until it is cancelled, superseded or closed.
async fn pump(store: Arc<RecipeStore>, mut subscription: FeedSubscription, token: SubscriptionToken, path: CollectionPath) {
	loop {
		let next = tokio::select! {
			biased;
			() = token.cancelled() => break,
			next = subscription.next() => next,
		};
		match next {
			Some(Ok(batch)) => {
				let outcome = store.apply_batch(token.generation(), &batch);
				if outcome.stale {
					break;
				}
				trace!(%path, applied = outcome.applied, skipped = outcome.skipped, "change batch applied");
			}
			Some(Err(error)) => {
				warn!(%path, %error, "change feed fault, keeping current list");
			}
			None => {
				debug!(%path, "change feed closed");
				break;
			}
		}
	}
}

/// Drives scope switches from identity changes.
pub struct ScopeWatcher {
	cancel: CancellationToken,
}

impl ScopeWatcher {
	/// Spawns the watcher. Only changes after the receiver's last seen value
	/// trigger a switch.
	pub fn spawn(sync: Arc<RecipeSync>, mut identities: watch::Receiver<Option<Identity>>) -> Self {
		let cancel = CancellationToken::new();
		let stop = cancel.clone();
		tokio::spawn(async move {
			loop {
				tokio::select! {
					biased;
					() = stop.cancelled() => break,
					changed = identities.changed() => {
						if changed.is_err() {
							break;
						}
					}
				}
				let identity = identities.borrow_and_update().clone();
				debug!(?identity, "identity changed");
				sync.store().notify_identity(identity.as_ref());
				if let Err(error) = sync.switch_scope(identity.as_ref()).await {
					warn!(%error, "scope switch after identity change failed");
				}
			}
		});
		Self { cancel }
	}

	/// Stops following identity changes.
	pub fn stop(&self) {
		self.cancel.cancel();
	}
}

impl Drop for ScopeWatcher {
	fn drop(&mut self) {
		self.cancel.cancel();
	}
}
