//! Application-level context wiring the store, scope sync and gateway together.

use std::sync::Arc;

use cookbook_config::ScopeConfig;
use cookbook_model::{Recipe, RecipeDraft};
use tracing::{error, info, warn};

use crate::backend::{ChangeFeed, DocumentStore, IdentityProvider};
use crate::engine::{RecipeSync, ScopeWatcher};
use crate::error::{AuthError, MutationError};
use crate::gateway::MutationGateway;
use crate::identity::Identity;
use crate::listener::StoreListener;
use crate::scope::{CollectionPath, PathResolver};
use crate::store::RecipeStore;

/// One running cookbook: a recipe store kept in sync with the collection of
/// whichever identity is signed in.
///
/// Constructed once at startup and passed to whatever needs it. Identity
/// changes made through this handle or by the provider itself re-scope the
/// store.
pub struct Cookbook {
	identity: Arc<dyn IdentityProvider>,
	sync: Arc<RecipeSync>,
	gateway: MutationGateway,
	watcher: ScopeWatcher,
}

impl Cookbook {
	/// Establishes an identity and subscribes to its collection.
	///
	/// If the provider has no identity yet, an anonymous session is started.
	/// Failure to establish that session is fatal. A failed initial
	/// subscription is logged; the watcher retries on the next identity
	/// change.
	pub async fn start(
		scope: &ScopeConfig,
		identity: Arc<dyn IdentityProvider>,
		feed: Arc<dyn ChangeFeed>,
		documents: Arc<dyn DocumentStore>,
	) -> Result<Self, AuthError> {
		let mut identities = identity.watch();
		let current = match identity.current() {
			Some(current) => current,
			None => identity.sign_in_anonymously().await.inspect_err(|error| {
				error!(%error, "anonymous sign-in failed");
			})?,
		};
		identities.borrow_and_update();

		let store = Arc::new(RecipeStore::new());
		let sync = Arc::new(RecipeSync::new(store, feed, PathResolver::new(scope)));
		if let Err(error) = sync.switch_scope(Some(&current)).await {
			warn!(%error, "initial scope switch failed");
		}
		let watcher = ScopeWatcher::spawn(Arc::clone(&sync), identities);
		let gateway = MutationGateway::new(Arc::clone(&sync), documents);
		info!(anonymous = current.is_anonymous(), "cookbook started");

		Ok(Self {
			identity,
			sync,
			gateway,
			watcher,
		})
	}

	/// Returns the synchronized recipe store.
	pub fn store(&self) -> &Arc<RecipeStore> {
		self.sync.store()
	}

	/// Returns the sync engine.
	pub fn sync(&self) -> &Arc<RecipeSync> {
		&self.sync
	}

	/// Returns the mutation gateway.
	pub fn gateway(&self) -> &MutationGateway {
		&self.gateway
	}

	/// Returns the current identity, if any.
	pub fn identity(&self) -> Option<Identity> {
		self.identity.current()
	}

	/// Returns the collection currently subscribed to.
	pub fn current_path(&self) -> Option<CollectionPath> {
		self.sync.current_path()
	}

	/// Registers `listener` with the store; see [`RecipeStore::add_listener`].
	pub fn add_listener<L: StoreListener + 'static>(&self, listener: &Arc<L>) {
		self.store().add_listener(listener);
	}

	/// Unregisters `listener` from the store.
	pub fn remove_listener<L: StoreListener + 'static>(&self, listener: &Arc<L>) {
		self.store().remove_listener(listener);
	}

	/// Looks up a synced recipe by document id.
	pub fn find_by_id(&self, id: &str) -> Option<Recipe> {
		self.store().find_by_id(id)
	}

	/// Saves `draft` unless its external id is already present.
	pub async fn add_recipe(&self, draft: RecipeDraft) -> Result<Recipe, MutationError> {
		self.gateway.add_recipe(draft).await
	}

	/// Deletes the recipe with document id `id`.
	pub async fn delete_recipe(&self, id: &str) -> Result<(), MutationError> {
		self.gateway.delete_recipe(id).await
	}

	/// Signs in with credentials. On failure the current scope is kept.
	pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
		let identity = self.identity.sign_in(email, password).await.inspect_err(|error| {
			warn!(%error, "sign-in failed");
		})?;
		self.rescope(&identity).await;
		Ok(identity)
	}

	/// Creates an account and signs in with it. On failure the current scope is kept.
	pub async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
		let identity = self.identity.sign_up(email, password).await.inspect_err(|error| {
			warn!(%error, "sign-up failed");
		})?;
		self.rescope(&identity).await;
		Ok(identity)
	}

	/// Signs out; the store moves to the fallback collection if one is configured.
	pub async fn sign_out(&self) -> Result<(), AuthError> {
		self.identity.sign_out().await.inspect_err(|error| {
			warn!(%error, "sign-out failed");
		})?;
		if let Err(error) = self.sync.switch_scope(None).await {
			warn!(%error, "scope switch after sign-out failed");
		}
		Ok(())
	}

	/// Stops following identity changes and tears down the subscription.
	pub async fn shutdown(&self) {
		self.watcher.stop();
		self.sync.shutdown().await;
	}

	async fn rescope(&self, identity: &Identity) {
		if let Err(error) = self.sync.switch_scope(Some(identity)).await {
			warn!(%error, "scope switch after sign-in failed");
		}
	}
}

#[cfg(test)]
mod tests;
