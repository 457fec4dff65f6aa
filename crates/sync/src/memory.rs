//! In-process backend implementing the feed, document store and identity seams.
//!
//! Documents in a collection are ordered by document id, so change indices
//! are deterministic. Every write emits one batch to each live subscription
//! on the written path. Fault injection hooks let tests exercise failure paths.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::backend::{ChangeFeed, DocumentStore, FeedSubscription, IdentityProvider};
use crate::change::{ChangeBatch, DocumentChange};
use crate::error::{AuthError, FeedError, StoreError};
use crate::identity::Identity;
use crate::scope::CollectionPath;

type BatchSender = mpsc::UnboundedSender<Result<ChangeBatch, FeedError>>;

#[derive(Default)]
struct Collection {
	documents: BTreeMap<String, Value>,
	subscribers: Vec<BatchSender>,
}

impl Collection {
	fn position(&self, id: &str) -> usize {
		self.documents.keys().take_while(|key| key.as_str() < id).count()
	}

	fn emit(&mut self, batch: ChangeBatch) {
		self.subscribers.retain(|tx| tx.send(Ok(batch.clone())).is_ok());
	}
}

#[derive(Default)]
struct Faults {
	subscribe: Option<FeedError>,
	write: Option<StoreError>,
	query: Option<StoreError>,
}

#[derive(Default)]
struct State {
	collections: HashMap<CollectionPath, Collection>,
	faults: Faults,
}

/// Shared in-memory document database.
#[derive(Clone, Default)]
pub struct MemoryBackend {
	state: Arc<Mutex<State>>,
}

impl MemoryBackend {
	/// Creates an empty backend.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates or replaces a document, emitting `added` or `modified`.
	pub fn set_document(&self, path: &CollectionPath, id: &str, body: Value) {
		let mut state = self.state.lock();
		let collection = state.collections.entry(path.clone()).or_default();
		let change = if collection.documents.contains_key(id) {
			let old_index = collection.position(id);
			collection.documents.insert(id.to_string(), body.clone());
			DocumentChange::modified(id, body, old_index, collection.position(id))
		} else {
			collection.documents.insert(id.to_string(), body.clone());
			DocumentChange::added(id, body, collection.position(id))
		};
		collection.emit(vec![change]);
	}

	/// Removes a document, emitting `removed` if it existed.
	pub fn remove_document(&self, path: &CollectionPath, id: &str) -> bool {
		let mut state = self.state.lock();
		let Some(collection) = state.collections.get_mut(path) else {
			return false;
		};
		if !collection.documents.contains_key(id) {
			return false;
		}
		let old_index = collection.position(id);
		collection.documents.remove(id);
		collection.emit(vec![DocumentChange::removed(id, old_index)]);
		true
	}

	/// Sends a raw batch to every subscriber of `path`.
	pub fn push_batch(&self, path: &CollectionPath, batch: ChangeBatch) {
		let mut state = self.state.lock();
		state.collections.entry(path.clone()).or_default().emit(batch);
	}

	/// Sends a stream fault to every subscriber of `path`.
	pub fn push_fault(&self, path: &CollectionPath, fault: impl Fn() -> FeedError) {
		let mut state = self.state.lock();
		if let Some(collection) = state.collections.get_mut(path) {
			collection.subscribers.retain(|tx| tx.send(Err(fault())).is_ok());
		}
	}

	/// Document ids and bodies of `path`, in id order.
	pub fn documents(&self, path: &CollectionPath) -> Vec<(String, Value)> {
		self.state
			.lock()
			.collections
			.get(path)
			.map(|c| c.documents.iter().map(|(id, body)| (id.clone(), body.clone())).collect())
			.unwrap_or_default()
	}

	/// Live subscriptions on `path`.
	pub fn subscriber_count(&self, path: &CollectionPath) -> usize {
		self.state
			.lock()
			.collections
			.get(path)
			.map_or(0, |c| c.subscribers.iter().filter(|tx| !tx.is_closed()).count())
	}

	/// Makes the next subscription fail with `fault`.
	pub fn fail_next_subscribe(&self, fault: FeedError) {
		self.state.lock().faults.subscribe = Some(fault);
	}

	/// Makes the next document write fail with `fault`.
	pub fn fail_next_write(&self, fault: StoreError) {
		self.state.lock().faults.write = Some(fault);
	}

	/// Makes the next duplicate query fail with `fault`.
	pub fn fail_next_query(&self, fault: StoreError) {
		self.state.lock().faults.query = Some(fault);
	}
}

#[async_trait]
impl ChangeFeed for MemoryBackend {
	async fn subscribe(&self, path: &CollectionPath) -> Result<FeedSubscription, FeedError> {
		let mut state = self.state.lock();
		if let Some(fault) = state.faults.subscribe.take() {
			return Err(fault);
		}
		let collection = state.collections.entry(path.clone()).or_default();
		let (tx, rx) = mpsc::unbounded_channel();
		let initial: ChangeBatch = collection
			.documents
			.iter()
			.enumerate()
			.map(|(index, (id, body))| DocumentChange::added(id.clone(), body.clone(), index))
			.collect();
		if tx.send(Ok(initial)).is_ok() {
			collection.subscribers.push(tx);
		}
		debug!(%path, "memory feed subscribed");
		Ok(FeedSubscription::new(rx))
	}
}

#[async_trait]
impl DocumentStore for MemoryBackend {
	async fn find_by_field(&self, path: &CollectionPath, field: &str, value: &str) -> Result<Vec<String>, StoreError> {
		let mut state = self.state.lock();
		if let Some(fault) = state.faults.query.take() {
			return Err(fault);
		}
		Ok(state
			.collections
			.get(path)
			.map(|c| {
				c.documents
					.iter()
					.filter(|(_, body)| body.get(field).and_then(Value::as_str) == Some(value))
					.map(|(id, _)| id.clone())
					.collect()
			})
			.unwrap_or_default())
	}

	async fn add_document(&self, path: &CollectionPath, body: Value) -> Result<String, StoreError> {
		if let Some(fault) = self.state.lock().faults.write.take() {
			return Err(fault);
		}
		let id = uuid::Uuid::new_v4().simple().to_string();
		self.set_document(path, &id, body);
		Ok(id)
	}

	async fn delete_document(&self, path: &CollectionPath, id: &str) -> Result<(), StoreError> {
		if let Some(fault) = self.state.lock().faults.write.take() {
			return Err(fault);
		}
		self.remove_document(path, id);
		Ok(())
	}
}

struct Account {
	uid: String,
	password: String,
}

/// In-memory identity provider with email/password accounts.
pub struct MemoryIdentity {
	accounts: Mutex<HashMap<String, Account>>,
	current: watch::Sender<Option<Identity>>,
	fail_anonymous: Mutex<Option<AuthError>>,
}

impl Default for MemoryIdentity {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryIdentity {
	/// Creates a provider with no current identity.
	pub fn new() -> Self {
		let (current, _) = watch::channel(None);
		Self {
			accounts: Mutex::new(HashMap::new()),
			current,
			fail_anonymous: Mutex::new(None),
		}
	}

	/// Replaces the current identity as if the provider changed it on its own.
	pub fn set_identity(&self, identity: Option<Identity>) {
		self.current.send_replace(identity);
	}

	/// Makes the next anonymous sign-in fail with `fault`.
	pub fn fail_next_anonymous(&self, fault: AuthError) {
		*self.fail_anonymous.lock() = Some(fault);
	}
}

fn new_uid() -> String {
	uuid::Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
	fn current(&self) -> Option<Identity> {
		self.current.borrow().clone()
	}

	fn watch(&self) -> watch::Receiver<Option<Identity>> {
		self.current.subscribe()
	}

	async fn sign_in_anonymously(&self) -> Result<Identity, AuthError> {
		if let Some(fault) = self.fail_anonymous.lock().take() {
			return Err(fault);
		}
		let identity = Identity::anonymous(new_uid());
		self.current.send_replace(Some(identity.clone()));
		Ok(identity)
	}

	async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
		let identity = {
			let accounts = self.accounts.lock();
			match accounts.get(email) {
				Some(account) if account.password == password => Identity::user(account.uid.clone(), email),
				_ => return Err(AuthError::InvalidCredentials),
			}
		};
		self.current.send_replace(Some(identity.clone()));
		Ok(identity)
	}

	async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
		let identity = {
			let mut accounts = self.accounts.lock();
			if accounts.contains_key(email) {
				return Err(AuthError::EmailInUse(email.to_string()));
			}
			let uid = new_uid();
			accounts.insert(
				email.to_string(),
				Account {
					uid: uid.clone(),
					password: password.to_string(),
				},
			);
			Identity::user(uid, email)
		};
		self.current.send_replace(Some(identity.clone()));
		Ok(identity)
	}

	async fn sign_out(&self) -> Result<(), AuthError> {
		self.current.send_replace(None);
		Ok(())
	}
}
