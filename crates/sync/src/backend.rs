//! Seams to the managed document database and identity service.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, watch};

use crate::change::ChangeBatch;
use crate::error::{AuthError, FeedError, StoreError};
use crate::identity::Identity;
use crate::scope::CollectionPath;

/// Live subscription to one collection.
///
/// Dropping the subscription tears it down; the feed stops delivering once
/// it observes the closed channel.
#[derive(Debug)]
pub struct FeedSubscription {
	batches: mpsc::UnboundedReceiver<Result<ChangeBatch, FeedError>>,
}

impl FeedSubscription {
	/// Wraps the receiving end of a feed channel.
	pub fn new(batches: mpsc::UnboundedReceiver<Result<ChangeBatch, FeedError>>) -> Self {
		Self { batches }
	}

	/// Next batch or stream fault; `None` once the feed has closed.
	pub async fn next(&mut self) -> Option<Result<ChangeBatch, FeedError>> {
		self.batches.recv().await
	}
}

/// Remote collection change feed.
#[async_trait]
pub trait ChangeFeed: Send + Sync {
	/// Subscribes to `path`. The first batch describes the current contents
	/// as `added` events.
	async fn subscribe(&self, path: &CollectionPath) -> Result<FeedSubscription, FeedError>;
}

/// Query and write access to document collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
	/// Ids of documents in `path` whose string `field` equals `value`.
	async fn find_by_field(&self, path: &CollectionPath, field: &str, value: &str) -> Result<Vec<String>, StoreError>;

	/// Writes a new document and returns its assigned id.
	async fn add_document(&self, path: &CollectionPath, body: Value) -> Result<String, StoreError>;

	/// Deletes a document; deleting a missing document succeeds.
	async fn delete_document(&self, path: &CollectionPath, id: &str) -> Result<(), StoreError>;
}

/// External identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
	fn current(&self) -> Option<Identity>;

	/// Receiver that observes every identity change, including sign-out.
	fn watch(&self) -> watch::Receiver<Option<Identity>>;

	async fn sign_in_anonymously(&self) -> Result<Identity, AuthError>;

	async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

	async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

	async fn sign_out(&self) -> Result<(), AuthError>;
}
