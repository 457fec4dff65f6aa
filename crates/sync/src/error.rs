//! Error taxonomy for the sync engine and its collaborators.

use cookbook_model::DecodeError;
use thiserror::Error;

use crate::scope::CollectionPath;

/// Faults raised by the remote collection change feed.
#[derive(Debug, Error)]
pub enum FeedError {
	/// The feed could not be reached.
	#[error("change feed unavailable: {0}")]
	Unavailable(String),
	/// The active identity may not read the collection.
	#[error("permission denied for collection {0}")]
	PermissionDenied(CollectionPath),
}

/// Faults raised by document queries and writes.
#[derive(Debug, Error)]
pub enum StoreError {
	/// The backend rejected or failed the operation.
	#[error("document store request failed: {0}")]
	Backend(String),
	/// The active identity may not touch the collection.
	#[error("permission denied for collection {0}")]
	PermissionDenied(CollectionPath),
	/// The document body could not be encoded.
	#[error("failed to encode document: {0}")]
	Encode(#[from] serde_json::Error),
}

/// Identity establishment failures.
#[derive(Debug, Error)]
pub enum AuthError {
	/// Email/password pair was rejected.
	#[error("invalid email or password")]
	InvalidCredentials,
	/// Sign-up attempted for an email that already has an account.
	#[error("an account already exists for {0}")]
	EmailInUse(String),
	/// The identity provider could not complete the request.
	#[error("identity provider failed: {0}")]
	Provider(String),
}

/// The resolver could not produce a collection path.
#[derive(Debug, Error)]
pub enum ResolveError {
	/// No usable identity and no fallback path configured.
	#[error("no usable identity and no fallback collection configured")]
	NoIdentity,
}

/// Failures of a scope switch.
#[derive(Debug, Error)]
pub enum ScopeError {
	#[error(transparent)]
	Resolve(#[from] ResolveError),
	#[error("failed to subscribe to {path}: {source}")]
	Subscribe {
		/// Path the subscription was attempted for.
		path: CollectionPath,
		#[source]
		source: FeedError,
	},
}

/// Failures surfaced by the mutation gateway.
///
/// `Duplicate` and `Write` are kept apart so callers can tell "already
/// exists" from "failed to save".
#[derive(Debug, Error)]
pub enum MutationError {
	/// A recipe with the same external id already exists in scope.
	#[error("a recipe with external id {external_id} already exists")]
	Duplicate {
		/// The conflicting external id.
		external_id: String,
	},
	/// The draft fails the recipe invariants.
	#[error("invalid recipe: {0}")]
	Invalid(#[from] DecodeError),
	/// The duplicate check query failed.
	#[error("duplicate check failed: {0}")]
	Query(#[source] StoreError),
	/// The write or delete failed.
	#[error("failed to save: {0}")]
	Write(#[source] StoreError),
	/// No collection scope is active.
	#[error("no active collection scope")]
	NoScope,
}

impl MutationError {
	/// Returns true for the "already exists" outcome.
	pub const fn is_duplicate(&self) -> bool {
		matches!(self, Self::Duplicate { .. })
	}
}
