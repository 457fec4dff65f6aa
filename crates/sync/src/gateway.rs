//! Writes against the active recipe collection.

use std::sync::Arc;

use cookbook_model::{Recipe, RecipeDraft};
use tracing::{debug, info, warn};

use crate::backend::DocumentStore;
use crate::engine::RecipeSync;
use crate::error::{MutationError, StoreError};

/// Document field holding the upstream recipe id.
pub const EXTERNAL_ID_FIELD: &str = "externalId";

/// Adds and deletes recipes in the collection the store is subscribed to.
///
/// Writes never touch the local list directly; the resulting change
/// arrives through the feed like any other remote change.
pub struct MutationGateway {
	sync: Arc<RecipeSync>,
	documents: Arc<dyn DocumentStore>,
}

impl MutationGateway {
	/// Creates a gateway writing to the engine's current scope.
	pub fn new(sync: Arc<RecipeSync>, documents: Arc<dyn DocumentStore>) -> Self {
		Self { sync, documents }
	}

	/// Persists `draft` unless a recipe with the same external id already
	/// exists in scope.
	///
	/// Drafts without an external id skip the duplicate check. The check and
	/// the write are not atomic; two concurrent adds of the same external id
	/// can both succeed.
	pub async fn add_recipe(&self, draft: RecipeDraft) -> Result<Recipe, MutationError> {
		draft.validate()?;
		let path = self.sync.current_path().ok_or(MutationError::NoScope)?;

		if !draft.external_id.is_empty() {
			let existing = self
				.documents
				.find_by_field(&path, EXTERNAL_ID_FIELD, &draft.external_id)
				.await
				.map_err(|error| {
					warn!(%path, external_id = %draft.external_id, %error, "duplicate check failed");
					MutationError::Query(error)
				})?;
			if !existing.is_empty() {
				debug!(%path, external_id = %draft.external_id, "recipe already exists");
				return Err(MutationError::Duplicate {
					external_id: draft.external_id,
				});
			}
		}

		let body = draft.to_document().map_err(|error| MutationError::Write(StoreError::Encode(error)))?;
		let id = self.documents.add_document(&path, body).await.map_err(|error| {
			warn!(%path, name = %draft.name, %error, "recipe write failed");
			MutationError::Write(error)
		})?;
		info!(%path, %id, name = %draft.name, "recipe saved");
		Ok(Recipe::from_draft(id, draft))
	}

	/// Deletes the document `id` from the active collection.
	///
	/// An empty id does nothing and succeeds.
	pub async fn delete_recipe(&self, id: &str) -> Result<(), MutationError> {
		if id.is_empty() {
			debug!("ignoring delete with empty recipe id");
			return Ok(());
		}
		let path = self.sync.current_path().ok_or(MutationError::NoScope)?;
		self.documents.delete_document(&path, id).await.map_err(|error| {
			warn!(%path, id, %error, "recipe delete failed");
			MutationError::Write(error)
		})?;
		info!(%path, id, "recipe deleted");
		Ok(())
	}
}
