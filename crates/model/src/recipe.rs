use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{DecodeError, Ingredient, Result};

/// Recipe content before the store has assigned it a document id.
///
/// This is also the persisted document body: field names follow the stored
/// schema (`recipeName`, `thumbnail`, camelCase elsewhere).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
	/// Identifier in the originating public source; empty for manual entries.
	#[serde(default, deserialize_with = "null_as_default")]
	pub external_id: String,
	#[serde(rename = "recipeName", default, deserialize_with = "null_as_default")]
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub country: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub instructions: Option<String>,
	#[serde(rename = "thumbnail", default, skip_serializing_if = "Option::is_none")]
	pub thumbnail_url: Option<String>,
	/// Raw delimiter-separated tag text, kept unparsed.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tags: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tutorial_link: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source_link: Option<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub ingredients: Vec<Ingredient>,
}

impl RecipeDraft {
	/// Creates a draft with only the required fields set.
	pub fn new(external_id: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			external_id: external_id.into(),
			name: name.into(),
			..Self::default()
		}
	}

	/// Decodes and validates a stored document body.
	pub fn from_document(body: &Value) -> Result<Self> {
		let draft = Self::deserialize(body)?;
		draft.validate()?;
		Ok(draft)
	}

	/// Encodes the draft as a document body.
	pub fn to_document(&self) -> serde_json::Result<Value> {
		serde_json::to_value(self)
	}

	/// Checks the required-field invariants.
	pub fn validate(&self) -> Result<()> {
		if self.name.trim().is_empty() {
			return Err(DecodeError::MissingField("recipeName"));
		}
		if let Some(index) = self.ingredients.iter().position(|i| i.name.trim().is_empty()) {
			return Err(DecodeError::EmptyIngredient { index });
		}
		Ok(())
	}
}

/// A stored recipe, identified by its document id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
	/// Store-assigned document id, stable for the document's lifetime.
	pub id: String,
	pub external_id: String,
	pub name: String,
	pub category: Option<String>,
	pub country: Option<String>,
	pub instructions: Option<String>,
	pub thumbnail_url: Option<String>,
	pub tags: Option<String>,
	pub tutorial_link: Option<String>,
	pub source_link: Option<String>,
	pub ingredients: Vec<Ingredient>,
}

impl Recipe {
	/// Attaches a document id to draft content.
	pub fn from_draft(id: impl Into<String>, draft: RecipeDraft) -> Self {
		Self {
			id: id.into(),
			external_id: draft.external_id,
			name: draft.name,
			category: draft.category,
			country: draft.country,
			instructions: draft.instructions,
			thumbnail_url: draft.thumbnail_url,
			tags: draft.tags,
			tutorial_link: draft.tutorial_link,
			source_link: draft.source_link,
			ingredients: draft.ingredients,
		}
	}

	/// Decodes a document delivered by the store under `id`.
	pub fn from_document(id: impl Into<String>, body: &Value) -> Result<Self> {
		let id = id.into();
		if id.is_empty() {
			return Err(DecodeError::MissingField("id"));
		}
		Ok(Self::from_draft(id, RecipeDraft::from_document(body)?))
	}

	/// Returns the content of this recipe without its id.
	pub fn to_draft(&self) -> RecipeDraft {
		RecipeDraft {
			external_id: self.external_id.clone(),
			name: self.name.clone(),
			category: self.category.clone(),
			country: self.country.clone(),
			instructions: self.instructions.clone(),
			thumbnail_url: self.thumbnail_url.clone(),
			tags: self.tags.clone(),
			tutorial_link: self.tutorial_link.clone(),
			source_link: self.source_link.clone(),
			ingredients: self.ingredients.clone(),
		}
	}
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de> + Default,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
