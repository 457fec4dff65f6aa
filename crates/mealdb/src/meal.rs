//! Projection of raw source records into recipe drafts.
//!
//! Source records are flat objects whose ingredients are spread over numbered
//! key pairs (`strIngredient1`/`strMeasure1` up to `20`). Records are first
//! decoded into a generic string-keyed map and then projected field by field.

use cookbook_model::{DecodeError, Ingredient, RecipeDraft};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

/// Highest ingredient slot carried by a record.
pub const MAX_INGREDIENTS: usize = 20;

/// Top-level listing body. `meals` is `null` when nothing matched.
///
/// Non-object entries are skipped by [`into_drafts`](Self::into_drafts).
#[derive(Debug, Default, Deserialize)]
pub struct MealsResponse {
	#[serde(default)]
	pub meals: Option<Vec<Value>>,
}

impl MealsResponse {
	/// Parses a listing body.
	pub fn parse(body: &str) -> serde_json::Result<Self> {
		serde_json::from_str(body)
	}

	/// Projects every usable record, skipping and logging the rest.
	pub fn into_drafts(self) -> Vec<RecipeDraft> {
		self.meals
			.unwrap_or_default()
			.iter()
			.filter_map(|entry| {
				let Value::Object(record) = entry else {
					warn!(%entry, "skipping non-object recipe source record");
					return None;
				};
				match project(record) {
					Ok(draft) => Some(draft),
					Err(error) => {
						let id = text(record, "idMeal");
						warn!(?id, %error, "skipping unusable recipe source record");
						None
					}
				}
			})
			.collect()
	}
}

/// Projects one raw record into a draft.
pub fn project(record: &Map<String, Value>) -> Result<RecipeDraft, DecodeError> {
	let external_id = text(record, "idMeal").ok_or(DecodeError::MissingField("idMeal"))?;
	let name = text(record, "strMeal").ok_or(DecodeError::MissingField("strMeal"))?;

	let ingredients = (1..=MAX_INGREDIENTS)
		.filter_map(|slot| {
			let name = text(record, &format!("strIngredient{slot}"))?;
			let measure = text(record, &format!("strMeasure{slot}"));
			Some(Ingredient::new(name, measure))
		})
		.collect();

	Ok(RecipeDraft {
		category: text(record, "strCategory"),
		country: text(record, "strArea"),
		instructions: text(record, "strInstructions"),
		thumbnail_url: text(record, "strMealThumb"),
		tags: text(record, "strTags"),
		tutorial_link: text(record, "strYoutube"),
		source_link: text(record, "strSource"),
		ingredients,
		..RecipeDraft::new(external_id, name)
	})
}

/// Trimmed string value of `key`; absent, non-string and blank values are `None`.
fn text(record: &Map<String, Value>, key: &str) -> Option<String> {
	let value = record.get(key)?.as_str()?.trim();
	(!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests;
