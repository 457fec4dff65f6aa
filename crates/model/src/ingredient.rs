use serde::{Deserialize, Serialize};

/// One line of a recipe's ingredient list.
///
/// Ingredients have no identity of their own; list order is display order and
/// duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ingredient {
	pub name: String,
	/// Free-form quantity text such as `"3/4 cup"`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub measure: Option<String>,
}

impl Ingredient {
	/// Creates an ingredient with an optional measure.
	pub fn new(name: impl Into<String>, measure: Option<String>) -> Self {
		Self {
			name: name.into(),
			measure,
		}
	}
}
