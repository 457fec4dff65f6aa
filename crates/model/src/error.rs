//! Error types for recipe document decoding.

use thiserror::Error;

/// Errors raised when a document body cannot be turned into a recipe.
#[derive(Debug, Error)]
pub enum DecodeError {
	/// The body is not a JSON object of the expected shape.
	#[error("malformed recipe document: {0}")]
	Malformed(#[from] serde_json::Error),

	/// A required field is absent or blank.
	#[error("missing required field: {0}")]
	MissingField(&'static str),

	/// An ingredient entry carries no name.
	#[error("ingredient {index} has an empty name")]
	EmptyIngredient {
		/// Position of the offending entry in the ingredient list.
		index: usize,
	},
}

/// Result type for recipe decoding.
pub type Result<T> = std::result::Result<T, DecodeError>;
