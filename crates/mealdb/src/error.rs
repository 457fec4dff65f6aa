//! Error types for the public recipe source.

use thiserror::Error;

/// Errors raised while querying the public recipe source.
#[derive(Debug, Error)]
pub enum SourceError {
	/// The request could not be sent or the body could not be read.
	#[error("recipe source request failed: {0}")]
	Network(#[from] reqwest::Error),

	/// The source answered with a non-success status.
	#[error("recipe source returned status {status} for {url}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Requested URL.
		url: String,
	},

	/// The response body is not a recipe listing.
	#[error("invalid recipe source response: {0}")]
	Decode(#[from] serde_json::Error),

	/// The endpoint URL could not be built.
	#[error("invalid recipe source URL: {0}")]
	Url(#[from] url::ParseError),
}

/// Result type for recipe source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
