//! Configuration for the cookbook workspace.
//!
//! Configuration is written in TOML. Every key is optional:
//!
//! ```toml
//! [scope]
//! anonymous_template = "anonymous/{uid}/recipes"
//! user_template = "users/{uid}/recipes"
//! fallback = "recipes"
//!
//! [source]
//! base_url = "https://www.themealdb.com/api/json/v1/1/"
//! letter_batch_size = 3
//! timeout_secs = 15
//! ```
//!
//! # Configuration file
//!
//! The default location is `$XDG_CONFIG_HOME/cookbook/config.toml` (see
//! [`Config::default_path`]). A missing file yields the defaults; an
//! unreadable or malformed one is an error.
//!
//! # Scope templates
//!
//! Collection paths are derived from the active identity by substituting
//! `{uid}` into the template for its kind. An empty `fallback` disables the
//! fallback path.

mod error;

use std::path::{Path, PathBuf};

pub use error::{ConfigError, Result};
use serde::Deserialize;

/// Placeholder substituted with the identity's uid.
pub const UID_PLACEHOLDER: &str = "{uid}";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub scope: ScopeConfig,
	pub source: SourceConfig,
}

/// How identities map to recipe collection paths.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScopeConfig {
	pub anonymous_template: String,
	pub user_template: String,
	/// Identity-independent path used when no identity is usable.
	pub fallback: Option<String>,
}

impl Default for ScopeConfig {
	fn default() -> Self {
		Self {
			anonymous_template: "anonymous/{uid}/recipes".to_string(),
			user_template: "users/{uid}/recipes".to_string(),
			fallback: Some("recipes".to_string()),
		}
	}
}

/// Public recipe source settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
	/// API root; always normalized to end with `/`.
	pub base_url: String,
	/// Letters fetched per browse batch.
	pub letter_batch_size: usize,
	pub timeout_secs: u64,
}

impl Default for SourceConfig {
	fn default() -> Self {
		Self {
			base_url: "https://www.themealdb.com/api/json/v1/1/".to_string(),
			letter_batch_size: 3,
			timeout_secs: 15,
		}
	}
}

impl Config {
	/// Parse and validate a TOML string.
	pub fn parse(input: &str) -> Result<Self> {
		let mut config: Self = toml::from_str(input)?;
		config.normalize()?;
		Ok(config)
	}

	/// Load configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		Self::parse(&content)
	}

	/// Load configuration from a file, falling back to defaults if it does not exist.
	pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		match std::fs::read_to_string(path) {
			Ok(content) => Self::parse(&content),
			Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
			Err(error) => Err(ConfigError::Io {
				path: path.to_path_buf(),
				error,
			}),
		}
	}

	/// `$XDG_CONFIG_HOME/cookbook/config.toml`, if a config directory exists.
	pub fn default_path() -> Option<PathBuf> {
		dirs::config_dir().map(|dir| dir.join("cookbook").join("config.toml"))
	}

	fn normalize(&mut self) -> Result<()> {
		for (key, template) in [
			("scope.anonymous_template", &self.scope.anonymous_template),
			("scope.user_template", &self.scope.user_template),
		] {
			if !template.contains(UID_PLACEHOLDER) {
				return Err(ConfigError::Invalid {
					key,
					reason: format!("template must contain {UID_PLACEHOLDER}"),
				});
			}
		}

		if self.scope.fallback.as_deref().is_some_and(|f| f.trim().is_empty()) {
			self.scope.fallback = None;
		}

		let mut base = url::Url::parse(&self.source.base_url).map_err(|e| ConfigError::Invalid {
			key: "source.base_url",
			reason: e.to_string(),
		})?;
		if !base.path().ends_with('/') {
			let path = format!("{}/", base.path());
			base.set_path(&path);
		}
		self.source.base_url = base.to_string();

		if self.source.letter_batch_size == 0 {
			return Err(ConfigError::Invalid {
				key: "source.letter_batch_size",
				reason: "must be at least 1".to_string(),
			});
		}
		if self.source.timeout_secs == 0 {
			return Err(ConfigError::Invalid {
				key: "source.timeout_secs",
				reason: "must be at least 1".to_string(),
			});
		}
		Ok(())
	}
}
