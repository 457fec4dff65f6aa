//! Identity-scoped collection path resolution.

use std::fmt;

use cookbook_config::{ScopeConfig, UID_PLACEHOLDER};

use crate::error::ResolveError;
use crate::identity::Identity;

/// Slash-separated path of a document collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath(String);

impl CollectionPath {
	/// Wraps `path` without validation.
	pub fn new(path: impl Into<String>) -> Self {
		Self(path.into())
	}

	/// Returns the path as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for CollectionPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Maps the active identity to the collection the store subscribes to.
#[derive(Debug, Clone)]
pub struct PathResolver {
	anonymous_template: String,
	user_template: String,
	fallback: Option<CollectionPath>,
}

impl PathResolver {
	/// Creates a resolver from the configured templates.
	pub fn new(config: &ScopeConfig) -> Self {
		Self {
			anonymous_template: config.anonymous_template.clone(),
			user_template: config.user_template.clone(),
			fallback: config.fallback.clone().map(CollectionPath::new),
		}
	}

	/// Resolves the path for `identity`.
	///
	/// A missing identity, or one whose uid cannot form a path segment,
	/// resolves to the fallback path when one is configured.
	pub fn resolve(&self, identity: Option<&Identity>) -> Result<CollectionPath, ResolveError> {
		if let Some(identity) = identity {
			let uid = identity.uid();
			if is_path_segment(uid) {
				let template = match identity {
					Identity::Anonymous { .. } => &self.anonymous_template,
					Identity::User { .. } => &self.user_template,
				};
				return Ok(CollectionPath(template.replace(UID_PLACEHOLDER, uid)));
			}
			tracing::warn!(uid, "identity uid is not a usable path segment");
		}

		match &self.fallback {
			Some(fallback) => {
				tracing::warn!(path = %fallback, "no usable identity, using fallback collection");
				Ok(fallback.clone())
			}
			None => {
				tracing::error!("no usable identity and no fallback collection configured");
				Err(ResolveError::NoIdentity)
			}
		}
	}
}

fn is_path_segment(uid: &str) -> bool {
	!uid.trim().is_empty() && !uid.contains('/')
}

#[cfg(test)]
mod tests {
	use super::*;

	fn resolver(fallback: Option<&str>) -> PathResolver {
		PathResolver::new(&ScopeConfig {
			fallback: fallback.map(str::to_string),
			..ScopeConfig::default()
		})
	}

	#[test]
	fn anonymous_and_user_scopes_differ() {
		let resolver = resolver(Some("recipes"));

		let anon = resolver.resolve(Some(&Identity::anonymous("a1"))).unwrap();
		let user = resolver.resolve(Some(&Identity::user("a1", "cook@example.com"))).unwrap();

		assert_eq!(anon.as_str(), "anonymous/a1/recipes");
		assert_eq!(user.as_str(), "users/a1/recipes");
	}

	#[test]
	fn missing_identity_uses_fallback() {
		let resolver = resolver(Some("recipes"));
		assert_eq!(resolver.resolve(None).unwrap(), CollectionPath::new("recipes"));
	}

	#[test]
	fn unusable_uid_uses_fallback() {
		let resolver = resolver(Some("recipes"));
		assert_eq!(
			resolver.resolve(Some(&Identity::anonymous(""))).unwrap(),
			CollectionPath::new("recipes")
		);
		assert_eq!(
			resolver.resolve(Some(&Identity::user("../x", "a@b.c"))).unwrap(),
			CollectionPath::new("recipes")
		);
	}

	#[test]
	fn missing_identity_without_fallback_fails() {
		let resolver = resolver(None);
		assert!(matches!(resolver.resolve(None), Err(ResolveError::NoIdentity)));
	}
}
