//! Identities handed out by the external identity provider.

/// The currently active principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
	/// Session established without credentials.
	Anonymous { uid: String },
	/// Account signed in with credentials.
	User { uid: String, email: Option<String> },
}

impl Identity {
	/// Creates an anonymous identity.
	pub fn anonymous(uid: impl Into<String>) -> Self {
		Self::Anonymous { uid: uid.into() }
	}

	/// Creates a signed-in identity with an email.
	pub fn user(uid: impl Into<String>, email: impl Into<String>) -> Self {
		Self::User {
			uid: uid.into(),
			email: Some(email.into()),
		}
	}

	/// Returns the provider-assigned user id.
	pub fn uid(&self) -> &str {
		match self {
			Self::Anonymous { uid } | Self::User { uid, .. } => uid,
		}
	}

	/// Returns true for identities without credentials.
	pub const fn is_anonymous(&self) -> bool {
		matches!(self, Self::Anonymous { .. })
	}
}
