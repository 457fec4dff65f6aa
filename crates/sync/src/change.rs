//! Per-document change events delivered by the remote collection feed.

use serde_json::Value;

/// Kind of a single document change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
	Added,
	Modified,
	Removed,
}

/// One document change with its list positions.
///
/// `new_index` is set for `Added`/`Modified`, `old_index` for
/// `Modified`/`Removed`. Indices are relative to the list as it stands when
/// the event is applied, in delivery order.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChange {
	pub kind: ChangeKind,
	pub document_id: String,
	/// Raw document body; absent for removals.
	pub payload: Option<Value>,
	pub old_index: Option<usize>,
	pub new_index: Option<usize>,
}

impl DocumentChange {
	/// Creates an `Added` event inserting at `new_index`.
	pub fn added(document_id: impl Into<String>, payload: Value, new_index: usize) -> Self {
		Self {
			kind: ChangeKind::Added,
			document_id: document_id.into(),
			payload: Some(payload),
			old_index: None,
			new_index: Some(new_index),
		}
	}

	/// Creates a `Modified` event moving the entry from `old_index` to `new_index`.
	pub fn modified(document_id: impl Into<String>, payload: Value, old_index: usize, new_index: usize) -> Self {
		Self {
			kind: ChangeKind::Modified,
			document_id: document_id.into(),
			payload: Some(payload),
			old_index: Some(old_index),
			new_index: Some(new_index),
		}
	}

	/// Creates a `Removed` event for the entry at `old_index`.
	pub fn removed(document_id: impl Into<String>, old_index: usize) -> Self {
		Self {
			kind: ChangeKind::Removed,
			document_id: document_id.into(),
			payload: None,
			old_index: Some(old_index),
			new_index: None,
		}
	}
}

/// Ordered changes delivered together by one feed callback.
pub type ChangeBatch = Vec<DocumentChange>;
