//! Weak multicast fan-out for store observers.

use std::sync::{Arc, Weak};

use cookbook_model::Recipe;
use parking_lot::Mutex;

use crate::identity::Identity;

/// Notification classes an observer can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
	/// Recipe list snapshots only.
	Recipes,
	/// Identity changes only.
	Auth,
	/// Everything.
	All,
}

impl ListenerKind {
	pub const fn wants_recipes(self) -> bool {
		matches!(self, Self::Recipes | Self::All)
	}

	pub const fn wants_identity(self) -> bool {
		matches!(self, Self::Auth | Self::All)
	}
}

/// What happened to the recipe list before a snapshot was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreChange {
	Add,
	Remove,
	/// Replacement, scope reset, or a registration snapshot.
	Update,
}

/// Observer of the recipe store.
///
/// Callbacks run synchronously on the thread applying the change, with the
/// store's serialization lock held. They may register listeners but must not
/// call back into [`RecipeStore::apply_batch`](crate::RecipeStore::apply_batch)
/// or [`RecipeStore::reset`](crate::RecipeStore::reset).
pub trait StoreListener: Send + Sync {
	fn listener_kind(&self) -> ListenerKind;

	/// Receives the complete list after a change; never a delta.
	fn on_recipe_list_change(&self, change: StoreChange, recipes: &[Recipe]);

	fn on_identity_change(&self, _identity: Option<&Identity>) {}
}

/// Set of non-owning observer handles.
///
/// Registration is keyed on allocation identity. Dead handles are pruned
/// lazily; the registry never keeps an observer alive.
pub struct ListenerRegistry<T: ?Sized> {
	entries: Mutex<Vec<Weak<T>>>,
}

impl<T: ?Sized> Default for ListenerRegistry<T> {
	fn default() -> Self {
		Self {
			entries: Mutex::new(Vec::new()),
		}
	}
}

impl<T: ?Sized> ListenerRegistry<T> {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds `listener`; returns false when it was already registered.
	pub fn register(&self, listener: &Arc<T>) -> bool {
		let weak = Arc::downgrade(listener);
		let mut entries = self.entries.lock();
		entries.retain(|entry| entry.strong_count() > 0);
		if entries.iter().any(|entry| entry.ptr_eq(&weak)) {
			return false;
		}
		entries.push(weak);
		true
	}

	/// Removes `listener`; returns false when it was not registered.
	pub fn unregister(&self, listener: &Arc<T>) -> bool {
		let weak = Arc::downgrade(listener);
		let mut entries = self.entries.lock();
		let position = entries.iter().position(|entry| entry.ptr_eq(&weak));
		if let Some(index) = position {
			entries.swap_remove(index);
		}
		entries.retain(|entry| entry.strong_count() > 0);
		position.is_some()
	}

	/// Calls `f` once for every live listener.
	///
	/// Iterates over a snapshot so listeners may register or unregister
	/// during delivery.
	pub fn invoke(&self, mut f: impl FnMut(&T)) {
		let snapshot: Vec<Arc<T>> = {
			let mut entries = self.entries.lock();
			entries.retain(|entry| entry.strong_count() > 0);
			entries.iter().filter_map(Weak::upgrade).collect()
		};
		for listener in &snapshot {
			f(&**listener);
		}
	}

	/// Number of live listeners.
	pub fn len(&self) -> usize {
		self.entries.lock().iter().filter(|entry| entry.strong_count() > 0).count()
	}

	/// Returns true when no live listener remains.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
