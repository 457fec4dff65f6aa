//! Authoritative in-memory recipe list.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use cookbook_model::Recipe;
use parking_lot::{Mutex, ReentrantMutex};
use tracing::{debug, warn};

use crate::change::{ChangeKind, DocumentChange};
use crate::identity::Identity;
use crate::listener::{ListenerRegistry, StoreChange, StoreListener};

/// Result of applying one change batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
	/// Events that changed the list.
	pub applied: usize,
	/// Events dropped for decode faults or stale indices.
	pub skipped: usize,
	/// The batch belonged to a superseded subscription and was ignored.
	pub stale: bool,
}

/// Ordered recipe list fed by change batches, with observer fan-out.
///
/// Batches, resets and registrations are serialized: one batch is fully
/// applied and every resulting notification delivered before the next starts,
/// and a registration snapshot is never delivered after a newer change.
/// The serialization lock is reentrant so listener callbacks may register
/// further listeners. Each batch is
/// tagged with the generation it was subscribed under; batches from an older
/// generation are ignored.
pub struct RecipeStore {
	recipes: Mutex<Vec<Recipe>>,
	listeners: ListenerRegistry<dyn StoreListener>,
	generation: AtomicU64,
	serial: ReentrantMutex<()>,
}

impl Default for RecipeStore {
	fn default() -> Self {
		Self::new()
	}
}

impl RecipeStore {
	/// Creates an empty store at generation 0.
	pub fn new() -> Self {
		Self {
			recipes: Mutex::new(Vec::new()),
			listeners: ListenerRegistry::new(),
			generation: AtomicU64::new(0),
			serial: ReentrantMutex::new(()),
		}
	}

	/// Registers `listener`.
	///
	/// A newly registered listener interested in recipes immediately receives
	/// one [`StoreChange::Update`] carrying the current list. Registering an
	/// already registered listener does nothing.
	pub fn add_listener<L: StoreListener + 'static>(&self, listener: &Arc<L>) {
		let listener: Arc<dyn StoreListener> = listener.clone();
		let _serial = self.serial.lock();
		if !self.listeners.register(&listener) {
			return;
		}
		if listener.listener_kind().wants_recipes() {
			let snapshot = self.snapshot();
			listener.on_recipe_list_change(StoreChange::Update, &snapshot);
		}
	}

	/// Unregisters `listener`; unknown listeners are ignored.
	pub fn remove_listener<L: StoreListener + 'static>(&self, listener: &Arc<L>) {
		let listener: Arc<dyn StoreListener> = listener.clone();
		self.listeners.unregister(&listener);
	}

	/// Returns the number of live listeners.
	pub fn listener_count(&self) -> usize {
		self.listeners.len()
	}

	/// Current subscription generation.
	pub fn generation(&self) -> u64 {
		self.generation.load(Ordering::Acquire)
	}

	/// Clears the list and starts a new generation.
	///
	/// Batches tagged with any earlier generation are ignored from here on.
	/// Recipe listeners receive an empty snapshot.
	pub fn reset(&self) -> u64 {
		let _serial = self.serial.lock();
		let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
		self.recipes.lock().clear();
		debug!(generation, "recipe store reset");
		self.notify(StoreChange::Update, &[]);
		generation
	}

	/// Applies one batch in delivery order.
	///
	/// Every event that changes the list triggers one notification with the
	/// full list. Events with undecodable payloads or out-of-range indices
	/// are logged and skipped; the rest of the batch still applies.
	pub fn apply_batch(&self, generation: u64, batch: &[DocumentChange]) -> ApplyOutcome {
		let _serial = self.serial.lock();
		let current = self.generation();
		if generation != current {
			debug!(generation, current, events = batch.len(), "dropping stale change batch");
			return ApplyOutcome {
				stale: true,
				..ApplyOutcome::default()
			};
		}

		let mut outcome = ApplyOutcome::default();
		for change in batch {
			let applied = {
				let mut recipes = self.recipes.lock();
				apply_change(&mut recipes, change)
			};
			match applied {
				Some(kind) => {
					outcome.applied += 1;
					let snapshot = self.snapshot();
					self.notify(kind, &snapshot);
				}
				None => outcome.skipped += 1,
			}
		}
		outcome
	}

	/// Looks up a recipe by document id.
	pub fn find_by_id(&self, id: &str) -> Option<Recipe> {
		self.recipes.lock().iter().find(|recipe| recipe.id == id).cloned()
	}

	/// Copy of the current list.
	pub fn snapshot(&self) -> Vec<Recipe> {
		self.recipes.lock().clone()
	}

	/// Returns the number of recipes in the list.
	pub fn len(&self) -> usize {
		self.recipes.lock().len()
	}

	/// Returns true if the list holds no recipes.
	pub fn is_empty(&self) -> bool {
		self.recipes.lock().is_empty()
	}

	/// Forwards an identity change to auth listeners.
	pub fn notify_identity(&self, identity: Option<&Identity>) {
		self.listeners.invoke(|listener| {
			if listener.listener_kind().wants_identity() {
				listener.on_identity_change(identity);
			}
		});
	}

	fn notify(&self, change: StoreChange, recipes: &[Recipe]) {
		self.listeners.invoke(|listener| {
			if listener.listener_kind().wants_recipes() {
				listener.on_recipe_list_change(change, recipes);
			}
		});
	}
}

/// Applies one event, returning the notification kind if the list changed.
fn apply_change(recipes: &mut Vec<Recipe>, change: &DocumentChange) -> Option<StoreChange> {
	let doc_id = change.document_id.as_str();
	match change.kind {
		ChangeKind::Added => {
			let recipe = decode(change)?;
			let index = insert_index(recipes, change, doc_id)?;
			recipes.insert(index, recipe);
			Some(StoreChange::Add)
		}
		ChangeKind::Modified => {
			let recipe = decode(change)?;
			let mut changed = false;
			match change.old_index {
				Some(old) if old < recipes.len() => {
					recipes.remove(old);
					changed = true;
				}
				old_index => {
					warn!(doc_id, ?old_index, len = recipes.len(), "modified event removal index out of range");
				}
			}
			if let Some(index) = insert_index(recipes, change, doc_id) {
				recipes.insert(index, recipe);
				changed = true;
			}
			changed.then_some(StoreChange::Update)
		}
		ChangeKind::Removed => match change.old_index {
			Some(old) if old < recipes.len() => {
				recipes.remove(old);
				Some(StoreChange::Remove)
			}
			old_index => {
				warn!(doc_id, ?old_index, len = recipes.len(), "removed event index out of range");
				None
			}
		},
	}
}

fn decode(change: &DocumentChange) -> Option<Recipe> {
	let doc_id = change.document_id.as_str();
	let Some(payload) = change.payload.as_ref() else {
		warn!(doc_id, kind = ?change.kind, "change event carries no payload");
		return None;
	};
	match Recipe::from_document(doc_id, payload) {
		Ok(recipe) => Some(recipe),
		Err(error) => {
			warn!(doc_id, %error, %payload, "recipe document decode failed");
			None
		}
	}
}

fn insert_index(recipes: &[Recipe], change: &DocumentChange, doc_id: &str) -> Option<usize> {
	match change.new_index {
		Some(index) if index <= recipes.len() => Some(index),
		new_index => {
			warn!(doc_id, ?new_index, len = recipes.len(), "insertion index out of range");
			None
		}
	}
}
