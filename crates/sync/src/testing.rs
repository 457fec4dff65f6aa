//! Shared helpers for crate-internal tests.

use std::sync::Arc;

use cookbook_model::Recipe;
use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::identity::Identity;
use crate::listener::{ListenerKind, StoreChange, StoreListener};

/// Listener that records every delivery.
pub(crate) struct Recorder {
	kind: ListenerKind,
	pub snapshots: Mutex<Vec<(StoreChange, Vec<Recipe>)>>,
	pub identities: Mutex<Vec<Option<Identity>>>,
}

impl Recorder {
	pub fn new(kind: ListenerKind) -> Arc<Self> {
		Arc::new(Self {
			kind,
			snapshots: Mutex::new(Vec::new()),
			identities: Mutex::new(Vec::new()),
		})
	}

	pub fn count(&self) -> usize {
		self.snapshots.lock().len()
	}

	pub fn last_names(&self) -> Option<Vec<String>> {
		self.snapshots
			.lock()
			.last()
			.map(|(_, recipes)| recipes.iter().map(|r| r.name.clone()).collect())
	}
}

impl StoreListener for Recorder {
	fn listener_kind(&self) -> ListenerKind {
		self.kind
	}

	fn on_recipe_list_change(&self, change: StoreChange, recipes: &[Recipe]) {
		self.snapshots.lock().push((change, recipes.to_vec()));
	}

	fn on_identity_change(&self, identity: Option<&Identity>) {
		self.identities.lock().push(identity.cloned());
	}
}

pub(crate) fn body(name: &str) -> Value {
	json!({ "externalId": "", "recipeName": name })
}

pub(crate) fn body_with(external_id: &str, name: &str, category: &str) -> Value {
	json!({ "externalId": external_id, "recipeName": name, "category": category })
}

/// Yields until `condition` holds, giving spawned tasks a chance to run.
pub(crate) async fn settle(mut condition: impl FnMut() -> bool) {
	for _ in 0..10_000 {
		if condition() {
			return;
		}
		tokio::task::yield_now().await;
	}
	panic!("condition not reached");
}
