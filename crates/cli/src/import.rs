//! `import` command: feeds search hits through an in-process cookbook.

use std::sync::Arc;
use std::time::Duration;

use cookbook_config::Config;
use cookbook_model::{Recipe, RecipeDraft};
use cookbook_sync::{Cookbook, ListenerKind, MemoryBackend, MemoryIdentity, StoreChange, StoreListener};
use tokio::sync::watch;
use tracing::{debug, warn};

const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Publishes the synced list length so the command can wait for writes to land.
struct ListLength {
	tx: watch::Sender<usize>,
}

impl StoreListener for ListLength {
	fn listener_kind(&self) -> ListenerKind {
		ListenerKind::Recipes
	}

	fn on_recipe_list_change(&self, change: StoreChange, recipes: &[Recipe]) {
		debug!(?change, count = recipes.len(), "recipe list changed");
		self.tx.send_replace(recipes.len());
	}
}

pub async fn run(config: &Config, drafts: Vec<RecipeDraft>) -> Result<(), Box<dyn std::error::Error>> {
	let backend = MemoryBackend::new();
	let cookbook = Cookbook::start(
		&config.scope,
		Arc::new(MemoryIdentity::new()),
		Arc::new(backend.clone()),
		Arc::new(backend),
	)
	.await?;

	let (tx, mut length) = watch::channel(0);
	let listener = Arc::new(ListLength { tx });
	cookbook.add_listener(&listener);

	let mut saved = 0;
	for draft in drafts {
		let label = format!("{} ({})", draft.name, draft.external_id);
		match cookbook.add_recipe(draft).await {
			Ok(recipe) => {
				saved += 1;
				println!("{:<16}{label} as {}", "saved", recipe.id);
			}
			Err(error) if error.is_duplicate() => println!("{:<16}{label}", "already exists"),
			Err(error) => println!("{:<16}{label}: {error}", "failed to save"),
		}
	}

	let settled = matches!(
		tokio::time::timeout(SETTLE_TIMEOUT, length.wait_for(|len| *len >= saved)).await,
		Ok(Ok(_))
	);
	if !settled {
		warn!(saved, "timed out waiting for the recipe list to catch up");
	}

	let recipes = cookbook.store().snapshot();
	println!();
	println!("cookbook at {}:", cookbook.current_path().map(|p| p.to_string()).unwrap_or_default());
	for recipe in &recipes {
		println!("  {}  {}", recipe.id, recipe.name);
	}

	cookbook.remove_listener(&listener);
	cookbook.shutdown().await;
	Ok(())
}
