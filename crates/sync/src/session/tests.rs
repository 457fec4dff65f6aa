use pretty_assertions::assert_eq;

use super::*;
use crate::listener::ListenerKind;
use crate::memory::{MemoryBackend, MemoryIdentity};
use crate::testing::{Recorder, body, settle};

async fn start(backend: &MemoryBackend, identity: &Arc<MemoryIdentity>) -> Cookbook {
	Cookbook::start(
		&ScopeConfig::default(),
		identity.clone(),
		Arc::new(backend.clone()),
		Arc::new(backend.clone()),
	)
	.await
	.unwrap()
}

#[tokio::test]
async fn start_signs_in_anonymously() {
	let backend = MemoryBackend::new();
	let identity = Arc::new(MemoryIdentity::new());
	let cookbook = start(&backend, &identity).await;

	let current = cookbook.identity().unwrap();
	assert!(current.is_anonymous());
	assert_eq!(
		cookbook.current_path(),
		Some(CollectionPath::new(format!("anonymous/{}/recipes", current.uid())))
	);
}

#[tokio::test]
async fn start_keeps_existing_identity() {
	let backend = MemoryBackend::new();
	backend.set_document(&CollectionPath::new("users/u1/recipes"), "d1", body("Ramen"));
	let identity = Arc::new(MemoryIdentity::new());
	identity.set_identity(Some(Identity::user("u1", "cook@example.com")));
	let cookbook = start(&backend, &identity).await;

	assert_eq!(cookbook.current_path(), Some(CollectionPath::new("users/u1/recipes")));
	settle(|| cookbook.find_by_id("d1").is_some()).await;
}

#[tokio::test]
async fn failed_anonymous_bootstrap_is_fatal() {
	let backend = MemoryBackend::new();
	let identity = Arc::new(MemoryIdentity::new());
	identity.fail_next_anonymous(AuthError::Provider("unreachable".into()));

	let result = Cookbook::start(
		&ScopeConfig::default(),
		identity,
		Arc::new(backend.clone()),
		Arc::new(backend),
	)
	.await;
	assert!(matches!(result, Err(AuthError::Provider(_))));
}

#[tokio::test]
async fn sign_up_moves_to_user_collection_without_blending() {
	let backend = MemoryBackend::new();
	let identity = Arc::new(MemoryIdentity::new());
	let cookbook = start(&backend, &identity).await;
	let recorder = Recorder::new(ListenerKind::Recipes);
	cookbook.add_listener(&recorder);

	cookbook.add_recipe(RecipeDraft::new("1", "Anon toast")).await.unwrap();
	settle(|| cookbook.store().len() == 1).await;

	let user = cookbook.sign_up("cook@example.com", "Secret1!").await.unwrap();
	let user_path = CollectionPath::new(format!("users/{}/recipes", user.uid()));
	assert_eq!(cookbook.current_path(), Some(user_path.clone()));
	assert!(cookbook.store().is_empty());

	backend.set_document(&user_path, "u-doc", body("User stew"));
	settle(|| cookbook.find_by_id("u-doc").is_some()).await;
	assert_eq!(recorder.last_names(), Some(vec!["User stew".to_string()]));
}

#[tokio::test]
async fn failed_sign_in_keeps_scope() {
	let backend = MemoryBackend::new();
	let identity = Arc::new(MemoryIdentity::new());
	let cookbook = start(&backend, &identity).await;
	let before = cookbook.current_path();
	cookbook.add_recipe(RecipeDraft::new("1", "Toast")).await.unwrap();
	settle(|| cookbook.store().len() == 1).await;

	let error = cookbook.sign_in("nobody@example.com", "nope").await.unwrap_err();
	assert!(matches!(error, AuthError::InvalidCredentials));
	assert_eq!(cookbook.current_path(), before);
	assert_eq!(cookbook.store().len(), 1);
}

#[tokio::test]
async fn sign_out_falls_back_and_notifies_identity() {
	let backend = MemoryBackend::new();
	let identity = Arc::new(MemoryIdentity::new());
	let cookbook = start(&backend, &identity).await;
	let auth = Recorder::new(ListenerKind::Auth);
	cookbook.add_listener(&auth);

	cookbook.sign_out().await.unwrap();
	assert_eq!(cookbook.identity(), None);
	assert_eq!(cookbook.current_path(), Some(CollectionPath::new("recipes")));
	settle(|| auth.identities.lock().as_slice() == [None]).await;
}

#[tokio::test]
async fn provider_side_identity_change_rescopes() {
	let backend = MemoryBackend::new();
	let identity = Arc::new(MemoryIdentity::new());
	let cookbook = start(&backend, &identity).await;

	identity.set_identity(Some(Identity::user("u9", "nine@example.com")));
	settle(|| cookbook.current_path() == Some(CollectionPath::new("users/u9/recipes"))).await;
}

#[tokio::test]
async fn shutdown_stops_following_identity() {
	let backend = MemoryBackend::new();
	let identity = Arc::new(MemoryIdentity::new());
	let cookbook = start(&backend, &identity).await;

	cookbook.shutdown().await;
	assert_eq!(cookbook.current_path(), None);
	identity.set_identity(Some(Identity::user("u9", "nine@example.com")));
	for _ in 0..100 {
		tokio::task::yield_now().await;
	}
	assert_eq!(cookbook.current_path(), None);
}
