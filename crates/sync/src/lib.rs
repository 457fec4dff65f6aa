//! Identity-scoped real-time sync of a recipe collection.
//!
//! # Purpose
//!
//! Mirrors one remote document collection into an ordered in-memory list and
//! fans every change out to weakly held observers. Which collection is
//! mirrored depends on the signed-in identity; switching identity re-targets
//! the mirror without ever mixing records of two scopes.
//!
//! # Key types
//!
//! * [`RecipeStore`]: the authoritative list plus the [`ListenerRegistry`].
//! * [`RecipeSync`]: owns the live feed subscription and performs scope switches.
//! * [`PathResolver`]: maps an [`Identity`] to a [`CollectionPath`].
//! * [`MutationGateway`]: duplicate-checked adds and deletes.
//! * [`Cookbook`]: the application context tying the above to an
//!   [`IdentityProvider`].
//!
//! # Invariants
//!
//! * Every notification carries the complete list, never a delta.
//! * A batch tagged with a superseded generation is never applied.
//! * The registry never keeps an observer alive.
//! * Local state changes only through the change feed; writes round-trip
//!   through the remote collection.
//!
//! # Data flow
//!
//! ```text
//! IdentityProvider ──watch──▶ ScopeWatcher ──▶ RecipeSync::switch_scope
//!                                                   │ reset + subscribe
//!                                                   ▼
//! ChangeFeed ──batches──▶ pump ──▶ RecipeStore::apply_batch ──▶ listeners
//!     ▲
//!     └── DocumentStore ◀── MutationGateway
//! ```

mod backend;
mod change;
mod engine;
mod error;
mod gateway;
mod identity;
mod listener;
mod memory;
mod scope;
mod session;
mod store;
mod token;

#[cfg(test)]
mod testing;

pub use backend::{ChangeFeed, DocumentStore, FeedSubscription, IdentityProvider};
pub use change::{ChangeBatch, ChangeKind, DocumentChange};
pub use engine::{RecipeSync, ScopeWatcher};
pub use error::{AuthError, FeedError, MutationError, ResolveError, ScopeError, StoreError};
pub use gateway::{EXTERNAL_ID_FIELD, MutationGateway};
pub use identity::Identity;
pub use listener::{ListenerKind, ListenerRegistry, StoreChange, StoreListener};
pub use memory::{MemoryBackend, MemoryIdentity};
pub use scope::{CollectionPath, PathResolver};
pub use session::Cookbook;
pub use store::{ApplyOutcome, RecipeStore};
