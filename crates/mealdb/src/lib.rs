//! Client for the public recipe source.
//!
//! [`MealDbClient`] issues name and first-letter queries against the
//! source's `search.php` endpoint and projects each record into a
//! [`RecipeDraft`](cookbook_model::RecipeDraft). [`SearchSession`] layers
//! alphabet paging and de-duplication on top of any [`RecipeSource`].

mod client;
mod error;
mod meal;
mod session;

pub use client::{MealDbClient, RecipeSource};
pub use error::{Result, SourceError};
pub use meal::{MAX_INGREDIENTS, MealsResponse, project};
pub use session::SearchSession;
