//! Recipe data model shared by the sync engine and the public recipe source.
//!
//! A [`Recipe`] is one stored dish. It is created from a [`RecipeDraft`] (every
//! field except the store-assigned `id`) and round-trips through the JSON
//! document body persisted by the document database.
//!
//! # Document shape
//!
//! ```json
//! {
//!   "externalId": "52772",
//!   "recipeName": "Teriyaki Chicken Casserole",
//!   "category": "Chicken",
//!   "country": "Japanese",
//!   "thumbnail": "https://.../wvpsxx1468256321.jpg",
//!   "tags": "Meat,Casserole",
//!   "ingredients": [{ "name": "soy sauce", "measure": "3/4 cup" }]
//! }
//! ```
//!
//! The document id is not part of the body; it is supplied by the store.

mod error;
mod ingredient;
mod recipe;

pub use error::{DecodeError, Result};
pub use ingredient::Ingredient;
pub use recipe::{Recipe, RecipeDraft};
