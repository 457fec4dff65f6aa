//! Accumulating search over the public recipe source.

use std::collections::HashSet;

use cookbook_model::RecipeDraft;
use tracing::{debug, warn};

use crate::client::RecipeSource;
use crate::error::Result;

const LETTERS: std::ops::RangeInclusive<char> = 'a'..='z';

/// Search results that grow as more letter batches are loaded.
///
/// The source has no paging, so browsing walks the alphabet with first-letter
/// queries, `batch_size` letters at a time. Results are de-duplicated by
/// external id across every query issued since the last [`search`](Self::search).
pub struct SearchSession<S> {
	source: S,
	batch_size: usize,
	results: Vec<RecipeDraft>,
	seen: HashSet<String>,
	next_letter: usize,
}

impl<S: RecipeSource> SearchSession<S> {
	/// Creates an empty session loading `batch_size` letters per batch.
	pub fn new(source: S, batch_size: usize) -> Self {
		Self {
			source,
			batch_size: batch_size.max(1),
			results: Vec::new(),
			seen: HashSet::new(),
			next_letter: 0,
		}
	}

	/// Replaces the results with those for `query`.
	///
	/// A blank query starts browsing and loads the first letter batch. A
	/// single character is a first-letter query; anything longer is a name
	/// query. Non-blank queries are not paged, so the session counts as
	/// exhausted afterwards. Returns the number of results.
	pub async fn search(&mut self, query: &str) -> Result<usize> {
		self.results.clear();
		self.seen.clear();
		self.next_letter = 0;

		let query = query.trim();
		let mut chars = query.chars();
		let letter = match (chars.next(), chars.next()) {
			(None, _) => return Ok(self.load_next_batch().await),
			(Some(letter), None) => Some(letter),
			_ => None,
		};

		// exhausted even if the query fails, so browsing never resumes under it
		self.next_letter = LETTERS.count();
		let found = match letter {
			Some(letter) => self.source.search_by_letter(letter).await?,
			None => self.source.search_by_name(query).await?,
		};
		Ok(self.extend(found))
	}

	/// Fetches the next batch of letters, returning how many new results it added.
	///
	/// A letter whose request fails is logged and skipped. Once every letter
	/// has been fetched this returns 0 without issuing requests.
	pub async fn load_next_batch(&mut self) -> usize {
		let letters: Vec<char> = LETTERS.skip(self.next_letter).take(self.batch_size).collect();
		if letters.is_empty() {
			debug!("letter batches exhausted");
			return 0;
		}
		self.next_letter += letters.len();

		let mut added = 0;
		for letter in letters {
			match self.source.search_by_letter(letter).await {
				Ok(found) => added += self.extend(found),
				Err(error) => warn!(%letter, %error, "letter fetch failed, skipping"),
			}
		}
		debug!(added, total = self.results.len(), next_letter = self.next_letter, "letter batch loaded");
		added
	}

	/// True once browsing has consumed every letter.
	pub fn is_exhausted(&self) -> bool {
		self.next_letter >= LETTERS.count()
	}

	/// Returns the accumulated results.
	pub fn results(&self) -> &[RecipeDraft] {
		&self.results
	}

	/// Consumes the session, returning its results.
	pub fn into_results(self) -> Vec<RecipeDraft> {
		self.results
	}

	fn extend(&mut self, found: Vec<RecipeDraft>) -> usize {
		let before = self.results.len();
		for draft in found {
			if self.seen.insert(draft.external_id.clone()) {
				self.results.push(draft);
			}
		}
		self.results.len() - before
	}
}

#[cfg(test)]
mod tests;
