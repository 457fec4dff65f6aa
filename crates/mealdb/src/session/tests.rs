use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use super::*;
use crate::error::SourceError;

#[derive(Default)]
struct FakeSource {
	by_letter: HashMap<char, Vec<RecipeDraft>>,
	by_name: HashMap<String, Vec<RecipeDraft>>,
	failing: Vec<char>,
	calls: Mutex<Vec<String>>,
}

impl FakeSource {
	fn letter(mut self, letter: char, ids: &[&str]) -> Self {
		self.by_letter.insert(letter, drafts(ids));
		self
	}

	fn failing(mut self, letter: char) -> Self {
		self.failing.push(letter);
		self
	}

	fn calls(&self) -> Vec<String> {
		self.calls.lock().unwrap().clone()
	}
}

fn drafts(ids: &[&str]) -> Vec<RecipeDraft> {
	ids.iter().map(|id| RecipeDraft::new(*id, format!("Recipe {id}"))).collect()
}

#[async_trait]
impl<'a> RecipeSource for &'a FakeSource {
	async fn search_by_name(&self, name: &str) -> Result<Vec<RecipeDraft>> {
		self.calls.lock().unwrap().push(format!("s={name}"));
		Ok(self.by_name.get(name).cloned().unwrap_or_default())
	}

	async fn search_by_letter(&self, letter: char) -> Result<Vec<RecipeDraft>> {
		self.calls.lock().unwrap().push(format!("f={letter}"));
		if self.failing.contains(&letter) {
			return Err(SourceError::Status {
				status: 503,
				url: format!("f={letter}"),
			});
		}
		Ok(self.by_letter.get(&letter).cloned().unwrap_or_default())
	}
}

fn ids(session: &SearchSession<&FakeSource>) -> Vec<String> {
	session.results().iter().map(|d| d.external_id.clone()).collect()
}

#[tokio::test]
async fn blank_query_loads_first_letter_batch() {
	let source = FakeSource::default().letter('a', &["1", "2"]).letter('c', &["3"]).letter('d', &["4"]);
	let mut session = SearchSession::new(&source, 3);

	assert_eq!(session.search("  ").await.unwrap(), 3);
	assert_eq!(ids(&session), vec!["1", "2", "3"]);
	assert_eq!(source.calls(), vec!["f=a", "f=b", "f=c"]);
}

#[tokio::test]
async fn next_batch_continues_alphabet_and_dedupes() {
	let source = FakeSource::default().letter('a', &["1"]).letter('b', &["2", "1"]).letter('c', &["2", "3"]);
	let mut session = SearchSession::new(&source, 2);

	session.search("").await.unwrap();
	assert_eq!(session.load_next_batch().await, 1);
	assert_eq!(ids(&session), vec!["1", "2", "3"]);
	assert_eq!(source.calls(), vec!["f=a", "f=b", "f=c", "f=d"]);
}

#[tokio::test]
async fn failing_letter_is_skipped() {
	let source = FakeSource::default()
		.letter('a', &["1"])
		.failing('b')
		.letter('c', &["3"]);
	let mut session = SearchSession::new(&source, 3);

	assert_eq!(session.search("").await.unwrap(), 2);
	assert_eq!(ids(&session), vec!["1", "3"]);
}

#[tokio::test]
async fn exhausted_alphabet_issues_no_requests() {
	let source = FakeSource::default().letter('z', &["26"]);
	let mut session = SearchSession::new(&source, 10);

	session.search("").await.unwrap();
	session.load_next_batch().await;
	assert_eq!(session.load_next_batch().await, 1);
	assert!(session.is_exhausted());

	let before = source.calls().len();
	assert_eq!(session.load_next_batch().await, 0);
	assert_eq!(source.calls().len(), before);
	assert_eq!(before, 26);
}

#[tokio::test]
async fn name_query_replaces_previous_results() {
	let mut source = FakeSource::default().letter('a', &["1", "2"]);
	source.by_name.insert("Arrabiata".into(), drafts(&["52771"]));
	let mut session = SearchSession::new(&source, 1);

	session.search("").await.unwrap();
	assert_eq!(session.search(" Arrabiata ").await.unwrap(), 1);
	assert_eq!(ids(&session), vec!["52771"]);
	assert!(session.is_exhausted());
	assert_eq!(session.load_next_batch().await, 0);
}

#[tokio::test]
async fn single_character_query_is_a_letter_search() {
	let source = FakeSource::default().letter('b', &["7"]);
	let mut session = SearchSession::new(&source, 3);

	assert_eq!(session.search("b").await.unwrap(), 1);
	assert_eq!(source.calls(), vec!["f=b"]);
}

#[tokio::test]
async fn direct_query_failure_is_returned() {
	let source = FakeSource::default().failing('q');
	let mut session = SearchSession::new(&source, 3);

	assert!(matches!(session.search("q").await, Err(SourceError::Status { status: 503, .. })));
	assert!(session.results().is_empty());
}

#[tokio::test]
async fn failed_query_does_not_fall_back_to_browsing() {
	let source = FakeSource::default().failing('q').letter('a', &["1"]);
	let mut session = SearchSession::new(&source, 3);

	session.search("").await.unwrap();
	assert!(!session.is_exhausted());

	assert!(session.search("q").await.is_err());
	assert!(session.is_exhausted());
	assert_eq!(session.load_next_batch().await, 0);
	assert!(session.results().is_empty());
	assert_eq!(source.calls(), vec!["f=a", "f=b", "f=c", "f=q"]);
}

#[tokio::test]
async fn new_search_clears_seen_ids() {
	let source = FakeSource::default().letter('a', &["1"]);
	let mut session = SearchSession::new(&source, 1);

	session.search("").await.unwrap();
	assert_eq!(session.search("").await.unwrap(), 1);
	assert_eq!(ids(&session), vec!["1"]);
}
