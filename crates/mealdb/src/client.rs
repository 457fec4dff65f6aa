//! HTTP client for the public recipe source.

use std::time::Duration;

use async_trait::async_trait;
use cookbook_config::SourceConfig;
use cookbook_model::RecipeDraft;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::{Result, SourceError};
use crate::meal::MealsResponse;

const SEARCH_ENDPOINT: &str = "search.php";

/// Lookups offered by a recipe source.
#[async_trait]
pub trait RecipeSource: Send + Sync {
	/// Recipes whose name matches `name`.
	async fn search_by_name(&self, name: &str) -> Result<Vec<RecipeDraft>>;

	/// Recipes whose name starts with `letter`.
	async fn search_by_letter(&self, letter: char) -> Result<Vec<RecipeDraft>>;
}

/// Client for the `search.php` listing endpoint.
#[derive(Debug, Clone)]
pub struct MealDbClient {
	http: Client,
	base: Url,
}

impl MealDbClient {
	/// Creates a client for the configured source endpoint.
	pub fn new(config: &SourceConfig) -> Result<Self> {
		let http = Client::builder()
			.timeout(Duration::from_secs(config.timeout_secs))
			.build()?;
		Ok(Self {
			http,
			base: Url::parse(&config.base_url)?,
		})
	}

	/// URL of the search endpoint with a single query parameter.
	pub fn endpoint(&self, key: &str, value: &str) -> Result<Url> {
		let mut url = self.base.join(SEARCH_ENDPOINT)?;
		url.query_pairs_mut().append_pair(key, value);
		Ok(url)
	}

	async fn fetch(&self, url: Url) -> Result<Vec<RecipeDraft>> {
		debug!(%url, "querying recipe source");
		let response = self.http.get(url.clone()).send().await?;
		let status = response.status();
		if !status.is_success() {
			return Err(SourceError::Status {
				status: status.as_u16(),
				url: url.to_string(),
			});
		}
		let body = response.text().await?;
		let drafts = MealsResponse::parse(&body)?.into_drafts();
		debug!(%url, count = drafts.len(), "recipe source answered");
		Ok(drafts)
	}
}

#[async_trait]
impl RecipeSource for MealDbClient {
	async fn search_by_name(&self, name: &str) -> Result<Vec<RecipeDraft>> {
		self.fetch(self.endpoint("s", name)?).await
	}

	async fn search_by_letter(&self, letter: char) -> Result<Vec<RecipeDraft>> {
		self.fetch(self.endpoint("f", letter.encode_utf8(&mut [0; 4]))?).await
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn endpoint_appends_encoded_query() {
		let client = MealDbClient::new(&SourceConfig::default()).unwrap();
		assert_eq!(
			client.endpoint("s", "Arrabiata").unwrap().as_str(),
			"https://www.themealdb.com/api/json/v1/1/search.php?s=Arrabiata"
		);
		assert_eq!(
			client.endpoint("s", "chicken curry").unwrap().as_str(),
			"https://www.themealdb.com/api/json/v1/1/search.php?s=chicken+curry"
		);
	}

	#[test]
	fn endpoint_respects_base_path() {
		let config = SourceConfig {
			base_url: "http://localhost:8080/mock/".to_string(),
			..SourceConfig::default()
		};
		let client = MealDbClient::new(&config).unwrap();
		assert_eq!(
			client.endpoint("f", "a").unwrap().as_str(),
			"http://localhost:8080/mock/search.php?f=a"
		);
	}
}
