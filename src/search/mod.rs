// src/search/mod.rs
// Snippet retrieval over the Google Custom Search JSON API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::backend::SearchBackend;
use crate::config::TriadConfig;
use crate::error::{Result, TriadError};

const GOOGLE_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    items: Option<Vec<GoogleItem>>,
}

#[derive(Debug, Deserialize)]
struct GoogleItem {
    snippet: Option<String>,
}

/// Google Custom Search client. Snippets come back in provider order.
pub struct SearchClient {
    client: Client,
    api_key: String,
    cx: String,
    max_results: usize,
}

impl SearchClient {
    pub fn new(config: &TriadConfig) -> Result<Self> {
        if config.google_api_key.is_empty() || config.google_cx.is_empty() {
            return Err(TriadError::Config(
                "GOOGLE_API_KEY and GOOGLE_CX must be set".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.search_timeout_secs))
            .build()
            .map_err(|e| TriadError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.google_api_key.clone(),
            cx: config.google_cx.clone(),
            max_results: config.search_max_results,
        })
    }
}

/// Pull the snippet list out of a search payload, preserving order.
/// Returns None when the payload has no result list at all.
fn extract_snippets(response: GoogleResponse) -> Option<Vec<String>> {
    let items = response.items?;
    Some(
        items
            .into_iter()
            .filter_map(|item| item.snippet)
            .collect(),
    )
}

#[async_trait]
impl SearchBackend for SearchClient {
    fn name(&self) -> &'static str {
        "google-cse"
    }

    async fn search(&self, query: &str) -> Result<Vec<String>> {
        // Google caps num at 10 per request
        let num = self.max_results.min(10).to_string();

        let response = self
            .client
            .get(GOOGLE_SEARCH_URL)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.cx.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(|e| TriadError::SearchUnavailable(format!("search request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(TriadError::SearchUnavailable(format!(
                "search backend returned {}",
                response.status()
            )));
        }

        let body: GoogleResponse = response
            .json()
            .await
            .map_err(|e| TriadError::SearchUnavailable(format!("malformed search payload: {e}")))?;

        extract_snippets(body).ok_or_else(|| {
            TriadError::SearchUnavailable("malformed search payload: no result list".to_string())
        })
    }
}
