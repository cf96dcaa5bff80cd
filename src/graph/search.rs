// src/graph/search.rs
// Search step: one retrieval pass per run, feeding snippets back to the
// responder. Failures degrade to an empty batch instead of propagating;
// this step always hands back a well-formed state.

use tracing::{info, warn};

use crate::backend::SearchBackend;
use crate::error::TriadError;
use crate::graph::types::{ConversationState, Route};

/// What a retrieval pass produced.
#[derive(Debug)]
pub enum SearchOutcome {
    /// Snippets in provider order
    Fetched(Vec<String>),
    /// Backend failed or returned a malformed payload; proceed without
    /// snippets
    Degraded,
}

pub async fn run_search(backend: &dyn SearchBackend, state: &mut ConversationState) -> Route {
    // One retrieval attempt per run; the responder guards this too.
    if state.search_attempted {
        info!("web search already performed, returning to responder");
        return Route::Responder;
    }

    let Some(query) = state.first_user_query().map(str::to_string) else {
        warn!(error = %TriadError::NoQuery, "skipping retrieval");
        return Route::Responder;
    };

    info!(query = %query, backend = backend.name(), "performing web search");

    let outcome = match backend.search(&query).await {
        Ok(snippets) => SearchOutcome::Fetched(snippets),
        Err(e) => {
            warn!("search degraded to empty batch: {e}");
            SearchOutcome::Degraded
        }
    };

    match outcome {
        SearchOutcome::Fetched(snippets) => {
            info!(snippets = snippets.len(), "web search complete");
            state.web_snippets = snippets;
        }
        SearchOutcome::Degraded => {}
    }

    // The attempt counts whether or not it produced snippets.
    state.search_attempted = true;
    state.search_needed = false;
    Route::Responder
}
