// src/state.rs
// Shared application state: injected backend ports plus an explicit
// readiness flag. Nothing here is request-scoped; each request gets its own
// ConversationState from the orchestrator.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{info, warn};

use crate::backend::{CompletionBackend, SafetyBackend, SearchBackend};
use crate::config::TriadConfig;
use crate::graph::Orchestrator;
use crate::llm::{CompletionClient, GuardClient};
use crate::search::SearchClient;

pub struct AppState {
    pub orchestrator: Orchestrator,
    /// Completion handle kept for the warmup probe
    llm: Arc<dyn CompletionBackend>,
    /// Flips once the warmup probe succeeds; requests are rejected with a
    /// retryable status until then.
    ready: AtomicBool,
}

impl AppState {
    pub fn new(
        llm: Arc<dyn CompletionBackend>,
        safety: Arc<dyn SafetyBackend>,
        search: Arc<dyn SearchBackend>,
        max_steps: usize,
    ) -> Self {
        Self {
            orchestrator: Orchestrator::new(Arc::clone(&llm), safety, search)
                .with_max_steps(max_steps),
            llm,
            ready: AtomicBool::new(false),
        }
    }

    pub fn ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }
}

/// Wire the real backend clients into an AppState.
pub fn create_app_state(config: &TriadConfig) -> anyhow::Result<Arc<AppState>> {
    let completion = CompletionClient::new(config)?;
    let guard_llm: Arc<dyn CompletionBackend> =
        Arc::new(completion.with_model(&config.guard_model));

    let llm: Arc<dyn CompletionBackend> = Arc::new(completion);
    let safety: Arc<dyn SafetyBackend> = Arc::new(GuardClient::new(
        guard_llm,
        config.restricted_topic.clone(),
    ));
    let search: Arc<dyn SearchBackend> = Arc::new(SearchClient::new(config)?);

    Ok(Arc::new(AppState::new(llm, safety, search, config.max_steps)))
}

/// Probe the completion backend in the background until it answers, then
/// mark the service ready. Requests arriving before that get 503.
pub fn spawn_warmup(state: Arc<AppState>, retry_interval: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match state.llm.complete("Reply with the single word OK.").await {
                Ok(_) => {
                    state.mark_ready();
                    info!("backend warmup complete, accepting requests");
                    return;
                }
                Err(e) => {
                    warn!("backend warmup probe failed, retrying: {e}");
                    tokio::time::sleep(retry_interval).await;
                }
            }
        }
    })
}
