// src/backend/mod.rs
// Backend Ports - the capability interfaces the graph depends on.
//
// The graph never talks to a provider directly: it sees three narrow,
// provider-agnostic traits, injected as Arc<dyn ...> handles that are safe
// to share across in-flight requests. Retry and timeout policy belongs to
// the implementations behind these traits, never to the graph steps.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Safety verdict for a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Safe,
    Unsafe,
}

/// Result of a safety classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub verdict: Verdict,
    /// Matched policy categories, in the order the classifier reported them.
    /// Empty when the verdict is Safe.
    pub categories: Vec<String>,
}

impl Classification {
    pub fn safe() -> Self {
        Self {
            verdict: Verdict::Safe,
            categories: Vec::new(),
        }
    }

    pub fn unsafe_with(categories: Vec<String>) -> Self {
        Self {
            verdict: Verdict::Unsafe,
            categories,
        }
    }

    pub fn is_unsafe(&self) -> bool {
        self.verdict == Verdict::Unsafe
    }
}

/// Text completion service
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// Generate a completion for a prompt.
    /// Fails with `TriadError::BackendUnavailable` on transport/model failure.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Safety classification service
#[async_trait]
pub trait SafetyBackend: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// Classify a piece of text against the safety policy.
    /// Fails with `TriadError::BackendUnavailable` on transport/model failure.
    async fn classify(&self, text: &str) -> Result<Classification>;
}

/// Snippet retrieval service
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// Retrieve snippets for a query, preserving provider order.
    /// Fails with `TriadError::SearchUnavailable`; callers degrade to an
    /// empty batch rather than propagating.
    async fn search(&self, query: &str) -> Result<Vec<String>>;
}
