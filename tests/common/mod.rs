// tests/common/mod.rs
// Scripted backend ports shared by the integration tests. Each mock counts
// its invocations so tests can assert call budgets.
#![allow(dead_code)] // not every test binary uses every helper

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use triad::backend::{Classification, CompletionBackend, SafetyBackend, SearchBackend};
use triad::error::{Result, TriadError};

/// Completion backend that replays a fixed script of replies and records
/// every prompt it was handed.
pub struct ScriptedCompletions {
    replies: Mutex<VecDeque<String>>,
    pub prompts: Mutex<Vec<String>>,
    pub calls: AtomicUsize,
}

impl ScriptedCompletions {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompt(&self, index: usize) -> String {
        self.prompts.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedCompletions {
    fn name(&self) -> &'static str {
        "scripted-completions"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TriadError::BackendUnavailable("completion script exhausted".to_string()))
    }
}

/// Safety backend returning the same classification for every input.
pub struct StaticSafety {
    classification: Classification,
    pub calls: AtomicUsize,
}

impl StaticSafety {
    pub fn safe() -> Self {
        Self {
            classification: Classification::safe(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unsafe_with(categories: &[&str]) -> Self {
        Self {
            classification: Classification::unsafe_with(
                categories.iter().map(|c| c.to_string()).collect(),
            ),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SafetyBackend for StaticSafety {
    fn name(&self) -> &'static str {
        "static-safety"
    }

    async fn classify(&self, _text: &str) -> Result<Classification> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.classification.clone())
    }
}

/// Search backend that either serves a fixed snippet batch or fails the way
/// a malformed provider payload does.
pub enum SearchScript {
    Snippets(Vec<String>),
    Unavailable,
}

pub struct ScriptedSearch {
    script: SearchScript,
    pub calls: AtomicUsize,
}

impl ScriptedSearch {
    pub fn snippets(snippets: &[&str]) -> Self {
        Self {
            script: SearchScript::Snippets(snippets.iter().map(|s| s.to_string()).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            script: SearchScript::Unavailable,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchBackend for ScriptedSearch {
    fn name(&self) -> &'static str {
        "scripted-search"
    }

    async fn search(&self, _query: &str) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            SearchScript::Snippets(snippets) => Ok(snippets.clone()),
            SearchScript::Unavailable => Err(TriadError::SearchUnavailable(
                "malformed search payload: no result list".to_string(),
            )),
        }
    }
}
