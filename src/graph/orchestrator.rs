// src/graph/orchestrator.rs
// The state machine driving one request to completion.
//
// Nodes: Moderation -> (Responder <-> Search, one retrieval round) ->
// Moderation -> End. Each step emits a Route; the transition function
// matches (node, route) exhaustively and rejects anything outside the
// table, so a buggy step can never spin the machine silently.

use std::sync::Arc;

use tracing::{Instrument, debug, error, info};
use uuid::Uuid;

use crate::backend::{CompletionBackend, SafetyBackend, SearchBackend};
use crate::error::{Result, TriadError};
use crate::graph::types::{ConversationState, Route};
use crate::graph::{moderation, responder, search};

/// Defensive upper bound on steps per run. The longest legal path is five
/// steps (moderation, responder, search, responder, moderation).
const DEFAULT_MAX_STEPS: usize = 8;

/// Graph node currently holding control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Moderation,
    Responder,
    Search,
    End,
}

impl Node {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Moderation => "moderation",
            Self::Responder => "responder",
            Self::Search => "search",
            Self::End => "end",
        }
    }
}

/// Apply the transition table. Anything outside it is a bug in a step
/// implementation and terminates the run.
fn transition(node: Node, route: Route) -> Result<Node> {
    match (node, route) {
        (Node::Moderation, Route::Responder) => Ok(Node::Responder),
        (Node::Moderation, Route::End) => Ok(Node::End),
        (Node::Responder, Route::Moderation) => Ok(Node::Moderation),
        (Node::Responder, Route::Search) => Ok(Node::Search),
        (Node::Search, Route::Responder) => Ok(Node::Responder),
        (node, route) => Err(TriadError::UnknownRoute {
            node: node.as_str(),
            route: route.as_str().to_string(),
        }),
    }
}

/// Drives a single query through the fixed agent graph.
///
/// Holds shared backend handles only; every run owns a private
/// ConversationState, so instances are cheap to share across requests.
pub struct Orchestrator {
    llm: Arc<dyn CompletionBackend>,
    safety: Arc<dyn SafetyBackend>,
    search: Arc<dyn SearchBackend>,
    max_steps: usize,
}

impl Orchestrator {
    pub fn new(
        llm: Arc<dyn CompletionBackend>,
        safety: Arc<dyn SafetyBackend>,
        search: Arc<dyn SearchBackend>,
    ) -> Self {
        Self {
            llm,
            safety,
            search,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Run one query to completion and return the final transcript.
    pub async fn run(&self, user_input: &str) -> Result<ConversationState> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("triad_run", %run_id);

        async {
            let mut state = ConversationState::seeded(user_input);
            self.drive(&mut state).await?;
            info!(
                messages = state.messages.len(),
                allowed = state.allowed,
                "run terminated"
            );
            Ok(state)
        }
        .instrument(span)
        .await
    }

    async fn drive(&self, state: &mut ConversationState) -> Result<()> {
        let mut node = Node::Moderation;
        let mut steps = 0;

        while node != Node::End {
            steps += 1;
            if steps > self.max_steps {
                error!(state = ?state, steps, "step budget exceeded, aborting run");
                return Err(TriadError::UnknownRoute {
                    node: node.as_str(),
                    route: format!("step budget of {} exceeded", self.max_steps),
                });
            }

            let route = match node {
                Node::Moderation => moderation::moderate(self.safety.as_ref(), state).await?,
                Node::Responder => responder::respond(self.llm.as_ref(), state).await?,
                Node::Search => search::run_search(self.search.as_ref(), state).await,
                // Loop condition excludes End
                Node::End => unreachable!("terminal node re-entered"),
            };

            debug!(from = node.as_str(), to = route.as_str(), "transition");

            node = transition(node, route).inspect_err(|e| {
                error!(state = ?state, "routing invariant violated: {e}");
            })?;
        }

        Ok(())
    }
}
