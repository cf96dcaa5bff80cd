// src/graph/types.rs
// Conversation state threaded through the graph, plus the routing token.

use serde::{Deserialize, Serialize};

/// Message author. Fixed at append time, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A single conversation turn. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Routing token emitted by each step: which node runs next.
///
/// A closed enum consumed by an exhaustive transition function; there is no
/// string comparison anywhere in the routing path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Moderation,
    Responder,
    Search,
    End,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Moderation => "moderation",
            Self::Responder => "responder",
            Self::Search => "search",
            Self::End => "end",
        }
    }
}

/// The mutable record threaded through every step of one run.
///
/// Owned exclusively by the orchestrator for the duration of a request;
/// created fresh per query and discarded once the final answer is out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    /// Conversation log, append-only within a run
    pub messages: Vec<Message>,
    /// Most recent retrieval batch; cleared once consumed
    pub web_snippets: Vec<String>,
    /// Responder's request for retrieval
    pub search_needed: bool,
    /// One-shot guard; true after the first retrieval pass
    pub search_attempted: bool,
    /// True once an assistant turn has been appended
    pub response_generated: bool,
    /// False permanently once moderation flags unsafe content
    pub allowed: bool,
}

impl ConversationState {
    /// Fresh state seeded with a single user message.
    pub fn seeded(query: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(query)],
            web_snippets: Vec::new(),
            search_needed: false,
            search_attempted: false,
            response_generated: false,
            allowed: true,
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Content of the first user message, if any.
    pub fn first_user_query(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }

    /// The last assistant message: the run's final answer once terminated.
    pub fn final_answer(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_state_defaults() {
        let state = ConversationState::seeded("hello");
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].role, Role::User);
        assert!(state.allowed);
        assert!(!state.search_attempted);
        assert!(!state.response_generated);
        assert!(state.web_snippets.is_empty());
    }

    #[test]
    fn final_answer_is_last_assistant_turn() {
        let mut state = ConversationState::seeded("q");
        assert_eq!(state.final_answer(), None);

        state.messages.push(Message::assistant("tentative"));
        state.messages.push(Message::assistant("grounded"));
        assert_eq!(state.final_answer(), Some("grounded"));
        assert_eq!(state.first_user_query(), Some("q"));
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert!(json.contains(r#""role":"user""#));
    }
}
