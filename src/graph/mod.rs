// src/graph/mod.rs
//! Agent graph: a moderation gate, a responder with an uncertainty check,
//! and a single-shot web-search fallback, driven by a fixed state machine.
//!
//! Topology is hard-wired (three node types, one entry point); the only
//! cycle is responder -> search -> responder, bounded to one iteration by
//! the `search_attempted` guard.

pub mod moderation;
pub mod orchestrator;
pub mod responder;
pub mod search;
pub mod types;

pub use orchestrator::Orchestrator;
pub use search::SearchOutcome;
pub use types::{ConversationState, Message, Role, Route};
