// src/error.rs
// Standardized error types for the triad graph and its backends

use thiserror::Error;

/// Main error type for the triad library
#[derive(Error, Debug)]
pub enum TriadError {
    #[error("conversation has no messages to act on")]
    EmptyConversation,

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("search unavailable: {0}")]
    SearchUnavailable(String),

    #[error("unknown route: {node} emitted {route}")]
    UnknownRoute { node: &'static str, route: String },

    #[error("no user query found in conversation")]
    NoQuery,

    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Result using TriadError
pub type Result<T> = std::result::Result<T, TriadError>;
