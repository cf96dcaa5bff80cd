// src/llm/mod.rs
// LLM module exports and submodule declarations

pub mod client;
pub mod guard;

pub use client::CompletionClient;
pub use guard::GuardClient;
