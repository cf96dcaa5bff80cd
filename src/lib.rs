// src/lib.rs

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod graph;
pub mod llm;
pub mod search;
pub mod state;
