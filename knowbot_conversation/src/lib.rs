#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Conversation session management.
//!
//! A [`SessionManager`] receives every line the user types, decides whether
//! it is a command (`clear`, `search:`, `wiki:`) or a chat turn, keeps a
//! bounded window of recent turns for the chat model, and always answers
//! with displayable text.
//!
//! # Key Features
//! - Sliding history window with FIFO eviction
//! - Case-insensitive command prefixes, matched only at the start of input
//! - Remote failures converted to user-safe messages, never propagated

mod command;
mod format;
mod history;
mod manager;

pub use command::Command;
pub use format::{
    ARTICLE_NOT_FOUND, MEMORY_CLEARED, NO_SEARCH_RESULTS, SEARCH_UNAVAILABLE, WIKI_UNAVAILABLE,
};
pub use history::{History, HistoryStats};
pub use manager::{SessionConfig, SessionManager};
