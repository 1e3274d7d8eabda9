#![deny(
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

//! HTTP implementations of the knowbot collaborators.

mod duckduckgo;
mod http;
mod openrouter;
mod wikipedia;

pub use duckduckgo::DuckDuckGoSearch;
pub use openrouter::OpenRouterProvider;
pub use wikipedia::WikipediaProvider;
