//! # Chat Feature
//!
//! Relays free-form user text to a remote completion API, with a TTL cache
//! in front so repeated prompts are answered without another API call.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: true

pub mod cache;
pub mod completion;

pub use cache::ResponseCache;
pub use completion::{CachedCompletion, CompletionClient, HttpCompletionClient};
