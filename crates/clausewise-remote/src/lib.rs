//! Remote LLM layer: request construction, response decoding and prompt
//! handling for the hosted summarisation backends.

pub mod backend;
pub mod client;
pub mod prompt;

pub use backend::RemoteBackend;
pub use client::{RemoteClient, RemoteError};
pub use prompt::parse_points;
