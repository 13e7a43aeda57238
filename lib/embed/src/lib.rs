//! # distrag Embed
//!
//! [`Embedder`](distrag_core::Embedder) implementations:
//!
//! - [`HashingEmbedder`] - offline feature hashing, no model files needed
//! - [`HttpEmbedder`] - sentence-embedding models behind an OpenAI-compatible
//!   `/embeddings` endpoint

pub mod hashing;
pub mod http;

pub use hashing::HashingEmbedder;
pub use http::{HttpEmbedder, HttpEmbedderConfig};
