//! # distrag
//!
//! A retrieval chatbot over district-level environmental records: rainfall,
//! groundwater level and population by district, year and scenario.
//!
//! Records are projected into canonical text, embedded, and held in an exact
//! L2 index. A question is filtered, embedded, matched against the index under
//! a distance threshold, and the hits are parsed back into a table (plus a
//! rainfall chart when the question names a district).
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! distrag --data data.json --http-port 5000
//! curl -X POST localhost:5000/chat -H 'content-type: application/json' \
//!      -d '{"query": "Ariyalur rainfall in 2020"}'
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use distrag::prelude::*;
//! use std::sync::Arc;
//!
//! let store = RecordStore::load("data.json").unwrap();
//! let engine = Engine::build(store, Arc::new(HashingEmbedder::default()), EngineConfig::default()).unwrap();
//!
//! let response = engine.handle_query("Ariyalur rainfall in 2020");
//! println!("{}", response);
//! ```
//!
//! ## Crate Structure
//!
//! - `distrag-core` - Records, canonical text, index, retriever, composer, engine
//! - `distrag-embed` - Embedding providers (feature hashing, HTTP model servers)
//! - `distrag-api` - REST API

// Re-export core types
pub use distrag_core::{
    Chart, Composer, Embedder, Engine, EngineConfig, Error, FlatIndex, Gatekeeper, Neighbor,
    Record, RecordStore, Response, ResponseKind, Result, RetrievedDocument, Retriever, TableRow,
    Vector, Verdict,
};

// Re-export canonical text helpers
pub use distrag_core::text;

// Re-export embedders
pub use distrag_embed::{HashingEmbedder, HttpEmbedder, HttpEmbedderConfig};

// Re-export API
pub use distrag_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Embedder, Engine, EngineConfig, Error, HashingEmbedder, HttpEmbedder, HttpEmbedderConfig,
        RecordStore, Response, ResponseKind, Result, RestApi,
    };
}
