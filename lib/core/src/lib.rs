//! # distrag Core
//!
//! Core library for distrag, a retrieval chatbot over district-level
//! rainfall, groundwater and population records.
//!
//! This crate provides the whole retrieval-and-response pipeline:
//!
//! - [`RecordStore`] - Loads and validates the dataset
//! - [`text`] - Canonical text projection of a [`Record`] and its exact inverse
//! - [`Embedder`] - The seam for embedding models
//! - [`FlatIndex`] - Exact L2 k-nearest-neighbour index
//! - [`Retriever`] - Query embedding plus thresholded top-k lookup
//! - [`Composer`] - Turns retrieved text into a [`Response`]
//! - [`Gatekeeper`] - Deny-list query filter
//! - [`Engine`] - The immutable context tying them together
//!
//! ## Example
//!
//! ```rust
//! use distrag_core::{Embedder, Engine, EngineConfig, RecordStore, Result, Vector};
//! use std::sync::Arc;
//!
//! struct Constant;
//!
//! impl Embedder for Constant {
//!     fn dim(&self) -> usize { 2 }
//!     fn model_name(&self) -> &str { "constant" }
//!     fn encode(&self, _text: &str) -> Result<Vector> { Ok(Vector::new(vec![1.0, 0.0])) }
//! }
//!
//! let store = RecordStore::from_json_str(r#"[{"output": {
//!     "district": "Ariyalur", "lat": 11.14, "lon": 79.08, "year": 2020,
//!     "scenario": "baseline", "population_estimate": 754894,
//!     "avg_annual_rainfall_mm": 950.5, "groundwater_level_m": 5.2
//! }}]"#).unwrap();
//!
//! let engine = Engine::build(store, Arc::new(Constant), EngineConfig::default()).unwrap();
//! let response = engine.handle_query("Ariyalur rainfall in 2020");
//! assert_eq!(response.rows.len(), 1);
//! ```

pub mod compose;
pub mod config;
pub mod embedder;
pub mod engine;
pub mod error;
pub mod gate;
pub mod index;
pub mod record;
pub mod response;
pub mod retriever;
pub mod text;
pub mod vector;

pub use compose::Composer;
pub use config::EngineConfig;
pub use embedder::Embedder;
pub use engine::Engine;
pub use error::{Error, Result};
pub use gate::{Gatekeeper, Verdict};
pub use index::{FlatIndex, Neighbor};
pub use record::{Record, RecordStore};
pub use response::{Chart, Response, ResponseKind, TableRow};
pub use retriever::{RetrievedDocument, Retriever};
pub use vector::Vector;
