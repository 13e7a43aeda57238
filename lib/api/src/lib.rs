//! # distrag API
//!
//! HTTP transport for a built [`Engine`](distrag_core::Engine):
//!
//! - `POST /chat` with `{"query": "..."}` returns `{"response": {...}}`
//! - `GET /health` reports the record count and embedding model

pub mod rest;

pub use rest::RestApi;
