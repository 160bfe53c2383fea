//! services/api/src/lib.rs
//!
//! The API service library: configuration, file decoding, the AI and storage
//! adapters, and the Axum web layer. The `api` binary wires these together.

pub mod adapters;
pub mod config;
pub mod error;
pub mod extract;
pub mod web;
