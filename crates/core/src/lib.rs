//! Domain types and collaborator seams for roomify project persistence.
//!
//! Everything here is transport-agnostic: the sync layer, the HTTP service,
//! and the storage/hosting backends all agree on these types.

pub mod auth;
pub mod error;
pub mod hosting;
pub mod image;
pub mod keys;
pub mod kv;
pub mod project;
pub mod render;
pub mod types;
pub mod wire;
