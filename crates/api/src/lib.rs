//! Roomify project service library.
//!
//! A per-user, namespaced key-value facade over HTTP (`save` / `list` /
//! `get`). Exposes config, state, error handling, and routes so integration
//! tests and the binary entrypoint share them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
