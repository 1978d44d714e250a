//! # Kanban Shared Library
//!
//! Domain types, storage and authentication for the kanban board server.
//!
//! ## Module Organization
//!
//! - `models`: Users, tasks and the three board lanes
//! - `store`: Storage traits with PostgreSQL and in-memory engines
//! - `db`: Connection pool and migrations for the PostgreSQL engine
//! - `auth`: Password hashing, credential checks and sessions
//! - `board`: Task lifecycle and lane transitions

pub mod auth;
pub mod board;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
