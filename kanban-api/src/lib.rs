//! # Kanban Board Server Library
//!
//! HTTP front end for the kanban board: one HTML page with three lanes,
//! form routes for accounts and tasks, and cookie-backed sessions.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Session resolution and security headers
//! - `routes`: Route handlers
//! - `view`: Board page rendering

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod view;
