//! Blog API - users and their posts over HTTP
//!
//! A REST backend with Axum and SeaORM exposing create/list/get/update/delete
//! for users and posts, where every post references an existing user.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **infra**: Database connection, migrations, entities and repositories
//! - **api**: HTTP handlers, extractors, and routes
//!
//! Domain types live in the `domain` crate, errors and shared config
//! structs in the `common` crate.
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod infra;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use common::{AppError, AppResult};
pub use config::Config;
pub use domain::{Post, User};
