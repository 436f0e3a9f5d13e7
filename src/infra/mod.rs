//! Infrastructure layer - External systems integration
//!
//! This module handles the relational store:
//! - Database connection and migrations
//! - SeaORM entities and repositories

pub mod db;
pub mod repositories;

pub use db::{Database, Migrator};
pub use repositories::{PostRepository, PostStore, UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockPostRepository, MockUserRepository};
