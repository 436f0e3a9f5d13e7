//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::infra::{Database, PostRepository, PostStore, UserRepository, UserStore};

/// Application state shared by every handler.
///
/// Repositories are trait objects so tests can substitute mocks.
#[derive(Clone)]
pub struct AppState {
    /// User repository
    pub users: Arc<dyn UserRepository>,
    /// Post repository
    pub posts: Arc<dyn PostRepository>,
    /// Database handle (health checks)
    pub database: Arc<Database>,
}

impl AppState {
    /// Build the SeaORM-backed repositories over one shared connection pool.
    pub fn from_database(database: Arc<Database>) -> Self {
        let users = Arc::new(UserStore::new(database.get_connection()));
        let posts = Arc::new(PostStore::new(database.get_connection()));

        Self::new(users, posts, database)
    }

    /// Create application state with manually injected repositories.
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            users,
            posts,
            database,
        }
    }
}
