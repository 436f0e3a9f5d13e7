//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use blog_api::infra::{Database, PostRepository, PostStore, UserRepository, UserStore};
use blog_api::AppState;
use common::DatabaseConfig;
use domain::{CreatePost, CreateUser, Post, User};

/// Fresh in-memory SQLite database with all migrations applied.
///
/// A single pooled connection keeps the in-memory schema alive.
pub async fn test_database() -> Database {
    let config = DatabaseConfig {
        max_connections: 1,
        min_connections: 1,
        ..DatabaseConfig::with_url("sqlite::memory:")
    };

    Database::connect(&config)
        .await
        .expect("in-memory database should initialize")
}

/// Application state backed by a fresh in-memory database.
pub async fn test_state() -> AppState {
    AppState::from_database(Arc::new(test_database().await))
}

pub async fn user_store() -> UserStore {
    UserStore::new(test_database().await.get_connection())
}

pub async fn stores() -> (UserStore, PostStore) {
    let db = test_database().await;
    (
        UserStore::new(db.get_connection()),
        PostStore::new(db.get_connection()),
    )
}

pub fn new_user(id: &str, email: &str, name: &str) -> CreateUser {
    CreateUser {
        id: Some(id.to_string()),
        email: email.to_string(),
        name: name.to_string(),
        password: "secret".to_string(),
    }
}

pub fn new_post(id: &str, title: &str, author_id: &str) -> CreatePost {
    CreatePost {
        id: Some(id.to_string()),
        title: title.to_string(),
        content: format!("{title} body"),
        author_id: author_id.to_string(),
    }
}

pub async fn seed_user(users: &impl UserRepository, id: &str, email: &str, name: &str) -> User {
    users
        .create(new_user(id, email, name))
        .await
        .expect("user should be created")
}

pub async fn seed_post(posts: &impl PostRepository, id: &str, title: &str, author_id: &str) -> Post {
    posts
        .create(new_post(id, title, author_id))
        .await
        .expect("post should be created")
}

pub fn user_ids(users: &[User]) -> Vec<&str> {
    users.iter().map(|user| user.id.as_str()).collect()
}

pub fn post_ids(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|post| post.id.as_str()).collect()
}
