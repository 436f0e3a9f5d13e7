//! Domain layer - Core entities and value objects.
//!
//! This crate contains pure domain types with no infrastructure dependencies.
//! Records, create/update payloads and list parameters for users and posts
//! live here and are shared by the repositories and the HTTP layer.

pub mod error;
pub mod post;
pub mod query;
pub mod user;

pub use error::{DomainError, DomainResult};
pub use post::{
    resolve_author, AuthorReference, ConnectById, CreatePost, Post, PostFilter, PostListParams,
    PostOrderField, UpdatePost,
};
pub use query::{ListParams, OrderBy, SortDirection};
pub use user::{CreateUser, UpdateUser, User, UserFilter, UserListParams, UserOrderField};

/// Generate a server-side record identifier (UUID v4, hyphenated).
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
