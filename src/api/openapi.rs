//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI at `/swagger-ui`.

use utoipa::OpenApi;

use crate::api::handlers::{health_handler, post_handler, user_handler};
use domain::{
    AuthorReference, ConnectById, Post, PostOrderField, SortDirection, User, UserOrderField,
};

/// OpenAPI documentation for the blog API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blog API",
        version = "0.1.0",
        description = "Users and their posts over a relational store",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        health_handler::health,
        // User endpoints
        user_handler::list_users,
        user_handler::create_user,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::delete_user,
        // Post endpoints
        post_handler::list_posts,
        post_handler::create_post,
        post_handler::get_post,
        post_handler::update_post,
        post_handler::delete_post,
    ),
    components(
        schemas(
            // Records
            User,
            Post,
            // Requests
            user_handler::CreateUserRequest,
            user_handler::UpdateUserRequest,
            post_handler::CreatePostRequest,
            post_handler::UpdatePostRequest,
            AuthorReference,
            ConnectById,
            // Listing
            UserOrderField,
            PostOrderField,
            SortDirection,
            health_handler::HealthResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service liveness"),
        (name = "Users", description = "User management operations"),
        (name = "Posts", description = "Post management operations")
    )
)]
pub struct ApiDoc;
