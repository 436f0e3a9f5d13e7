//! HTTP request handlers.

pub mod health_handler;
pub mod post_handler;
pub mod user_handler;

pub use health_handler::health;
pub use post_handler::post_routes;
pub use user_handler::user_routes;
