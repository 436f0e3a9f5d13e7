//! Post handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::{AppError, AppResult, OptionExt};
use domain::{
    resolve_author, AuthorReference, CreatePost, OrderBy, Post, PostFilter, PostListParams,
    PostOrderField, SortDirection, UpdatePost,
};

use crate::api::extractors::{ValidatedJson, ValidatedQuery};
use crate::api::AppState;

/// Post creation request.
///
/// The author is given either as `author.connect.id` or as `authorId`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    /// Optional caller-supplied identifier
    #[validate(length(min = 1, message = "Id cannot be empty"))]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Title is required"))]
    #[schema(example = "Hello world")]
    pub title: String,
    #[schema(example = "First post")]
    pub content: String,
    /// Nested reference to an existing user
    pub author: Option<AuthorReference>,
    /// Id of an existing user
    pub author_id: Option<String>,
}

impl TryFrom<CreatePostRequest> for CreatePost {
    type Error = AppError;

    fn try_from(request: CreatePostRequest) -> Result<Self, Self::Error> {
        let author_id = resolve_author(request.author, request.author_id)?;

        Ok(CreatePost {
            id: request.id,
            title: request.title,
            content: request.content,
            author_id,
        })
    }
}

/// Partial post update; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    pub content: Option<String>,
}

impl From<UpdatePostRequest> for UpdatePost {
    fn from(request: UpdatePostRequest) -> Self {
        UpdatePost {
            title: request.title,
            content: request.content,
        }
    }
}

/// Optional list parameters for `GET /posts`
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PostListQuery {
    /// Number of posts to skip
    pub skip: Option<u64>,
    /// Maximum number of posts to return
    pub take: Option<u64>,
    /// Id of the post the page starts at
    #[validate(length(min = 1, message = "Cursor cannot be empty"))]
    pub cursor: Option<String>,
    /// Field to order by
    pub order_by: Option<PostOrderField>,
    /// Sort direction (defaults to ascending)
    pub order: Option<SortDirection>,
    /// Only posts by this author
    pub author_id: Option<String>,
    /// Only posts with this title
    pub title: Option<String>,
}

impl From<PostListQuery> for PostListParams {
    fn from(query: PostListQuery) -> Self {
        PostListParams {
            skip: query.skip,
            take: query.take,
            cursor: query.cursor,
            filter: PostFilter {
                author_id: query.author_id,
                title: query.title,
            },
            order_by: query.order_by.map(|field| OrderBy {
                field,
                direction: query.order.unwrap_or_default(),
            }),
        }
    }
}

/// Create post routes
pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/:id", get(get_post).patch(update_post).delete(delete_post))
}

/// List posts
#[utoipa::path(
    get,
    path = "/posts",
    tag = "Posts",
    params(PostListQuery),
    responses(
        (status = 200, description = "Posts matching the query", body = Vec<Post>)
    )
)]
pub async fn list_posts(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<PostListQuery>,
) -> AppResult<Json<Vec<Post>>> {
    let posts = state.posts.find_all(query.into()).await?;
    Ok(Json(posts))
}

/// Create a post for an existing author
#[utoipa::path(
    post,
    path = "/posts",
    tag = "Posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = Post),
        (status = 400, description = "Validation error or missing author"),
        (status = 409, description = "Id taken or author does not exist")
    )
)]
pub async fn create_post(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreatePostRequest>,
) -> AppResult<(StatusCode, Json<Post>)> {
    let post = state.posts.create(payload.try_into()?).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// Get post by ID
#[utoipa::path(
    get,
    path = "/posts/{id}",
    tag = "Posts",
    params(
        ("id" = String, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Post", body = Post),
        (status = 404, description = "Post not found")
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Post>> {
    let post = state.posts.find_one(&id).await?.ok_or_not_found()?;
    Ok(Json(post))
}

/// Update the provided post fields
#[utoipa::path(
    patch,
    path = "/posts/{id}",
    tag = "Posts",
    params(
        ("id" = String, Path, description = "Post ID")
    ),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Updated post", body = Post),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdatePostRequest>,
) -> AppResult<Json<Post>> {
    let post = state.posts.update(&id, payload.into()).await?;
    Ok(Json(post))
}

/// Delete a post
#[utoipa::path(
    delete,
    path = "/posts/{id}",
    tag = "Posts",
    params(
        ("id" = String, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Deleted post", body = Post),
        (status = 404, description = "Post not found")
    )
)]
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Post>> {
    let post = state.posts.remove(&id).await?;
    Ok(Json(post))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request},
    };
    use chrono::Utc;
    use tower::ServiceExt;

    use super::*;
    use crate::infra::{Database, MockPostRepository, MockUserRepository};

    fn sample_post(id: &str) -> Post {
        let now = Utc::now();
        Post {
            id: id.to_string(),
            title: "Hello".to_string(),
            content: "World".to_string(),
            created_at: now,
            updated_at: now,
            author_id: "u1".to_string(),
        }
    }

    async fn app(posts: MockPostRepository) -> Router {
        let state = AppState::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(posts),
            Arc::new(Database::in_memory().await),
        );
        post_routes().with_state(state)
    }

    fn json_request(method: &str, uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn create_with_nested_author_reference() {
        let mut posts = MockPostRepository::new();
        posts
            .expect_create()
            .withf(|input| input.author_id == "u1" && input.title == "Hello")
            .returning(|input| {
                let mut post = sample_post("p1");
                post.author_id = input.author_id;
                Ok(post)
            });

        let response = app(posts)
            .await
            .oneshot(json_request(
                "POST",
                "/",
                r#"{"title":"Hello","content":"World","author":{"connect":{"id":"u1"}}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["authorId"], "u1");
        assert!(body["createdAt"].is_string());
    }

    #[tokio::test]
    async fn create_with_raw_author_id() {
        let mut posts = MockPostRepository::new();
        posts
            .expect_create()
            .withf(|input| input.author_id == "u2" && input.id.as_deref() == Some("p9"))
            .returning(|input| {
                let mut post = sample_post("p9");
                post.author_id = input.author_id;
                Ok(post)
            });

        let response = app(posts)
            .await
            .oneshot(json_request(
                "POST",
                "/",
                r#"{"id":"p9","title":"Hello","content":"World","authorId":"u2"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["authorId"], "u2");
    }

    #[tokio::test]
    async fn create_without_author_is_400() {
        let posts = MockPostRepository::new();

        let response = app(posts)
            .await
            .oneshot(json_request(
                "POST",
                "/",
                r#"{"title":"Hello","content":"World"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn create_for_unknown_author_is_409() {
        let mut posts = MockPostRepository::new();
        posts
            .expect_create()
            .returning(|_| Err(AppError::constraint("fk_posts_author_id")));

        let response = app(posts)
            .await
            .oneshot(json_request(
                "POST",
                "/",
                r#"{"title":"Hello","content":"World","authorId":"ghost"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn list_forwards_filter_and_order() {
        let mut posts = MockPostRepository::new();
        posts
            .expect_find_all()
            .withf(|params| {
                params.filter.author_id.as_deref() == Some("u1")
                    && params.cursor.as_deref() == Some("p2")
                    && params.order_by == Some(OrderBy::asc(PostOrderField::CreatedAt))
            })
            .returning(|_| Ok(vec![sample_post("p2"), sample_post("p3")]));

        let response = app(posts)
            .await
            .oneshot(
                Request::builder()
                    .uri("/?authorId=u1&cursor=p2&orderBy=createdAt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await.as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn get_missing_post_is_404() {
        let mut posts = MockPostRepository::new();
        posts.expect_find_one().returning(|_| Ok(None));

        let response = app(posts)
            .await
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn patch_updates_title() {
        let mut posts = MockPostRepository::new();
        posts
            .expect_update()
            .withf(|id, patch| id == "p1" && patch.title.as_deref() == Some("New") && patch.content.is_none())
            .returning(|id, patch| {
                let mut post = sample_post(id);
                post.title = patch.title.unwrap_or_default();
                Ok(post)
            });

        let response = app(posts)
            .await
            .oneshot(json_request("PATCH", "/p1", r#"{"title":"New"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["title"], "New");
    }

    #[tokio::test]
    async fn delete_returns_removed_record() {
        let mut posts = MockPostRepository::new();
        posts
            .expect_remove()
            .withf(|id| id == "p1")
            .returning(|id| Ok(sample_post(id)));

        let response = app(posts)
            .await
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/p1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["id"], "p1");
    }
}
