//! User handlers.

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

use common::{AppResult, OptionExt};
use domain::{
    CreateUser, OrderBy, SortDirection, UpdateUser, User, UserFilter, UserListParams,
    UserOrderField,
};

use crate::api::extractors::{ValidatedJson, ValidatedQuery};
use crate::api::AppState;

/// User creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// Optional caller-supplied identifier
    #[validate(length(min = 1, message = "Id cannot be empty"))]
    #[schema(example = "5f0c6d3e-8a4b-4a57-9d53-0d1c4bb3c0f1")]
    pub id: Option<String>,
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// User display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "John Doe")]
    pub name: String,
    /// User password, stored as given
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(request: CreateUserRequest) -> Self {
        CreateUser {
            id: request.id,
            email: request.email,
            name: request.name,
            password: request.password,
        }
    }
}

/// Partial user update; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: Option<String>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(request: UpdateUserRequest) -> Self {
        UpdateUser {
            email: request.email,
            name: request.name,
            password: request.password,
        }
    }
}

/// Optional list parameters for `GET /users`
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    /// Number of users to skip
    pub skip: Option<u64>,
    /// Maximum number of users to return
    pub take: Option<u64>,
    /// Id of the user the page starts at
    #[validate(length(min = 1, message = "Cursor cannot be empty"))]
    pub cursor: Option<String>,
    /// Field to order by
    pub order_by: Option<UserOrderField>,
    /// Sort direction (defaults to ascending)
    pub order: Option<SortDirection>,
    /// Only users with this email
    pub email: Option<String>,
    /// Only users with this name
    pub name: Option<String>,
}

impl From<UserListQuery> for UserListParams {
    fn from(query: UserListQuery) -> Self {
        UserListParams {
            skip: query.skip,
            take: query.take,
            cursor: query.cursor,
            filter: UserFilter {
                email: query.email,
                name: query.name,
            },
            order_by: query.order_by.map(|field| OrderBy {
                field,
                direction: query.order.unwrap_or_default(),
            }),
        }
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).patch(update_user).delete(delete_user))
}

/// List users
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    params(UserListQuery),
    responses(
        (status = 200, description = "Users matching the query", body = Vec<User>)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<UserListQuery>,
) -> AppResult<Json<Vec<User>>> {
    let users = state.users.find_all(query.into()).await?;
    Ok(Json(users))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Id or email already taken")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = state.users.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let user = state.users.find_one(&id).await?.ok_or_not_found()?;
    Ok(Json(user))
}

/// Update the provided user fields
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already taken")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    let user = state.users.update(&id, payload.into()).await?;
    Ok(Json(user))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Deleted user", body = User),
        (status = 404, description = "User not found"),
        (status = 409, description = "User still referenced by posts")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let user = state.users.remove(&id).await?;
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request},
    };
    use common::AppError;
    use tower::ServiceExt;

    use super::*;
    use crate::infra::{Database, MockPostRepository, MockUserRepository};

    fn sample_user(id: &str) -> User {
        User {
            id: id.to_string(),
            email: "test@example.com".to_string(),
            name: "Test User".to_string(),
            password: "password".to_string(),
        }
    }

    async fn app(users: MockUserRepository) -> Router {
        let state = AppState::new(
            Arc::new(users),
            Arc::new(MockPostRepository::new()),
            Arc::new(Database::in_memory().await),
        );
        user_routes().with_state(state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn list_forwards_query_parameters() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_all()
            .withf(|params| {
                params.skip == Some(1)
                    && params.take == Some(2)
                    && params.filter.name.as_deref() == Some("A")
                    && params.order_by == Some(OrderBy::desc(UserOrderField::Email))
            })
            .returning(|_| Ok(vec![sample_user("u2")]));

        let response = app(users)
            .await
            .oneshot(
                Request::builder()
                    .uri("/?skip=1&take=2&name=A&orderBy=email&order=desc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body[0]["id"], "u2");
    }

    #[tokio::test]
    async fn list_without_query_uses_default_params() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_all()
            .withf(|params| *params == UserListParams::default())
            .returning(|_| Ok(vec![]));

        let response = app(users)
            .await
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn create_returns_201_with_record() {
        let mut users = MockUserRepository::new();
        users
            .expect_create()
            .withf(|input| input.id.as_deref() == Some("u1") && input.email == "a@x.com")
            .returning(|input| {
                Ok(User {
                    id: input.id.unwrap_or_default(),
                    email: input.email,
                    name: input.name,
                    password: input.password,
                })
            });

        let response = app(users)
            .await
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"id":"u1","email":"a@x.com","name":"A","password":"p"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"id": "u1", "email": "a@x.com", "name": "A", "password": "p"})
        );
    }

    #[tokio::test]
    async fn create_rejects_invalid_email_before_repository() {
        let users = MockUserRepository::new();

        let response = app(users)
            .await
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"email":"nope","name":"A","password":"p"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_maps_constraint_violation_to_409() {
        let mut users = MockUserRepository::new();
        users
            .expect_create()
            .returning(|_| Err(AppError::constraint("idx_users_email")));

        let response = app(users)
            .await
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"email":"a@x.com","name":"A","password":"p"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn get_missing_user_is_404() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_one()
            .withf(|id| id == "missing")
            .returning(|_| Ok(None));

        let response = app(users)
            .await
            .oneshot(Request::builder().uri("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn patch_forwards_only_provided_fields() {
        let mut users = MockUserRepository::new();
        users
            .expect_update()
            .withf(|id, patch| {
                id == "u1"
                    && *patch
                        == UpdateUser {
                            name: Some("Updated User".to_string()),
                            ..Default::default()
                        }
            })
            .returning(|id, patch| {
                let mut user = sample_user(id);
                user.name = patch.name.unwrap_or_default();
                Ok(user)
            });

        let response = app(users)
            .await
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/u1")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"Updated User"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["name"], "Updated User");
    }

    #[tokio::test]
    async fn delete_returns_removed_record() {
        let mut users = MockUserRepository::new();
        users
            .expect_remove()
            .withf(|id| id == "u1")
            .returning(|id| Ok(sample_user(id)));

        let response = app(users)
            .await
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/u1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["id"], "u1");
    }

    #[tokio::test]
    async fn delete_missing_user_is_404() {
        let mut users = MockUserRepository::new();
        users.expect_remove().returning(|_| Err(AppError::NotFound));

        let response = app(users)
            .await
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/ghost")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
