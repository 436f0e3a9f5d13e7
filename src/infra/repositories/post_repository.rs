//! Post repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryTrait, Set,
};

use super::entities::post::{self, ActiveModel, Entity as PostEntity};
use super::query::{find_many, SortColumn};
use common::{AppError, AppResult};
use domain::{generate_id, CreatePost, Post, PostFilter, PostListParams, PostOrderField, UpdatePost};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Post repository trait for dependency injection.
///
/// The author foreign key is checked by the store only.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post for an already resolved author id
    async fn create(&self, input: CreatePost) -> AppResult<Post>;

    /// List posts matching the parameters
    async fn find_all(&self, params: PostListParams) -> AppResult<Vec<Post>>;

    /// Find post by ID
    async fn find_one(&self, id: &str) -> AppResult<Option<Post>>;

    /// Apply the provided fields of `patch` and refresh `updated_at`
    async fn update(&self, id: &str, patch: UpdatePost) -> AppResult<Post>;

    /// Delete a post, returning the record as it was
    async fn remove(&self, id: &str) -> AppResult<Post>;
}

/// Concrete implementation of PostRepository
pub struct PostStore {
    db: DatabaseConnection,
}

impl PostStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl SortColumn<PostEntity> for PostOrderField {
    fn column(self) -> post::Column {
        match self {
            PostOrderField::Id => post::Column::Id,
            PostOrderField::Title => post::Column::Title,
            PostOrderField::CreatedAt => post::Column::CreatedAt,
            PostOrderField::UpdatedAt => post::Column::UpdatedAt,
        }
    }
}

fn filtered(filter: &PostFilter) -> sea_orm::Select<PostEntity> {
    PostEntity::find()
        .apply_if(filter.author_id.clone(), |query, author_id| {
            query.filter(post::Column::AuthorId.eq(author_id))
        })
        .apply_if(filter.title.clone(), |query, title| {
            query.filter(post::Column::Title.eq(title))
        })
}

#[async_trait]
impl PostRepository for PostStore {
    async fn create(&self, input: CreatePost) -> AppResult<Post> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(input.id.unwrap_or_else(generate_id)),
            title: Set(input.title),
            content: Set(input.content),
            created_at: Set(now),
            updated_at: Set(now),
            author_id: Set(input.author_id),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        tracing::debug!(post_id = %model.id, author_id = %model.author_id, "Post created");
        Ok(Post::from(model))
    }

    async fn find_all(&self, params: PostListParams) -> AppResult<Vec<Post>> {
        let models = find_many(
            &self.db,
            filtered(&params.filter),
            post::Column::Id,
            &params,
        )
        .await
        .map_err(AppError::from)?;

        Ok(models.into_iter().map(Post::from).collect())
    }

    async fn find_one(&self, id: &str) -> AppResult<Option<Post>> {
        let result = PostEntity::find_by_id(id.to_owned())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Post::from))
    }

    async fn update(&self, id: &str, patch: UpdatePost) -> AppResult<Post> {
        let post = PostEntity::find_by_id(id.to_owned())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = post.into();

        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(content) = patch.content {
            active.content = Set(content);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        tracing::debug!(post_id = %model.id, "Post updated");
        Ok(Post::from(model))
    }

    async fn remove(&self, id: &str) -> AppResult<Post> {
        let post = PostEntity::find_by_id(id.to_owned())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let result = PostEntity::delete_by_id(id.to_owned())
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        // Removed by a concurrent request between the lookup and the delete
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        tracing::debug!(post_id = %post.id, "Post removed");
        Ok(Post::from(post))
    }
}
