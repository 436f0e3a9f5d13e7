//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryTrait, Set,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::query::{find_many, SortColumn};
use common::{AppError, AppResult};
use domain::{generate_id, CreateUser, UpdateUser, User, UserFilter, UserListParams, UserOrderField};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Store errors are returned as-is through [`AppError`]'s conversion; no
/// operation pre-checks uniqueness or existence.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user; the id is generated when absent
    async fn create(&self, input: CreateUser) -> AppResult<User>;

    /// List users matching the parameters
    async fn find_all(&self, params: UserListParams) -> AppResult<Vec<User>>;

    /// Find user by ID
    async fn find_one(&self, id: &str) -> AppResult<Option<User>>;

    /// Apply the provided fields of `patch`
    async fn update(&self, id: &str, patch: UpdateUser) -> AppResult<User>;

    /// Delete a user, returning the record as it was
    async fn remove(&self, id: &str) -> AppResult<User>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl SortColumn<UserEntity> for UserOrderField {
    fn column(self) -> user::Column {
        match self {
            UserOrderField::Id => user::Column::Id,
            UserOrderField::Email => user::Column::Email,
            UserOrderField::Name => user::Column::Name,
        }
    }
}

fn filtered(filter: &UserFilter) -> sea_orm::Select<UserEntity> {
    UserEntity::find()
        .apply_if(filter.email.clone(), |query, email| {
            query.filter(user::Column::Email.eq(email))
        })
        .apply_if(filter.name.clone(), |query, name| {
            query.filter(user::Column::Name.eq(name))
        })
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, input: CreateUser) -> AppResult<User> {
        let active_model = ActiveModel {
            id: Set(input.id.unwrap_or_else(generate_id)),
            email: Set(input.email),
            name: Set(input.name),
            password: Set(input.password),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        tracing::debug!(user_id = %model.id, "User created");
        Ok(User::from(model))
    }

    async fn find_all(&self, params: UserListParams) -> AppResult<Vec<User>> {
        let models = find_many(
            &self.db,
            filtered(&params.filter),
            user::Column::Id,
            &params,
        )
        .await
        .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn find_one(&self, id: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id.to_owned())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn update(&self, id: &str, patch: UpdateUser) -> AppResult<User> {
        let user = UserEntity::find_by_id(id.to_owned())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        if patch.is_empty() {
            return Ok(User::from(user));
        }

        let mut active: ActiveModel = user.into();

        if let Some(email) = patch.email {
            active.email = Set(email);
        }
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(password) = patch.password {
            active.password = Set(password);
        }

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        tracing::debug!(user_id = %model.id, "User updated");
        Ok(User::from(model))
    }

    async fn remove(&self, id: &str) -> AppResult<User> {
        let user = UserEntity::find_by_id(id.to_owned())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let result = UserEntity::delete_by_id(id.to_owned())
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        // Removed by a concurrent request between the lookup and the delete
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        tracing::debug!(user_id = %user.id, "User removed");
        Ok(User::from(user))
    }
}
