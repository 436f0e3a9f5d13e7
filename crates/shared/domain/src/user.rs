//! User domain entity and related types.

use serde::{Deserialize, Serialize};

use crate::query::ListParams;

/// User record as persisted in the store.
///
/// The password is stored and returned exactly as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    /// Unique user identifier
    pub id: String,
    /// User email address
    pub email: String,
    /// User display name
    pub name: String,
    /// User password
    pub password: String,
}

/// User creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUser {
    /// Caller-supplied identifier; generated when absent
    pub id: Option<String>,
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Partial user update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

impl UpdateUser {
    /// True when the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none() && self.password.is_none()
    }
}

/// Equality predicates for listing users. All set fields must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserFilter {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Fields a user list can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub enum UserOrderField {
    #[default]
    Id,
    Email,
    Name,
}

/// List parameters for users.
pub type UserListParams = ListParams<UserFilter, UserOrderField>;
