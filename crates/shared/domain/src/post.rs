//! Post domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::query::ListParams;

/// Post record as persisted in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique post identifier
    pub id: String,
    pub title: String,
    pub content: String,
    /// Server-assigned creation timestamp
    pub created_at: DateTime<Utc>,
    /// Server-assigned, refreshed on every update
    pub updated_at: DateTime<Utc>,
    /// Identifier of the authoring user
    pub author_id: String,
}

/// Post creation payload with the author already resolved to its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePost {
    /// Caller-supplied identifier; generated when absent
    pub id: Option<String>,
    pub title: String,
    pub content: String,
    pub author_id: String,
}

/// Partial post update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl UpdatePost {
    /// True when the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// Nested relation reference: `{"connect": {"id": "..."}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AuthorReference {
    pub connect: ConnectById,
}

/// Target of a `connect` reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ConnectById {
    pub id: String,
}

/// Normalize the two accepted author forms to a foreign key value.
///
/// Either form may be given; when both are present they must agree.
pub fn resolve_author(
    author: Option<AuthorReference>,
    author_id: Option<String>,
) -> DomainResult<String> {
    match (author, author_id) {
        (Some(reference), Some(id)) if reference.connect.id != id => Err(
            DomainError::validation("author.connect.id and authorId refer to different users"),
        ),
        (Some(reference), _) => Ok(reference.connect.id),
        (None, Some(id)) => Ok(id),
        (None, None) => Err(DomainError::MissingReference("author")),
    }
}

/// Equality predicates for listing posts. All set fields must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFilter {
    pub author_id: Option<String>,
    pub title: Option<String>,
}

/// Fields a post list can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub enum PostOrderField {
    #[default]
    Id,
    Title,
    CreatedAt,
    UpdatedAt,
}

/// List parameters for posts.
pub type PostListParams = ListParams<PostFilter, PostOrderField>;

#[cfg(test)]
mod tests {
    use super::*;

    fn connect(id: &str) -> AuthorReference {
        AuthorReference {
            connect: ConnectById { id: id.to_string() },
        }
    }

    #[test]
    fn resolves_nested_connect_reference() {
        assert_eq!(resolve_author(Some(connect("u1")), None).unwrap(), "u1");
    }

    #[test]
    fn resolves_raw_author_id() {
        assert_eq!(resolve_author(None, Some("u1".to_string())).unwrap(), "u1");
    }

    #[test]
    fn accepts_matching_forms() {
        let id = resolve_author(Some(connect("u1")), Some("u1".to_string())).unwrap();
        assert_eq!(id, "u1");
    }

    #[test]
    fn rejects_conflicting_forms() {
        let err = resolve_author(Some(connect("u1")), Some("u2".to_string())).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn requires_an_author() {
        assert_eq!(
            resolve_author(None, None).unwrap_err(),
            DomainError::MissingReference("author")
        );
    }

    #[test]
    fn post_serializes_with_camel_case_keys() {
        let now = Utc::now();
        let post = Post {
            id: "p1".to_string(),
            title: "T".to_string(),
            content: "C".to_string(),
            created_at: now,
            updated_at: now,
            author_id: "u1".to_string(),
        };

        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["authorId"], "u1");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("author_id").is_none());
    }
}
