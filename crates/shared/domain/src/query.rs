//! List parameters shared by every repository.
//!
//! Mirrors the ORM's `findMany` arguments: offset, limit, cursor, a filter
//! and an ordering. Values are passed through to the store unmodified.

use serde::{Deserialize, Serialize};

/// Sort direction for an ordered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Ordering over one entity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy<O> {
    pub field: O,
    pub direction: SortDirection,
}

impl<O> OrderBy<O> {
    pub fn asc(field: O) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: O) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

/// Parameters of a list operation.
///
/// `F` is the entity's filter type, `O` its sortable-field enum.
/// The default value selects every record in store order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams<F, O> {
    /// Number of records to skip
    pub skip: Option<u64>,
    /// Maximum number of records to return
    pub take: Option<u64>,
    /// Id of the record the page starts at (inclusive)
    pub cursor: Option<String>,
    pub filter: F,
    pub order_by: Option<OrderBy<O>>,
}

impl<F: Default, O> Default for ListParams<F, O> {
    fn default() -> Self {
        Self {
            skip: None,
            take: None,
            cursor: None,
            filter: F::default(),
            order_by: None,
        }
    }
}

impl<F, O> ListParams<F, O> {
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn take(mut self, take: u64) -> Self {
        self.take = Some(take);
        self
    }

    pub fn cursor(mut self, id: impl Into<String>) -> Self {
        self.cursor = Some(id.into());
        self
    }

    pub fn filter(mut self, filter: F) -> Self {
        self.filter = filter;
        self
    }

    pub fn order_by(mut self, order_by: OrderBy<O>) -> Self {
        self.order_by = Some(order_by);
        self
    }
}
