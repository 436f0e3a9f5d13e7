//! List-query plumbing shared by all repositories.
//!
//! Translates [`ListParams`] into a SeaORM select: OFFSET for `skip`, LIMIT
//! for `take`, an ordering, and a keyset condition for `cursor`. Values are
//! passed through unmodified.

use domain::{ListParams, SortDirection};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, ModelTrait, Order, QueryFilter,
    QueryOrder, QuerySelect, Select,
};

/// Largest LIMIT every supported backend accepts (signed 64-bit).
const UNBOUNDED_LIMIT: u64 = i64::MAX as u64;

/// Maps a domain sort field onto a column of entity `E`.
pub(crate) trait SortColumn<E: EntityTrait>: Copy {
    fn column(self) -> E::Column;
}

/// Run a list query.
///
/// `query` already carries the entity filter. When a cursor is given the
/// page starts at the cursor record (inclusive) in the requested order, ties
/// broken by `id_column` ascending. A cursor that matches no record yields
/// an empty page.
pub(crate) async fn find_many<E, F, O>(
    db: &DatabaseConnection,
    mut query: Select<E>,
    id_column: E::Column,
    params: &ListParams<F, O>,
) -> Result<Vec<E::Model>, DbErr>
where
    E: EntityTrait,
    O: SortColumn<E>,
{
    let order = params
        .order_by
        .map(|order_by| (order_by.field.column(), order_by.direction));

    if let Some(cursor) = &params.cursor {
        let anchor = E::find()
            .filter(id_column.eq(cursor.clone()))
            .one(db)
            .await?;

        let Some(anchor) = anchor else {
            return Ok(Vec::new());
        };

        query = query.filter(cursor_condition(&anchor, id_column, cursor, order));
    }

    if let Some((column, direction)) = order {
        query = query.order_by(column, sort_order(direction));
    }
    if order.is_some() || params.cursor.is_some() {
        query = query.order_by_asc(id_column);
    }

    if let Some(skip) = params.skip {
        query = query.offset(skip);
    }
    // OFFSET needs a LIMIT on SQLite; an unbounded one keeps every row
    match (params.skip, params.take) {
        (_, Some(take)) => query = query.limit(take),
        (Some(_), None) => query = query.limit(UNBOUNDED_LIMIT),
        (None, None) => {}
    }

    query.all(db).await
}

/// Keyset condition selecting the anchor record and everything after it.
fn cursor_condition<M>(
    anchor: &M,
    id_column: <M::Entity as EntityTrait>::Column,
    cursor: &str,
    order: Option<(<M::Entity as EntityTrait>::Column, SortDirection)>,
) -> Condition
where
    M: ModelTrait,
{
    let from_cursor = id_column.gte(cursor.to_owned());

    let Some((column, direction)) = order else {
        return Condition::all().add(from_cursor);
    };

    let value = anchor.get(column);
    let beyond = match direction {
        SortDirection::Asc => column.gt(value.clone()),
        SortDirection::Desc => column.lt(value.clone()),
    };

    Condition::any()
        .add(beyond)
        .add(Condition::all().add(column.eq(value)).add(from_cursor))
}

fn sort_order(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    }
}
