//! Binding coerced values onto generated statements

use chrono::{TimeZone, Utc};
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::Postgres;

use dbadmin_core::{ColumnInfo, SqlValue};

pub(crate) type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// Bind one value. The placeholder already carries a cast to the column's
/// type, so NULL and free text travel as `text`.
pub(crate) fn bind_value<'q>(query: PgQuery<'q>, column: &ColumnInfo, value: &SqlValue) -> PgQuery<'q> {
    match value {
        SqlValue::Null => query.bind(None::<String>),
        SqlValue::Integer(i) => query.bind(*i),
        SqlValue::Numeric(n) => query.bind(*n),
        SqlValue::Boolean(b) => query.bind(*b),
        SqlValue::Date(d) => query.bind(*d),
        SqlValue::Timestamp(ts) if column.udt_name == "timestamptz" => {
            query.bind(Utc.from_utc_datetime(ts))
        }
        SqlValue::Timestamp(ts) => query.bind(*ts),
        SqlValue::Text(s) => query.bind(s.clone()),
    }
}

/// Bind `values` in order, pairing each with the column it targets.
pub(crate) fn bind_all<'q>(mut query: PgQuery<'q>, columns: &[ColumnInfo], values: &[SqlValue]) -> PgQuery<'q> {
    for (column, value) in columns.iter().zip(values) {
        query = bind_value(query, column, value);
    }
    query
}
