//! Row repository - sampling, key lookup, and transactional writes

use std::collections::BTreeMap;

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use dbadmin_core::config::clamp_limit;
use dbadmin_core::statement::{build_select_by_key, build_select_rows};
use dbadmin_core::{BoundStatement, ResultSet, RowKey, SqlValue, TableRef, TableSchema};

use super::bind::{bind_all, bind_value};
use super::catalog::DbError;

/// Row repository
pub struct RowRepo<'a> {
    pool: &'a PgPool,
    schema: &'a str,
}

/// Every projected column is `::text`, so each cell decodes as a string.
fn text_cells(row: &PgRow, width: usize) -> Result<Vec<Option<String>>, sqlx::Error> {
    (0..width).map(|i| row.try_get::<Option<String>, _>(i)).collect()
}

impl<'a> RowRepo<'a> {
    pub fn new(pool: &'a PgPool, schema: &'a str) -> Self {
        Self { pool, schema }
    }

    fn table_ref<'t>(&'t self, table: &'t TableSchema) -> TableRef<'t> {
        TableRef::in_schema(self.schema, &table.name)
    }

    /// Up to `limit` rows (clamped to 1..=1000), optionally ordered by the
    /// primary key.
    pub async fn sample(&self, table: &TableSchema, limit: u32, ordered: bool) -> Result<ResultSet, DbError> {
        let columns: Vec<_> = table.columns.iter().collect();
        let order_by = if ordered { table.key_columns() } else { Vec::new() };
        let sql = build_select_rows(self.table_ref(table), &columns, &order_by);
        let limit = clamp_limit(limit);

        let rows = sqlx::query(&sql)
            .bind(i64::from(limit))
            .fetch_all(self.pool)
            .await?;

        let mut result = ResultSet::new(columns.iter().map(|c| c.name.clone()).collect());
        for row in &rows {
            result.rows.push(text_cells(row, columns.len())?);
        }

        tracing::debug!(table = %table.name, limit, rows = result.len(), "sampled rows");
        Ok(result)
    }

    /// The row identified by `key`, as column → text.
    pub async fn fetch_by_key(
        &self,
        table: &TableSchema,
        key: &RowKey,
    ) -> Result<Option<BTreeMap<String, Option<String>>>, DbError> {
        let columns: Vec<_> = table.columns.iter().collect();
        let keys = table.key_columns();
        let stmt = build_select_by_key(self.table_ref(table), &columns, &keys)?;

        let mut query = sqlx::query(&stmt.sql);
        for column in &keys {
            // Key text goes back as printed; the placeholder cast parses it
            let value = SqlValue::stored(key.value_of(&column.name).flatten());
            query = bind_value(query, column, &value);
        }

        let Some(row) = query.fetch_optional(self.pool).await? else {
            return Ok(None);
        };

        let cells = text_cells(&row, columns.len())?;
        Ok(Some(columns.iter().map(|c| c.name.clone()).zip(cells).collect()))
    }

    /// Run a planned INSERT in its own transaction.
    pub async fn insert(&self, plan: &BoundStatement) -> Result<u64, DbError> {
        self.execute_in_tx(plan).await
    }

    /// Run a planned UPDATE in its own transaction; no matching row is
    /// `NotFound`.
    pub async fn update(&self, plan: &BoundStatement, key: &RowKey) -> Result<u64, DbError> {
        let affected = self.execute_in_tx(plan).await?;
        if affected == 0 {
            return Err(DbError::NotFound {
                resource: "row",
                id: key.label(),
            });
        }
        Ok(affected)
    }

    async fn execute_in_tx(&self, plan: &BoundStatement) -> Result<u64, DbError> {
        let mut tx = self.pool.begin().await?;

        let result = bind_all(sqlx::query(&plan.sql), &plan.columns, &plan.params)
            .execute(&mut *tx)
            .await;

        match result {
            Ok(done) => {
                tx.commit().await?;
                Ok(done.rows_affected())
            }
            Err(err) => {
                tx.rollback().await?;
                let err = DbError::from_write(err);
                tracing::warn!(error = %err, "write rolled back");
                Err(err)
            }
        }
    }
}
