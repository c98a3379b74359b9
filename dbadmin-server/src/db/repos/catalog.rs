//! Catalog repository
//!
//! Introspects one schema through standard catalog views:
//! - tables: pg_catalog.pg_tables
//! - columns: information_schema.columns in ordinal order
//! - keys: table_constraints / key_column_usage / referential_constraints

use sqlx::{FromRow, PgPool, Row};

use dbadmin_core::{ColumnInfo, CoreError, ForeignKey, TableSchema};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    /// The database refused a write; the transaction was rolled back
    #[error("{message}")]
    Rejected { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl DbError {
    /// Classify a failed write: server-side refusals keep the database's
    /// message, anything else stays a driver error.
    pub fn from_write(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) => Self::Rejected {
                message: db.message().to_owned(),
            },
            other => Self::Sqlx(other),
        }
    }
}

/// Foreign key together with the table that declares it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableForeignKey {
    pub table: String,
    pub foreign_key: ForeignKey,
}

#[derive(FromRow)]
struct ColumnRow {
    column_name: String,
    data_type: String,
    is_nullable: String,
    udt_name: String,
    character_maximum_length: Option<i32>,
    column_default: Option<String>,
    ordinal_position: i32,
}

impl From<ColumnRow> for ColumnInfo {
    fn from(r: ColumnRow) -> Self {
        Self {
            name: r.column_name,
            data_type: r.data_type,
            is_nullable: r.is_nullable.eq_ignore_ascii_case("YES"),
            udt_name: r.udt_name,
            character_maximum_length: r.character_maximum_length,
            column_default: r.column_default,
            ordinal_position: r.ordinal_position,
        }
    }
}

/// Catalog repository
pub struct CatalogRepo<'a> {
    pool: &'a PgPool,
    schema: &'a str,
}

impl<'a> CatalogRepo<'a> {
    pub fn new(pool: &'a PgPool, schema: &'a str) -> Self {
        Self { pool, schema }
    }

    /// Table names in the schema, alphabetical.
    pub async fn list_tables(&self) -> Result<Vec<String>, DbError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT tablename::text
            FROM pg_catalog.pg_tables
            WHERE schemaname = $1
            ORDER BY tablename
            "#,
        )
        .bind(self.schema)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    pub async fn table_exists(&self, table: &str) -> Result<bool, DbError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM pg_catalog.pg_tables WHERE schemaname = $1 AND tablename = $2)",
        )
        .bind(self.schema)
        .bind(table)
        .fetch_one(self.pool)
        .await?;

        Ok(exists.0)
    }

    /// Columns in ordinal order.
    pub async fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>, DbError> {
        let rows: Vec<ColumnRow> = sqlx::query_as(
            r#"
            SELECT
                column_name::text              AS column_name,
                data_type::text                AS data_type,
                is_nullable::text              AS is_nullable,
                udt_name::text                 AS udt_name,
                character_maximum_length::int4 AS character_maximum_length,
                column_default::text           AS column_default,
                ordinal_position::int4         AS ordinal_position
            FROM information_schema.columns
            WHERE table_schema = $1
              AND table_name = $2
            ORDER BY ordinal_position
            "#,
        )
        .bind(self.schema)
        .bind(table)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ColumnInfo::from).collect())
    }

    /// Primary key columns in key order.
    pub async fn primary_key(&self, table: &str) -> Result<Vec<String>, DbError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT kcu.column_name::text
            FROM information_schema.table_constraints tc
            JOIN information_schema.key_column_usage kcu
                ON tc.constraint_name = kcu.constraint_name
               AND tc.table_schema = kcu.table_schema
               AND tc.table_name = kcu.table_name
            WHERE tc.table_schema = $1
              AND tc.table_name = $2
              AND tc.constraint_type = 'PRIMARY KEY'
            ORDER BY kcu.ordinal_position
            "#,
        )
        .bind(self.schema)
        .bind(table)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Foreign keys declared by `table`, or by every table when `None`.
    ///
    /// Composite keys pair columns by position, so each referencing column
    /// maps to exactly one referenced column.
    async fn foreign_keys_for(&self, table: Option<&str>) -> Result<Vec<TableForeignKey>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT
                kcu.table_name::text  AS table_name,
                kcu.column_name::text AS fk_column,
                ref.table_name::text  AS referenced_table,
                ref.column_name::text AS referenced_column
            FROM information_schema.referential_constraints rc
            JOIN information_schema.key_column_usage kcu
                ON kcu.constraint_schema = rc.constraint_schema
               AND kcu.constraint_name = rc.constraint_name
            JOIN information_schema.key_column_usage ref
                ON ref.constraint_schema = rc.unique_constraint_schema
               AND ref.constraint_name = rc.unique_constraint_name
               AND ref.ordinal_position = kcu.position_in_unique_constraint
            WHERE kcu.table_schema = $1
              AND ($2::text IS NULL OR kcu.table_name = $2)
            ORDER BY kcu.table_name, kcu.constraint_name, kcu.ordinal_position
            "#,
        )
        .bind(self.schema)
        .bind(table)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| TableForeignKey {
                table: r.get("table_name"),
                foreign_key: ForeignKey {
                    column: r.get("fk_column"),
                    referenced_table: r.get("referenced_table"),
                    referenced_column: r.get("referenced_column"),
                },
            })
            .collect())
    }

    pub async fn foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>, DbError> {
        Ok(self
            .foreign_keys_for(Some(table))
            .await?
            .into_iter()
            .map(|t| t.foreign_key)
            .collect())
    }

    /// Every foreign key in the schema, in one query.
    pub async fn all_foreign_keys(&self) -> Result<Vec<TableForeignKey>, DbError> {
        self.foreign_keys_for(None).await
    }

    /// Full metadata for one table.
    pub async fn describe(&self, table: &str) -> Result<TableSchema, DbError> {
        if !self.table_exists(table).await? {
            return Err(DbError::NotFound {
                resource: "table",
                id: table.to_owned(),
            });
        }

        let columns = self.columns(table).await?;
        let primary_key = self.primary_key(table).await?;
        let foreign_keys = self.foreign_keys(table).await?;

        tracing::debug!(
            table,
            columns = columns.len(),
            key_columns = primary_key.len(),
            foreign_keys = foreign_keys.len(),
            "described table"
        );

        Ok(TableSchema {
            name: table.to_owned(),
            columns,
            primary_key,
            foreign_keys,
        })
    }
}
