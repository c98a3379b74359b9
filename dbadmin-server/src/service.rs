//! Admin operations shared by the CLI and the HTTP API
//!
//! Each call loads fresh metadata, so schema changes made elsewhere show up
//! on the next request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use dbadmin_core::config::{BrowseConfig, DbAdminConfig};
use dbadmin_core::form::{edit_form, insert_form};
use dbadmin_core::rowkey::{find_by_label, index_by_label};
use dbadmin_core::{
    plan_insert, plan_update, relationship_graph, CoreError, Form, FormInput, FormMode, InsertOptions, Report,
    ReportCatalog, ResultSet, RowKey, TableRef, TableSchema,
};

use crate::db::{CatalogRepo, DbError, ReportRunner, RowRepo};

/// How a caller identifies the row to edit
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum KeySelector {
    /// Explicit `column → value` for every key column
    Pairs(BTreeMap<String, String>),
    /// A label as listed by `keys`
    Label(String),
}

/// Result of a successful insert or update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteOutcome {
    pub message: String,
    pub rows_affected: u64,
}

#[derive(Clone)]
pub struct AdminService {
    pool: PgPool,
    schema: String,
    reports: ReportCatalog,
    browse: BrowseConfig,
}

impl AdminService {
    pub fn new(pool: PgPool, schema: impl Into<String>, reports: ReportCatalog, browse: BrowseConfig) -> Self {
        Self {
            pool,
            schema: schema.into(),
            reports,
            browse,
        }
    }

    /// Service over `pool` with schema, report overrides and limits taken
    /// from `config`.
    pub fn from_config(pool: PgPool, config: &DbAdminConfig) -> Self {
        Self::new(
            pool,
            config.database.schema.clone(),
            ReportCatalog::with_extra(config.reports.iter().cloned()),
            config.browse.clone(),
        )
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn reports(&self) -> &ReportCatalog {
        &self.reports
    }

    fn catalog(&self) -> CatalogRepo<'_> {
        CatalogRepo::new(&self.pool, &self.schema)
    }

    fn rows(&self) -> RowRepo<'_> {
        RowRepo::new(&self.pool, &self.schema)
    }

    pub async fn tables(&self) -> Result<Vec<String>, DbError> {
        self.catalog().list_tables().await
    }

    pub async fn describe(&self, table: &str) -> Result<TableSchema, DbError> {
        self.catalog().describe(table).await
    }

    /// Browse page rows; `None` uses the configured default limit.
    pub async fn sample(&self, table: &str, limit: Option<u32>, ordered: bool) -> Result<ResultSet, DbError> {
        let schema = self.describe(table).await?;
        let limit = limit.unwrap_or(self.browse.default_limit);
        self.rows().sample(&schema, limit, ordered).await
    }

    /// Rows offered for editing, key-ordered.
    async fn edit_rows(&self, schema: &TableSchema) -> Result<ResultSet, DbError> {
        if !schema.has_primary_key() {
            return Err(CoreError::MissingPrimaryKey {
                table: schema.name.clone(),
            }
            .into());
        }
        self.rows().sample(schema, self.browse.edit_limit, true).await
    }

    /// Labels of the rows that can be picked for editing.
    pub async fn keys(&self, table: &str) -> Result<Vec<String>, DbError> {
        let schema = self.describe(table).await?;
        let rows = self.edit_rows(&schema).await?;
        let index = index_by_label(&schema.name, &rows, &schema.primary_key)?;
        Ok(index.into_iter().map(|(label, _)| label).collect())
    }

    async fn resolve_key(&self, schema: &TableSchema, selector: &KeySelector) -> Result<RowKey, DbError> {
        match selector {
            KeySelector::Pairs(pairs) => Ok(RowKey::from_pairs(schema, pairs)?),
            KeySelector::Label(label) => {
                let rows = self.edit_rows(schema).await?;
                Ok(find_by_label(&schema.name, &rows, &schema.primary_key, label)?)
            }
        }
    }

    async fn load_row(
        &self,
        schema: &TableSchema,
        key: &RowKey,
    ) -> Result<BTreeMap<String, Option<String>>, DbError> {
        self.rows()
            .fetch_by_key(schema, key)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "row",
                id: key.label(),
            })
    }

    /// Form fields for inserting, or for editing the row with `key`.
    pub async fn form(&self, table: &str, mode: FormMode, key: Option<&KeySelector>) -> Result<Form, DbError> {
        let schema = self.describe(table).await?;
        match mode {
            FormMode::Insert => Ok(insert_form(&schema)),
            FormMode::Edit => {
                let selector = key.ok_or_else(|| CoreError::invalid_row_key(table, "edit form needs a row key"))?;
                let key = self.resolve_key(&schema, selector).await?;
                let row = self.load_row(&schema, &key).await?;
                Ok(edit_form(&schema, &key.label(), &row))
            }
        }
    }

    pub async fn insert(&self, table: &str, input: &FormInput, options: InsertOptions) -> Result<WriteOutcome, DbError> {
        let schema = self.describe(table).await?;
        let plan = plan_insert(TableRef::in_schema(&self.schema, &schema.name), &schema, input, options)?;
        let rows_affected = self.rows().insert(&plan).await?;

        tracing::info!(table = %schema.name, rows = rows_affected, "row inserted");
        Ok(WriteOutcome {
            message: format!("Row inserted into {}", schema.name),
            rows_affected,
        })
    }

    /// Update one row. Columns missing from `input` keep their current value.
    pub async fn update(&self, table: &str, selector: &KeySelector, input: &FormInput) -> Result<WriteOutcome, DbError> {
        let schema = self.describe(table).await?;
        let key = self.resolve_key(&schema, selector).await?;
        let current = self.load_row(&schema, &key).await?;

        let plan = plan_update(
            TableRef::in_schema(&self.schema, &schema.name),
            &schema,
            &key,
            &current,
            input,
        )?;
        let rows_affected = self.rows().update(&plan, &key).await?;

        tracing::info!(table = %schema.name, key = %key.label(), rows = rows_affected, "row updated");
        Ok(WriteOutcome {
            message: format!("Row {} of {} updated", key.label(), schema.name),
            rows_affected,
        })
    }

    /// DOT source of every foreign key in the schema.
    pub async fn graph(&self) -> Result<String, DbError> {
        let edges = self.catalog().all_foreign_keys().await?;
        Ok(relationship_graph(
            edges.iter().map(|e| (e.table.as_str(), &e.foreign_key)),
        ))
    }

    pub async fn run_report(&self, id: &str, term: &str) -> Result<(Report, ResultSet), DbError> {
        let report = self.reports.get(id)?.clone();
        let result = ReportRunner::new(&self.pool).run(&report, term).await?;
        Ok((report, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_selector_from_json() {
        let pairs: KeySelector = serde_json::from_str(r#"{"matrícula": "2020", "número": "1"}"#).unwrap();
        assert!(matches!(pairs, KeySelector::Pairs(ref p) if p.len() == 2));

        let label: KeySelector = serde_json::from_str(r#""2020 / 1""#).unwrap();
        assert_eq!(label, KeySelector::Label("2020 / 1".into()));
    }

    #[tokio::test]
    async fn unknown_report_fails_before_querying() {
        let pool = PgPool::connect_lazy("postgres://localhost/unused").unwrap();
        let service = AdminService::from_config(pool, &DbAdminConfig::default());
        let err = service.run_report("nope", "x").await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::UnknownReport { .. })));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn edit_form_by_label() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.unwrap();
        sqlx::query("DROP TABLE IF EXISTS dbadmin_service_test").execute(&pool).await.unwrap();
        sqlx::query("CREATE TABLE dbadmin_service_test (a int, b text, c text, PRIMARY KEY (a, b))")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO dbadmin_service_test VALUES (1, 'x', 'um'), (2, 'y', NULL)")
            .execute(&pool)
            .await
            .unwrap();

        let service = AdminService::from_config(pool, &DbAdminConfig::default());
        assert_eq!(service.keys("dbadmin_service_test").await.unwrap(), ["1 / x", "2 / y"]);

        let selector = KeySelector::Label("1 / x".into());
        let form = service
            .form("dbadmin_service_test", FormMode::Edit, Some(&selector))
            .await
            .unwrap();
        assert_eq!(form.fields[2].value, "um");
        assert!(form.fields[0].read_only && form.fields[1].read_only);

        let input: FormInput = [("c".to_string(), "dois".to_string())].into_iter().collect();
        let outcome = service.update("dbadmin_service_test", &selector, &input).await.unwrap();
        assert_eq!(outcome.rows_affected, 1);
    }
}
