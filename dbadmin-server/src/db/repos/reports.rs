//! Report runner
//!
//! Columns come from preparing the report, so an empty result still has
//! headings. Rows come back as `row_to_json` text and are flattened to
//! text cells, which keeps arbitrary column types displayable. The wrapper
//! renames columns by position, so duplicate names stay distinct.

use serde_json::Value;
use sqlx::{Column, Executor, PgPool, Statement};

use dbadmin_core::ident::quote_ident;
use dbadmin_core::{Report, ResultSet};

use super::catalog::DbError;

pub struct ReportRunner<'a> {
    pool: &'a PgPool,
}

/// JSON key of the column at `index`
fn position_key(index: usize) -> String {
    (index + 1).to_string()
}

fn wrap_as_json(sql: &str, width: usize) -> String {
    let inner = sql.trim().trim_end_matches(';').trim_end();
    if width == 0 {
        return format!("SELECT row_to_json(r)::text FROM ({}\n) AS r", inner);
    }
    let aliases = (0..width)
        .map(|i| quote_ident(&position_key(i)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("SELECT row_to_json(r)::text FROM ({}\n) AS r({})", inner, aliases)
}

fn json_cell(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn row_cells(width: usize, json: &str) -> Result<Vec<Option<String>>, serde_json::Error> {
    let object: serde_json::Map<String, Value> = serde_json::from_str(json)?;
    Ok((0..width).map(|i| json_cell(object.get(&position_key(i)))).collect())
}

impl<'a> ReportRunner<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Run `report` with `term` matched anywhere (`%term%`).
    pub async fn run(&self, report: &Report, term: &str) -> Result<ResultSet, DbError> {
        let prepared = self.pool.prepare(report.sql.as_str()).await?;
        let columns: Vec<String> = prepared.columns().iter().map(|c| c.name().to_owned()).collect();

        let wrapped = wrap_as_json(&report.sql, columns.len());
        let rows: Vec<(String,)> = sqlx::query_as(&wrapped)
            .bind(Report::pattern(term))
            .fetch_all(self.pool)
            .await?;

        let mut result = ResultSet::new(columns);
        for (json,) in &rows {
            let cells = row_cells(result.columns.len(), json).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
            result.rows.push(cells);
        }

        tracing::info!(report = %report.id, term, rows = result.len(), "report finished");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_strips_trailing_semicolon_and_renames_by_position() {
        assert_eq!(
            wrap_as_json("  SELECT 1 AS x, 2 AS x;\n", 2),
            "SELECT row_to_json(r)::text FROM (SELECT 1 AS x, 2 AS x\n) AS r(\"1\", \"2\")"
        );
        assert_eq!(
            wrap_as_json("SELECT", 0),
            "SELECT row_to_json(r)::text FROM (SELECT\n) AS r"
        );
    }

    #[test]
    fn json_cells_follow_column_order() {
        let cells = row_cells(4, r#"{"2": 3, "1": "Ana", "3": null, "4": true}"#).unwrap();
        assert_eq!(
            cells,
            vec![Some("Ana".into()), Some("3".into()), None, Some("true".into())]
        );
    }

    #[test]
    fn duplicate_column_names_keep_their_own_cells() {
        // SELECT a.nome, b.nome ... after positional renaming
        let cells = row_cells(2, r#"{"1": "Ana", "2": "Projeto X"}"#).unwrap();
        assert_eq!(cells, vec![Some("Ana".into()), Some("Projeto X".into())]);
    }

    #[test]
    fn missing_json_key_is_null() {
        let cells = row_cells(1, "{}").unwrap();
        assert_eq!(cells, vec![None]);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn empty_report_keeps_headings() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");

        let report = Report {
            id: "t".into(),
            title: "t".into(),
            prompt: "term".into(),
            sql: "SELECT 'a'::text AS nome, 1 AS id WHERE 'a' ILIKE $1;".into(),
        };
        let runner = ReportRunner::new(&pool);

        let empty = runner.run(&report, "zzz").await.unwrap();
        assert_eq!(empty.columns, ["nome", "id"]);
        assert!(empty.is_empty());

        let hit = runner.run(&report, "a").await.unwrap();
        assert_eq!(hit.rows, vec![vec![Some("a".to_string()), Some("1".to_string())]]);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_column_names_survive_a_real_query() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");

        let report = Report {
            id: "dup".into(),
            title: "dup".into(),
            prompt: "term".into(),
            sql: "SELECT a.nome, b.nome FROM (SELECT 'Ana'::text AS nome) a, \
                  (SELECT 'Projeto X'::text AS nome) b WHERE a.nome ILIKE $1"
                .into(),
        };
        let result = ReportRunner::new(&pool).run(&report, "").await.unwrap();
        assert_eq!(result.columns, ["nome", "nome"]);
        assert_eq!(result.rows, vec![vec![Some("Ana".to_string()), Some("Projeto X".to_string())]]);
    }
}
