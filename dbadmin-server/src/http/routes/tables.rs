//! Table metadata, form, and key endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use dbadmin_core::{Form, FormMode, TableSchema};

use crate::http::error::ApiError;
use crate::http::extractors::ValidTableName;
use crate::http::server::AppState;
use crate::service::KeySelector;

#[derive(Serialize)]
pub struct TableListResponse {
    pub schema: String,
    pub tables: Vec<String>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct KeysResponse {
    pub table: String,
    pub primary_key: Vec<String>,
    pub keys: Vec<String>,
}

#[derive(Deserialize)]
pub struct FormParams {
    #[serde(default)]
    pub mode: FormMode,
    /// Row label, required for `mode=edit`
    pub key: Option<String>,
}

/// GET /tables
async fn list_tables(State(state): State<Arc<AppState>>) -> Result<Json<TableListResponse>, ApiError> {
    let tables = state.service.tables().await?;
    Ok(Json(TableListResponse {
        schema: state.service.schema().to_owned(),
        count: tables.len(),
        tables,
    }))
}

/// GET /tables/{table} - columns, primary key, foreign keys
async fn describe_table(
    State(state): State<Arc<AppState>>,
    ValidTableName(table): ValidTableName,
) -> Result<Json<TableSchema>, ApiError> {
    Ok(Json(state.service.describe(table.as_str()).await?))
}

/// GET /tables/{table}/form?mode=insert|edit&key=<label>
async fn table_form(
    State(state): State<Arc<AppState>>,
    ValidTableName(table): ValidTableName,
    Query(params): Query<FormParams>,
) -> Result<Json<Form>, ApiError> {
    let selector = params.key.map(KeySelector::Label);
    let form = state
        .service
        .form(table.as_str(), params.mode, selector.as_ref())
        .await?;
    Ok(Json(form))
}

/// GET /tables/{table}/keys - labels of rows that can be edited
async fn table_keys(
    State(state): State<Arc<AppState>>,
    ValidTableName(table): ValidTableName,
) -> Result<Json<KeysResponse>, ApiError> {
    let schema = state.service.describe(table.as_str()).await?;
    let keys = state.service.keys(table.as_str()).await?;
    Ok(Json(KeysResponse {
        table: schema.name,
        primary_key: schema.primary_key,
        keys,
    }))
}

/// Table routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tables", get(list_tables))
        .route("/tables/{table}", get(describe_table))
        .route("/tables/{table}/form", get(table_form))
        .route("/tables/{table}/keys", get(table_keys))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_params_default_to_insert() {
        let params: FormParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.mode, FormMode::Insert);
        assert!(params.key.is_none());

        let params: FormParams = serde_json::from_str(r#"{"mode": "edit", "key": "1 / x"}"#).unwrap();
        assert_eq!(params.mode, FormMode::Edit);
    }
}
