//! Row endpoints - browse, insert, update

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use dbadmin_core::{FormInput, InsertOptions, ResultSet};

use crate::http::error::ApiError;
use crate::http::extractors::ValidTableName;
use crate::http::server::AppState;
use crate::service::{KeySelector, WriteOutcome};

#[derive(Deserialize)]
pub struct RowsParams {
    /// Clamped to 1..=1000; configured default when absent
    pub limit: Option<u32>,
    #[serde(default)]
    pub ordered: bool,
}

/// POST body
#[derive(Deserialize)]
pub struct InsertRequest {
    #[serde(default)]
    pub values: FormInput,
    #[serde(default)]
    pub use_defaults: bool,
}

/// PUT body
#[derive(Deserialize)]
pub struct UpdateRequest {
    pub key: KeySelector,
    #[serde(default)]
    pub values: FormInput,
}

/// GET /tables/{table}/rows?limit=&ordered=
async fn list_rows(
    State(state): State<Arc<AppState>>,
    ValidTableName(table): ValidTableName,
    Query(params): Query<RowsParams>,
) -> Result<Json<ResultSet>, ApiError> {
    let rows = state
        .service
        .sample(table.as_str(), params.limit, params.ordered)
        .await?;
    Ok(Json(rows))
}

/// POST /tables/{table}/rows
async fn insert_row(
    State(state): State<Arc<AppState>>,
    ValidTableName(table): ValidTableName,
    Json(req): Json<InsertRequest>,
) -> Result<(StatusCode, Json<WriteOutcome>), ApiError> {
    let options = InsertOptions {
        use_defaults: req.use_defaults,
    };
    let outcome = state.service.insert(table.as_str(), &req.values, options).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// PUT /tables/{table}/rows
async fn update_row(
    State(state): State<Arc<AppState>>,
    ValidTableName(table): ValidTableName,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<WriteOutcome>, ApiError> {
    let outcome = state.service.update(table.as_str(), &req.key, &req.values).await?;
    Ok(Json(outcome))
}

/// Row routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/tables/{table}/rows",
        get(list_rows).post(insert_row).put(update_row),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_body_accepts_label_or_pairs() {
        let req: UpdateRequest =
            serde_json::from_str(r#"{"key": "12", "values": {"nome": "Balança"}}"#).unwrap();
        assert_eq!(req.key, KeySelector::Label("12".into()));
        assert_eq!(req.values["nome"], "Balança");

        let req: UpdateRequest = serde_json::from_str(r#"{"key": {"nTombamento": "12"}}"#).unwrap();
        assert!(matches!(req.key, KeySelector::Pairs(_)));
        assert!(req.values.is_empty());
    }

    #[test]
    fn insert_body_defaults() {
        let req: InsertRequest = serde_json::from_str(r#"{"values": {"nome": "x"}}"#).unwrap();
        assert!(!req.use_defaults);
    }
}
