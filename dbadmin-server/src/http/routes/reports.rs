//! Report endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use dbadmin_core::{Report, ResultSet};

use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Catalog entry; the SQL stays server-side
#[derive(Serialize)]
pub struct ReportSummary {
    pub id: String,
    pub title: String,
    pub prompt: String,
}

impl From<&Report> for ReportSummary {
    fn from(r: &Report) -> Self {
        Self {
            id: r.id.clone(),
            title: r.title.clone(),
            prompt: r.prompt.clone(),
        }
    }
}

#[derive(Deserialize)]
pub struct ReportParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize)]
pub struct ReportResponse {
    pub id: String,
    pub title: String,
    pub term: String,
    #[serde(flatten)]
    pub result: ResultSet,
}

/// GET /reports
async fn list_reports(State(state): State<Arc<AppState>>) -> Json<Vec<ReportSummary>> {
    Json(state.service.reports().iter().map(ReportSummary::from).collect())
}

/// GET /reports/{id}?q=term - an empty term matches everything
async fn run_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<ReportParams>,
) -> Result<Json<ReportResponse>, ApiError> {
    let (report, result) = state.service.run_report(&id, &params.q).await?;
    Ok(Json(ReportResponse {
        id: report.id,
        title: report.title,
        term: params.q,
        result,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reports", get(list_reports))
        .route("/reports/{id}", get(run_report))
}
