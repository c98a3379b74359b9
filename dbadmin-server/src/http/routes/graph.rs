//! Relationship diagram endpoint

use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse, routing::get, Router};

use crate::http::error::ApiError;
use crate::http::server::AppState;

/// GET /graph - Graphviz DOT source of every foreign key
async fn graph(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let dot = state.service.graph().await?;
    Ok(([(header::CONTENT_TYPE, "text/vnd.graphviz; charset=utf-8")], dot))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/graph", get(graph))
}
