//! Custom Axum extractors

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use super::error::ApiError;
use crate::models::{TableName, ValidationError};

/// Extract and validate a table name from path
pub struct ValidTableName(pub TableName);

impl<S> FromRequestParts<S> for ValidTableName
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(name): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "table name" }))?;

        let table = TableName::new(&name)?;
        Ok(Self(table))
    }
}
