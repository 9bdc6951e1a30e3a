use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde_json::Value;
use tracing::warn;

use crate::error::AppError;

/// Raw JSON request body, handed to the validators untyped so that type
/// mismatches surface as itemized violations.
#[derive(Debug)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                warn!(%rejection, "rejected request body");
                Err(AppError::BadRequest("Invalid JSON body".into()))
            }
        }
    }
}
