//! JSON body extractors whose rejections use the response envelope.

use crate::responses::{error_response, AppError};
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use storefront_core::{validation_errors_to_storefront_error, ErrorResponse};
use validator::Validate;

/// `Json<T>` that answers malformed bodies with a 400 `INVALID_JSON` envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

/// [`JsonBody`] that also runs the payload's `validator` rules.
///
/// Failures are 400 `VALIDATION_ERROR` with one detail per field.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

/// Rejection for the JSON extractors.
#[derive(Debug)]
pub enum JsonBodyRejection {
    /// Body missing, not JSON, or not the expected shape.
    Json(JsonRejection),
    /// Well-formed body failing field rules.
    Invalid(AppError),
}

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Json(rejection) => error_response(
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    code: "INVALID_JSON".to_string(),
                    message: format!("Invalid JSON: {}", rejection.body_text()),
                    details: None,
                    trace_id: None,
                },
            ),
            Self::Invalid(err) => err.into_response(),
        }
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(JsonBodyRejection::Json)?;
        Ok(Self(value))
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonBody(value) = JsonBody::<T>::from_request(req, state).await?;
        value
            .validate()
            .map_err(|errors| JsonBodyRejection::Invalid(AppError(validation_errors_to_storefront_error(errors))))?;
        Ok(Self(value))
    }
}
