use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Request,
        rejection::{JsonRejection, PathRejection},
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{ApiError, FieldErrors};

/// Field key for errors that belong to the body as a whole.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// A `Json<T>` wrapper whose rejections are `ApiError`s, so a malformed body
/// gets the same JSON error shape as a failed form check.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        Ok(AppJson(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    warn!("Rejected request body: {}", rejection.body_text());
    match rejection {
        // Well-formed JSON with a field of the wrong type or shape.
        JsonRejection::JsonDataError(e) => {
            FieldErrors::single(NON_FIELD_ERRORS, e.body_text()).into()
        }
        other => ApiError::BadRequest(other.body_text()),
    }
}

/// A `Path<T>` wrapper: a path segment that does not parse names no
/// resource, so it is reported as not found.
pub struct AppPath<T>(pub T);

impl<S, T> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(AppPath(value)),
            Err(PathRejection::FailedToDeserializePathParams(e)) => {
                warn!("Unmatched path parameter: {}", e.body_text());
                Err(ApiError::NotFound)
            }
            Err(other) => Err(anyhow::anyhow!(other.body_text()).into()),
        }
    }
}
