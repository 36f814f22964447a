use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::extractors::AppPath;
use crate::state::AppState;

/// GET /ads/{ad_id}/picture: the stored blob in one body, with its stored
/// content type and exact length.
pub async fn stream_picture(
    State(state): State<AppState>,
    AppPath(ad_id): AppPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let id = ad_id.to_string();
    let row = state
        .with_db(move |db| db.get_ad_picture(&id)?.ok_or(ApiError::NotFound))
        .await?;

    let bytes = row.picture.ok_or(ApiError::NotFound)?;
    let content_type = row
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_LENGTH, bytes.len().to_string()),
        ],
        bytes,
    ))
}
