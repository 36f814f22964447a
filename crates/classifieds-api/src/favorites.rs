use axum::{
    Extension,
    extract::State,
};
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use classifieds_types::api::Claims;

use crate::error::ApiError;
use crate::extractors::AppPath;
use crate::state::AppState;

/// POST /ads/{ad_id}/favorite: idempotent; the reply is the same whether
/// or not the ad was already a favorite.
pub async fn add_favorite(
    State(state): State<AppState>,
    AppPath(ad_id): AppPath<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<&'static str, ApiError> {
    let user_id = claims.sub.to_string();
    let added = state
        .with_db(move |db| {
            let ad = ad_id.to_string();
            if !db.ad_exists(&ad)? {
                return Err(ApiError::NotFound);
            }
            Ok(db.add_favorite(&Uuid::new_v4().to_string(), &user_id, &ad, Utc::now())?)
        })
        .await?;

    debug!("Favorite {} for {} (new row: {})", ad_id, claims.username, added);
    Ok("Favorite added")
}

/// POST /ads/{ad_id}/unfavorite: idempotent, like `add_favorite`.
pub async fn remove_favorite(
    State(state): State<AppState>,
    AppPath(ad_id): AppPath<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<&'static str, ApiError> {
    let user_id = claims.sub.to_string();
    let removed = state
        .with_db(move |db| {
            let ad = ad_id.to_string();
            if !db.ad_exists(&ad)? {
                return Err(ApiError::NotFound);
            }
            Ok(db.remove_favorite(&user_id, &ad)?)
        })
        .await?;

    debug!("Unfavorite {} for {} (row removed: {})", ad_id, claims.username, removed);
    Ok("Favorite deleted")
}
