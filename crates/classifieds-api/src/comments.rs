use axum::{
    Extension,
    extract::State,
    response::Redirect,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use classifieds_types::api::{Claims, CommentRequest};

use crate::error::ApiError;
use crate::extractors::{AppJson, AppPath};
use crate::forms;
use crate::ownership::ensure_owner;
use crate::state::AppState;

/// POST /ads/{ad_id}/comments: redirects back to the ad.
pub async fn create_comment(
    State(state): State<AppState>,
    AppPath(ad_id): AppPath<Uuid>,
    Extension(claims): Extension<Claims>,
    AppJson(req): AppJson<CommentRequest>,
) -> Result<Redirect, ApiError> {
    let comment_id = Uuid::new_v4();
    let owner_id = claims.sub.to_string();

    state
        .with_db(move |db| {
            let ad = ad_id.to_string();
            if !db.ad_exists(&ad)? {
                return Err(ApiError::NotFound);
            }
            let text = forms::clean_comment(&req.comment)?;
            db.insert_comment(&comment_id.to_string(), &ad, &owner_id, &text, Utc::now())?;
            Ok(())
        })
        .await?;

    info!("Comment {} on ad {} by {}", comment_id, ad_id, claims.username);
    Ok(Redirect::to(&format!("/ads/{ad_id}")))
}

/// POST /comments/{comment_id}/delete: owner only; redirects to the parent ad.
pub async fn delete_comment(
    State(state): State<AppState>,
    AppPath(comment_id): AppPath<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Redirect, ApiError> {
    let id = comment_id.to_string();
    let username = claims.username.clone();

    let ad_id = state
        .with_db(move |db| {
            let comment = ensure_owner(db.get_comment(&id)?, &claims)?;
            db.delete_comment(&id)?;
            Ok(comment.ad_id)
        })
        .await?;

    info!("Comment {} deleted by {}", comment_id, username);
    Ok(Redirect::to(&format!("/ads/{ad_id}")))
}
