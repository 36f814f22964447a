use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::HeaderMap,
    response::Redirect,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use classifieds_db::Database;
use classifieds_db::models::{AdWrite, TaskRow};
use classifieds_types::api::{
    AdDetailResponse, AdForm, AdListQuery, AdListResponse, Claims, TaskGroup,
};

use crate::error::{ApiError, FieldErrors};
use crate::extractors::{AppJson, AppPath};
use crate::forms::{self, CleanAd, format_price};
use crate::middleware::claims_from_headers;
use crate::ownership::ensure_owner;
use crate::rows::{ad_response, comment_response, parse_id, task_entry};
use crate::state::AppState;

const LISTING_LIMIT: u32 = 10;

/// GET /ads: recent or matching ads, the caller's favorites, and every ad
/// grouped by responsible user. Anonymous callers get no favorites.
pub async fn list_ads(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AdListQuery>,
) -> Result<Json<AdListResponse>, ApiError> {
    let viewer = claims_from_headers(&headers, &state.config.jwt_secret).ok();
    let search = query.search.filter(|s| !s.is_empty());

    let term = search.clone();
    let (ads, favorites, tasks) = state
        .with_db(move |db| {
            let ads = db.list_ads(term.as_deref(), LISTING_LIMIT)?;
            let favorites = match viewer {
                Some(claims) => db.favorite_ad_ids(&claims.sub.to_string())?,
                None => Vec::new(),
            };
            let tasks = db.ads_by_latest_comment()?;
            Ok((ads, favorites, tasks))
        })
        .await?;

    let now = Utc::now();
    Ok(Json(AdListResponse {
        ad_list: ads.into_iter().map(|row| ad_response(row, now)).collect(),
        favorites: favorites.iter().map(|id| parse_id(id)).collect(),
        search,
        grouped_tasks: group_by_responsible(tasks),
    }))
}

/// Buckets rows by responsible username, keeping row order inside each
/// bucket and ordering buckets by first appearance.
pub fn group_by_responsible(rows: Vec<TaskRow>) -> Vec<TaskGroup> {
    let mut groups: Vec<TaskGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let slot = *index.entry(row.responsible_username.clone()).or_insert_with(|| {
            groups.push(TaskGroup {
                responsible: row.responsible_username.clone(),
                tasks: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].tasks.push(task_entry(row));
    }

    groups
}

/// GET /ads/{ad_id}
pub async fn ad_detail(
    State(state): State<AppState>,
    AppPath(ad_id): AppPath<Uuid>,
) -> Result<Json<AdDetailResponse>, ApiError> {
    let id = ad_id.to_string();
    let (ad, comments) = state
        .with_db(move |db| {
            let ad = db.get_ad(&id)?.ok_or(ApiError::NotFound)?;
            let comments = db.comments_for_ad(&id)?;
            Ok((ad, comments))
        })
        .await?;

    let now = Utc::now();
    Ok(Json(AdDetailResponse {
        ad: ad_response(ad, now),
        comments: comments.into_iter().map(|c| comment_response(c, now)).collect(),
    }))
}

/// POST /ads/create
pub async fn create_ad(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(form): AppJson<AdForm>,
) -> Result<Redirect, ApiError> {
    let clean = forms::clean_ad(form)?;
    let ad_id = Uuid::new_v4();
    let owner_id = claims.sub.to_string();

    state
        .with_db(move |db| {
            let ad = resolve_write(db, clean, &owner_id)?;
            db.insert_ad(&ad_id.to_string(), &owner_id, &ad, Utc::now())?;
            Ok(())
        })
        .await?;

    info!("Ad {} created by {}", ad_id, claims.username);
    Ok(Redirect::to("/ads"))
}

/// GET /ads/{ad_id}/edit: the stored values as a form, for the owner only.
pub async fn edit_ad(
    State(state): State<AppState>,
    AppPath(ad_id): AppPath<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<AdForm>, ApiError> {
    let id = ad_id.to_string();
    let ad = state
        .with_db(move |db| ensure_owner(db.get_ad(&id)?, &claims))
        .await?;

    Ok(Json(AdForm {
        title: ad.title,
        price: ad.price_cents.map(format_price),
        text: ad.text,
        tags: ad.tags,
        responsible: Some(ad.responsible_username),
        picture: None,
        content_type: ad.content_type,
    }))
}

/// POST /ads/{ad_id}/update
pub async fn update_ad(
    State(state): State<AppState>,
    AppPath(ad_id): AppPath<Uuid>,
    Extension(claims): Extension<Claims>,
    AppJson(form): AppJson<AdForm>,
) -> Result<Redirect, ApiError> {
    let id = ad_id.to_string();
    let username = claims.username.clone();

    state
        .with_db(move |db| {
            let existing = ensure_owner(db.get_ad(&id)?, &claims)?;
            let clean = forms::clean_ad(form)?;
            // An omitted responsible user keeps the current one.
            let ad = resolve_write(db, clean, &existing.responsible_id)?;
            if !db.update_ad(&id, &ad, Utc::now())? {
                return Err(ApiError::NotFound);
            }
            Ok(())
        })
        .await?;

    info!("Ad {} updated by {}", ad_id, username);
    Ok(Redirect::to("/ads"))
}

/// POST /ads/{ad_id}/delete
pub async fn delete_ad(
    State(state): State<AppState>,
    AppPath(ad_id): AppPath<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Redirect, ApiError> {
    let id = ad_id.to_string();
    let username = claims.username.clone();

    state
        .with_db(move |db| {
            ensure_owner(db.get_ad(&id)?, &claims)?;
            db.delete_ad(&id)?;
            Ok(())
        })
        .await?;

    info!("Ad {} deleted by {}", ad_id, username);
    Ok(Redirect::to("/ads"))
}

/// Turns the form's responsible username into a user id, falling back to
/// `default_responsible` when the form leaves it out.
fn resolve_write(db: &Database, clean: CleanAd, default_responsible: &str) -> Result<AdWrite, ApiError> {
    let responsible_id = match clean.responsible.as_deref() {
        Some(username) => match db.get_user_by_username(username)? {
            Some(user) => user.id,
            None => {
                return Err(FieldErrors::single(
                    "responsible",
                    "Select a valid choice. That choice is not one of the available choices.",
                )
                .into());
            }
        },
        None => default_responsible.to_string(),
    };
    Ok(clean.into_write(responsible_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ad_id: &str, responsible: &str, last: Option<&str>) -> TaskRow {
        TaskRow {
            ad_id: ad_id.to_string(),
            title: format!("Ad {ad_id}"),
            owner_username: "owner".into(),
            responsible_username: responsible.into(),
            last_comment_time: last.map(str::to_string),
            last_comment_content: last.map(|_| "hi".to_string()),
            last_comment_owner: last.map(|_| "someone".to_string()),
        }
    }

    #[test]
    fn groups_keep_first_appearance_order() {
        let a = Uuid::new_v4().to_string();
        let b = Uuid::new_v4().to_string();
        let c = Uuid::new_v4().to_string();
        let rows = vec![
            row(&a, "bob", Some("2024-05-01T12:03:00.000000Z")),
            row(&b, "alice", Some("2024-05-01T12:02:00.000000Z")),
            row(&c, "bob", None),
        ];

        let groups = group_by_responsible(rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].responsible, "bob");
        assert_eq!(groups[1].responsible, "alice");

        let bob_ids: Vec<String> = groups[0].tasks.iter().map(|t| t.id.to_string()).collect();
        assert_eq!(bob_ids, vec![a, c]);
        assert!(groups[0].tasks[1].last_comment_time.is_none());
    }
}
