//! Conversions from store rows to API responses.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use classifieds_db::models::{AdRow, BreedRow, CatRow, CommentRow, TaskRow};
use classifieds_types::api::{AdResponse, CommentResponse, TaskEntry};
use classifieds_types::catalog::{BreedResponse, CatResponse};

use crate::forms::format_price;
use crate::humanize::natural_time;

pub fn parse_id(raw: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt id '{}': {}", raw, e);
        Uuid::default()
    })
}

pub fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite's own datetime() output has no timezone; read it as UTC.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", raw, e);
            DateTime::default()
        })
}

pub fn ad_response(row: AdRow, now: DateTime<Utc>) -> AdResponse {
    let updated_at = parse_timestamp(&row.updated_at);
    AdResponse {
        id: parse_id(&row.id),
        title: row.title,
        price: row.price_cents.map(format_price),
        text: row.text,
        tags: row.tags,
        owner_id: parse_id(&row.owner_id),
        owner_username: row.owner_username,
        responsible_username: row.responsible_username,
        has_picture: row.has_picture,
        content_type: row.content_type,
        created_at: parse_timestamp(&row.created_at),
        updated_at,
        natural_updated: natural_time(updated_at, now),
    }
}

pub fn comment_response(row: CommentRow, now: DateTime<Utc>) -> CommentResponse {
    let updated_at = parse_timestamp(&row.updated_at);
    CommentResponse {
        id: parse_id(&row.id),
        text: row.text,
        owner_id: parse_id(&row.owner_id),
        owner_username: row.owner_username,
        updated_at,
        natural_updated: natural_time(updated_at, now),
    }
}

pub fn task_entry(row: TaskRow) -> TaskEntry {
    TaskEntry {
        id: parse_id(&row.ad_id),
        title: row.title,
        owner_username: row.owner_username,
        last_comment_time: row.last_comment_time.as_deref().map(parse_timestamp),
        last_comment_content: row.last_comment_content,
        last_comment_owner: row.last_comment_owner,
    }
}

pub fn breed_response(row: BreedRow) -> BreedResponse {
    BreedResponse {
        id: parse_id(&row.id),
        name: row.name,
    }
}

pub fn cat_response(row: CatRow) -> CatResponse {
    CatResponse {
        id: parse_id(&row.id),
        nickname: row.nickname,
        foods: row.foods,
        weight: row.weight,
        breed_id: parse_id(&row.breed_id),
        breed_name: row.breed_name,
    }
}
