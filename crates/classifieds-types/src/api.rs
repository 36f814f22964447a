use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- Token claims --

/// Bearer token claims. Canonical definition shared by the auth handlers
/// (issuing) and the auth middleware (verifying).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

// -- Ads --

/// Submitted ad form. Every field defaults so that missing input turns into
/// a field error instead of a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdForm {
    #[serde(default)]
    pub title: String,
    /// Decimal string, e.g. "1250.00".
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Username of the responsible user; the owner when absent.
    #[serde(default)]
    pub responsible: Option<String>,
    /// Base64-encoded picture bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdListQuery {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdResponse {
    pub id: Uuid,
    pub title: String,
    pub price: Option<String>,
    pub text: String,
    pub tags: Vec<String>,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub responsible_username: String,
    pub has_picture: bool,
    pub content_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Relative label such as "3 hours ago", computed per request.
    pub natural_updated: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEntry {
    pub id: Uuid,
    pub title: String,
    pub owner_username: String,
    pub last_comment_time: Option<DateTime<Utc>>,
    pub last_comment_content: Option<String>,
    pub last_comment_owner: Option<String>,
}

/// Ads bucketed by responsible user, in order of each bucket's most
/// recently commented ad.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskGroup {
    pub responsible: String,
    pub tasks: Vec<TaskEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdListResponse {
    pub ad_list: Vec<AdResponse>,
    pub favorites: Vec<Uuid>,
    pub search: Option<String>,
    pub grouped_tasks: Vec<TaskGroup>,
}

// -- Comments --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommentRequest {
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub text: String,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub updated_at: DateTime<Utc>,
    pub natural_updated: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdDetailResponse {
    pub ad: AdResponse,
    pub comments: Vec<CommentResponse>,
}

// -- Home --

#[derive(Debug, Serialize, Deserialize)]
pub struct HomeResponse {
    pub installed: Vec<String>,
    pub my_statement: String,
}
