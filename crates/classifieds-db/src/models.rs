/// Database row types. These map directly to SQLite rows.
/// Distinct from classifieds-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub created_at: String,
}

/// An ad without its picture blob; the blob is only read by `get_ad_picture`.
#[derive(Debug, Clone)]
pub struct AdRow {
    pub id: String,
    pub title: String,
    pub price_cents: Option<i64>,
    pub text: String,
    pub has_picture: bool,
    pub content_type: Option<String>,
    pub owner_id: String,
    pub owner_username: String,
    pub responsible_id: String,
    pub responsible_username: String,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Values written by ad create/update.
#[derive(Debug, Clone, Default)]
pub struct AdWrite {
    pub title: String,
    pub price_cents: Option<i64>,
    pub text: String,
    pub responsible_id: String,
    pub tags: Vec<String>,
    /// `None` keeps the stored picture on update.
    pub picture: Option<Picture>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

pub struct PictureRow {
    pub picture: Option<Vec<u8>>,
    pub content_type: Option<String>,
}

/// One ad annotated with its most recent comment, if any.
#[derive(Debug, Clone)]
pub struct TaskRow {
    pub ad_id: String,
    pub title: String,
    pub owner_username: String,
    pub responsible_username: String,
    pub last_comment_time: Option<String>,
    pub last_comment_content: Option<String>,
    pub last_comment_owner: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CommentRow {
    pub id: String,
    pub text: String,
    pub ad_id: String,
    pub owner_id: String,
    pub owner_username: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct BreedRow {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct CatRow {
    pub id: String,
    pub nickname: String,
    pub foods: String,
    pub weight: String,
    pub breed_id: String,
    pub breed_name: String,
}
