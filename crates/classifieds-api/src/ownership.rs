use tracing::debug;
use uuid::Uuid;

use classifieds_db::models::{AdRow, CommentRow};
use classifieds_types::api::Claims;

use crate::error::ApiError;

/// A stored resource that belongs to exactly one user.
pub trait Owned {
    fn owner_id(&self) -> &str;

    fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id().parse::<Uuid>().is_ok_and(|owner| owner == user_id)
    }
}

impl Owned for AdRow {
    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Owned for CommentRow {
    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

/// Passes the resource through if the caller owns it. A resource owned by
/// someone else is reported exactly like a missing one.
pub fn ensure_owner<T: Owned>(resource: Option<T>, claims: &Claims) -> Result<T, ApiError> {
    match resource {
        Some(resource) if resource.is_owned_by(claims.sub) => Ok(resource),
        Some(_) => {
            debug!("{} denied access to a resource it does not own", claims.username);
            Err(ApiError::NotFound)
        }
        None => Err(ApiError::NotFound),
    }
}
