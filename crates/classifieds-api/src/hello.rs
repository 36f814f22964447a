use axum::extract::State;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "sessionid";
const VISITS_KEY: &str = "num_visits";
/// The counter is dropped from the session once it passes this many visits.
const MAX_VISITS: i64 = 4;

/// GET /hello: counts visits in the caller's session and sets a demo cookie.
pub async fn hello(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, String), ApiError> {
    let presented = jar.get(SESSION_COOKIE).map(|c| c.value().to_owned());
    debug!("Cookies on /hello: {:?}", jar.iter().map(|c| c.name()).collect::<Vec<_>>());

    let now = Utc::now();
    let expires_at = now + state.config.session_ttl;
    let (session_key, visits) = state
        .with_db(move |db| {
            let stored = match &presented {
                Some(key) => db.load_session(key, now)?.map(|raw| (key.clone(), raw)),
                None => None,
            };
            let (key, mut data) = match stored {
                Some((key, raw)) => (key, decode_session(&raw)),
                None => (Uuid::new_v4().simple().to_string(), Map::new()),
            };

            let visits = data.get(VISITS_KEY).and_then(Value::as_i64).unwrap_or(0) + 1;
            data.insert(VISITS_KEY.to_string(), Value::from(visits));
            if visits > MAX_VISITS {
                data.remove(VISITS_KEY);
            }

            let encoded = serde_json::to_string(&data).map_err(anyhow::Error::from)?;
            db.save_session(&key, &encoded, now, expires_at)?;
            Ok((key, visits))
        })
        .await?;

    let session_age = time::Duration::seconds(state.config.session_ttl.num_seconds());
    let jar = jar
        .add(
            Cookie::build((SESSION_COOKIE, session_key))
                .path("/")
                .http_only(true)
                .max_age(session_age),
        )
        .add(
            Cookie::build(("rygorka", "7a610d79"))
                .path("/")
                .max_age(time::Duration::seconds(1000)),
        );

    Ok((jar, format!("view count={visits}")))
}

fn decode_session(raw: &str) -> Map<String, Value> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!("Discarding unreadable session data: {}", e);
        Map::new()
    })
}
