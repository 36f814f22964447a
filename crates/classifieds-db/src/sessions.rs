use crate::{Database, OptionalExt, timestamp};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::params;
use tracing::debug;

impl Database {
    /// Returns the raw session payload, or `None` if the key is unknown or
    /// the session has expired. Expired rows are removed on the way.
    pub fn load_session(&self, key: &str, now: DateTime<Utc>) -> Result<Option<String>> {
        let now = timestamp(now);
        self.with_conn(|conn| {
            let row: Option<(String, String)> = conn
                .query_row(
                    "SELECT data, expires_at FROM sessions WHERE session_key = ?1",
                    [key],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            match row {
                Some((data, expires_at)) if expires_at > now => Ok(Some(data)),
                Some(_) => {
                    conn.execute("DELETE FROM sessions WHERE session_key = ?1", [key])?;
                    Ok(None)
                }
                None => Ok(None),
            }
        })
    }

    /// Upserts the session and purges every session that expired by `now`,
    /// so keys that are never presented again do not pile up.
    pub fn save_session(
        &self,
        key: &str,
        data: &str,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let now = timestamp(now);
        let expires_at = timestamp(expires_at);
        self.with_conn(|conn| {
            let purged = conn.execute("DELETE FROM sessions WHERE expires_at <= ?1", [&now])?;
            if purged > 0 {
                debug!("Purged {} expired sessions", purged);
            }
            conn.execute(
                "INSERT INTO sessions (session_key, data, expires_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(session_key) DO UPDATE SET data = excluded.data, expires_at = excluded.expires_at",
                params![key, data, expires_at],
            )?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn sessions_expire() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        db.save_session("k1", r#"{"num_visits":1}"#, now, now + Duration::minutes(5)).unwrap();
        assert_eq!(
            db.load_session("k1", now).unwrap().as_deref(),
            Some(r#"{"num_visits":1}"#)
        );

        db.save_session("k1", r#"{"num_visits":2}"#, now, now + Duration::minutes(5)).unwrap();
        assert_eq!(
            db.load_session("k1", now).unwrap().as_deref(),
            Some(r#"{"num_visits":2}"#)
        );

        assert!(db.load_session("k1", now + Duration::minutes(6)).unwrap().is_none());
        // the expired row is gone, even for an earlier clock
        assert!(db.load_session("k1", now).unwrap().is_none());
        assert!(db.load_session("unknown", now).unwrap().is_none());
    }

    #[test]
    fn saving_purges_sessions_nobody_came_back_for() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        for i in 0..50 {
            db.save_session(&format!("stale-{i}"), "{}", now, now + Duration::seconds(1)).unwrap();
        }
        db.save_session("live", "{}", now, now + Duration::days(1)).unwrap();

        let later = now + Duration::hours(1);
        db.save_session("fresh", "{}", later, later + Duration::days(1)).unwrap();

        let count = |db: &Database| {
            db.with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get::<_, i64>(0))?))
                .unwrap()
        };
        assert_eq!(count(&db), 2);
        assert!(db.load_session("live", later).unwrap().is_some());
        assert!(db.load_session("fresh", later).unwrap().is_some());
        assert!(db.load_session("stale-0", later).unwrap().is_none());
    }
}
