use std::collections::HashMap;

use crate::models::{AdRow, AdWrite, CommentRow, PictureRow, TaskRow, UserRow};
use crate::{Database, OptionalExt, timestamp};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, params};

const AD_SELECT: &str = "SELECT a.id, a.title, a.price_cents, a.text, a.picture IS NOT NULL, a.content_type,
            a.owner_id, o.username, a.responsible_id, r.username, a.created_at, a.updated_at
     FROM ads a
     JOIN users o ON o.id = a.owner_id
     JOIN users r ON r.id = a.responsible_id";

impl Database {
    // -- Users --

    /// Returns false if the username is already taken.
    pub fn create_user(&self, id: &str, username: &str, password_hash: &str) -> Result<bool> {
        self.with_conn(|conn| {
            match conn.execute(
                "INSERT INTO users (id, username, password) VALUES (?1, ?2, ?3)",
                (id, username, password_hash),
            ) {
                Ok(_) => Ok(true),
                Err(e) if is_unique_violation(&e) => Ok(false),
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username", username))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    // -- Ads --

    /// Inserts the ad and its tag links in one transaction.
    pub fn insert_ad(&self, id: &str, owner_id: &str, ad: &AdWrite, now: DateTime<Utc>) -> Result<()> {
        let now = timestamp(now);
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let picture = ad.picture.as_ref();
            tx.execute(
                "INSERT INTO ads (id, title, price_cents, text, picture, content_type, owner_id, responsible_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
                params![
                    id,
                    ad.title,
                    ad.price_cents,
                    ad.text,
                    picture.map(|p| p.bytes.as_slice()),
                    picture.map(|p| p.content_type.as_str()),
                    owner_id,
                    ad.responsible_id,
                    now,
                ],
            )?;
            set_tags(&tx, id, &ad.tags)?;
            tx.commit()?;
            Ok(())
        })
    }

    /// Replaces the ad's fields and tags. The stored picture is kept unless
    /// `ad.picture` carries a new one. Returns false if the ad is gone.
    pub fn update_ad(&self, id: &str, ad: &AdWrite, now: DateTime<Utc>) -> Result<bool> {
        let now = timestamp(now);
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let changed = match &ad.picture {
                Some(picture) => tx.execute(
                    "UPDATE ads SET title = ?2, price_cents = ?3, text = ?4, responsible_id = ?5,
                            picture = ?6, content_type = ?7, updated_at = ?8
                     WHERE id = ?1",
                    params![
                        id,
                        ad.title,
                        ad.price_cents,
                        ad.text,
                        ad.responsible_id,
                        picture.bytes,
                        picture.content_type,
                        now,
                    ],
                )?,
                None => tx.execute(
                    "UPDATE ads SET title = ?2, price_cents = ?3, text = ?4, responsible_id = ?5, updated_at = ?6
                     WHERE id = ?1",
                    params![id, ad.title, ad.price_cents, ad.text, ad.responsible_id, now],
                )?,
            };
            if changed == 0 {
                return Ok(false);
            }
            set_tags(&tx, id, &ad.tags)?;
            tx.commit()?;
            Ok(true)
        })
    }

    pub fn get_ad(&self, id: &str) -> Result<Option<AdRow>> {
        self.with_conn(|conn| {
            let sql = format!("{AD_SELECT} WHERE a.id = ?1");
            let ad = conn.query_row(&sql, [id], map_ad).optional()?;
            match ad {
                Some(mut ad) => {
                    let mut tags = tags_for_ads(conn, std::slice::from_ref(&ad.id))?;
                    ad.tags = tags.remove(&ad.id).unwrap_or_default();
                    Ok(Some(ad))
                }
                None => Ok(None),
            }
        })
    }

    pub fn ad_exists(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let found = conn
                .query_row("SELECT 1 FROM ads WHERE id = ?1", [id], |_| Ok(()))
                .optional()?;
            Ok(found.is_some())
        })
    }

    /// Most recently updated ads first, at most `limit`. With a search term,
    /// keeps ads whose title or text contains it or that carry a tag named
    /// exactly `search`. Each ad appears once. Case folding is SQLite's
    /// `LIKE`: ASCII letters only, so "ärger" does not find "Ärger".
    pub fn list_ads(&self, search: Option<&str>, limit: u32) -> Result<Vec<AdRow>> {
        self.with_conn(|conn| {
            let mut ads = match search {
                Some(term) => {
                    let sql = format!(
                        "{AD_SELECT}
                         WHERE a.title LIKE ?1 ESCAPE '\\'
                            OR a.text LIKE ?1 ESCAPE '\\'
                            OR EXISTS (
                                SELECT 1 FROM ad_tags adt
                                JOIN tags t ON t.id = adt.tag_id
                                WHERE adt.ad_id = a.id AND t.name = ?2
                            )
                         ORDER BY a.updated_at DESC, a.rowid DESC
                         LIMIT ?3"
                    );
                    let mut stmt = conn.prepare(&sql)?;
                    stmt.query_map(params![like_pattern(term), term, limit], map_ad)?
                        .collect::<std::result::Result<Vec<_>, _>>()?
                }
                None => {
                    let sql = format!("{AD_SELECT} ORDER BY a.updated_at DESC, a.rowid DESC LIMIT ?1");
                    let mut stmt = conn.prepare(&sql)?;
                    stmt.query_map([limit], map_ad)?
                        .collect::<std::result::Result<Vec<_>, _>>()?
                }
            };

            let ids: Vec<String> = ads.iter().map(|ad| ad.id.clone()).collect();
            let mut tags = tags_for_ads(conn, &ids)?;
            for ad in &mut ads {
                ad.tags = tags.remove(&ad.id).unwrap_or_default();
            }
            Ok(ads)
        })
    }

    /// Returns `None` if the ad does not exist; the inner fields are `None`
    /// when the ad has no picture.
    pub fn get_ad_picture(&self, id: &str) -> Result<Option<PictureRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT picture, content_type FROM ads WHERE id = ?1",
                [id],
                |row| {
                    Ok(PictureRow {
                        picture: row.get(0)?,
                        content_type: row.get(1)?,
                    })
                },
            )
            .optional()
        })
    }

    pub fn delete_ad(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM ads WHERE id = ?1", [id])? > 0))
    }

    /// Every ad with its latest comment (by updated_at) attached, ordered by
    /// that comment's time, newest first; ads without comments come last.
    /// One pass: the latest comment per ad is picked with a window function.
    pub fn ads_by_latest_comment(&self) -> Result<Vec<TaskRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "WITH latest AS (
                     SELECT c.ad_id, c.updated_at, c.text, u.username,
                            ROW_NUMBER() OVER (
                                PARTITION BY c.ad_id ORDER BY c.updated_at DESC, c.rowid DESC
                            ) AS rn
                     FROM comments c
                     JOIN users u ON u.id = c.owner_id
                 )
                 SELECT a.id, a.title, o.username, r.username, l.updated_at, l.text, l.username
                 FROM ads a
                 JOIN users o ON o.id = a.owner_id
                 JOIN users r ON r.id = a.responsible_id
                 LEFT JOIN latest l ON l.ad_id = a.id AND l.rn = 1
                 ORDER BY l.updated_at IS NULL, l.updated_at DESC, a.updated_at DESC, a.rowid DESC",
            )?;

            let rows = stmt
                .query_map([], |row| {
                    Ok(TaskRow {
                        ad_id: row.get(0)?,
                        title: row.get(1)?,
                        owner_username: row.get(2)?,
                        responsible_username: row.get(3)?,
                        last_comment_time: row.get(4)?,
                        last_comment_content: row.get(5)?,
                        last_comment_owner: row.get(6)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Comments --

    pub fn insert_comment(
        &self,
        id: &str,
        ad_id: &str,
        owner_id: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let now = timestamp(now);
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO comments (id, text, ad_id, owner_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![id, text, ad_id, owner_id, now],
            )?;
            Ok(())
        })
    }

    pub fn get_comment(&self, id: &str) -> Result<Option<CommentRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT c.id, c.text, c.ad_id, c.owner_id, u.username, c.created_at, c.updated_at
                 FROM comments c
                 JOIN users u ON u.id = c.owner_id
                 WHERE c.id = ?1",
                [id],
                map_comment,
            )
            .optional()
        })
    }

    /// Comments on an ad, newest first.
    pub fn comments_for_ad(&self, ad_id: &str) -> Result<Vec<CommentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.text, c.ad_id, c.owner_id, u.username, c.created_at, c.updated_at
                 FROM comments c
                 JOIN users u ON u.id = c.owner_id
                 WHERE c.ad_id = ?1
                 ORDER BY c.updated_at DESC, c.rowid DESC",
            )?;
            let rows = stmt
                .query_map([ad_id], map_comment)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn delete_comment(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM comments WHERE id = ?1", [id])? > 0))
    }

    // -- Favorites --

    /// Marks the ad as a favorite of the user. A row that already exists is
    /// left alone; returns whether a row was inserted.
    pub fn add_favorite(&self, id: &str, user_id: &str, ad_id: &str, now: DateTime<Utc>) -> Result<bool> {
        let now = timestamp(now);
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO favs (id, user_id, ad_id, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![id, user_id, ad_id, now],
            );
            match inserted {
                Ok(_) => Ok(true),
                Err(e) if is_unique_violation(&e) => Ok(false),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Returns whether a row was deleted.
    pub fn remove_favorite(&self, user_id: &str, ad_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute(
                "DELETE FROM favs WHERE user_id = ?1 AND ad_id = ?2",
                [user_id, ad_id],
            )?;
            Ok(deleted > 0)
        })
    }

    pub fn favorite_ad_ids(&self, user_id: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT ad_id FROM favs WHERE user_id = ?1 ORDER BY created_at, rowid")?;
            let rows = stmt
                .query_map([user_id], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;
            Ok(rows)
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    let sql = format!("SELECT id, username, password, created_at FROM users WHERE {column} = ?1");
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row([value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn map_ad(row: &Row<'_>) -> rusqlite::Result<AdRow> {
    Ok(AdRow {
        id: row.get(0)?,
        title: row.get(1)?,
        price_cents: row.get(2)?,
        text: row.get(3)?,
        has_picture: row.get(4)?,
        content_type: row.get(5)?,
        owner_id: row.get(6)?,
        owner_username: row.get(7)?,
        responsible_id: row.get(8)?,
        responsible_username: row.get(9)?,
        tags: Vec::new(),
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn map_comment(row: &Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        id: row.get(0)?,
        text: row.get(1)?,
        ad_id: row.get(2)?,
        owner_id: row.get(3)?,
        owner_username: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn set_tags(conn: &Connection, ad_id: &str, tags: &[String]) -> Result<()> {
    conn.execute("DELETE FROM ad_tags WHERE ad_id = ?1", [ad_id])?;
    for name in tags {
        conn.execute("INSERT OR IGNORE INTO tags (name) VALUES (?1)", [name])?;
        conn.execute(
            "INSERT OR IGNORE INTO ad_tags (ad_id, tag_id) SELECT ?1, id FROM tags WHERE name = ?2",
            [ad_id, name.as_str()],
        )?;
    }
    Ok(())
}

/// Batch-fetch tag names for a set of ad IDs.
fn tags_for_ads(conn: &Connection, ad_ids: &[String]) -> Result<HashMap<String, Vec<String>>> {
    let mut tags: HashMap<String, Vec<String>> = HashMap::new();
    if ad_ids.is_empty() {
        return Ok(tags);
    }

    let placeholders: Vec<String> = (1..=ad_ids.len()).map(|i| format!("?{}", i)).collect();
    let sql = format!(
        "SELECT adt.ad_id, t.name FROM ad_tags adt
         JOIN tags t ON t.id = adt.tag_id
         WHERE adt.ad_id IN ({})
         ORDER BY t.name",
        placeholders.join(", ")
    );

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::types::ToSql> = ad_ids
        .iter()
        .map(|id| id as &dyn rusqlite::types::ToSql)
        .collect();

    let rows = stmt.query_map(params.as_slice(), |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;
    for row in rows {
        let (ad_id, name) = row?;
        tags.entry(ad_id).or_default().push(name);
    }

    Ok(tags)
}

/// `%term%` with LIKE wildcards in `term` matched literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Picture;
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn seed_users(db: &Database, names: &[&str]) {
        for name in names {
            db.create_user(&format!("user-{name}"), name, "hash").unwrap();
        }
    }

    fn ad(title: &str, text: &str, responsible: &str, tags: &[&str]) -> AdWrite {
        AdWrite {
            title: title.to_string(),
            price_cents: Some(1000),
            text: text.to_string(),
            responsible_id: format!("user-{responsible}"),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            picture: None,
        }
    }

    fn ids(rows: &[AdRow]) -> Vec<&str> {
        rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn search_matches_title_text_and_exact_tag() {
        let db = Database::open_in_memory().unwrap();
        seed_users(&db, &["alice"]);
        db.insert_ad("a1", "user-alice", &ad("Red Car", "runs well", "alice", &["car"]), base())
            .unwrap();
        db.insert_ad("a2", "user-alice", &ad("Bike", "like a CAR but smaller", "alice", &[]), base() + Duration::minutes(1))
            .unwrap();
        db.insert_ad("a3", "user-alice", &ad("Lamp", "bright", "alice", &["vehicle"]), base() + Duration::minutes(2))
            .unwrap();

        let found = db.list_ads(Some("car"), 10).unwrap();
        assert_eq!(ids(&found), vec!["a2", "a1"]);

        let found = db.list_ads(Some("vehicle"), 10).unwrap();
        assert_eq!(ids(&found), vec!["a3"]);

        // tag match is exact, not a substring match
        assert!(db.list_ads(Some("vehic"), 10).unwrap().is_empty());
        assert!(db.list_ads(Some("blue"), 10).unwrap().is_empty());
    }

    #[test]
    fn search_returns_each_ad_once_when_several_clauses_match() {
        let db = Database::open_in_memory().unwrap();
        seed_users(&db, &["alice"]);
        db.insert_ad("a1", "user-alice", &ad("car", "car car", "alice", &["car", "red"]), base())
            .unwrap();

        let found = db.list_ads(Some("car"), 10).unwrap();
        assert_eq!(ids(&found), vec!["a1"]);
        assert_eq!(found[0].tags, vec!["car", "red"]);
    }

    #[test]
    fn search_treats_like_wildcards_literally() {
        let db = Database::open_in_memory().unwrap();
        seed_users(&db, &["alice"]);
        db.insert_ad("a1", "user-alice", &ad("100% cotton", "shirt", "alice", &[]), base())
            .unwrap();
        db.insert_ad("a2", "user-alice", &ad("100 cotton", "shirt", "alice", &[]), base())
            .unwrap();

        assert_eq!(ids(&db.list_ads(Some("0%"), 10).unwrap()), vec!["a1"]);
        assert!(db.list_ads(Some("_"), 10).unwrap().is_empty());
    }

    #[test]
    fn search_folds_ascii_case_only() {
        let db = Database::open_in_memory().unwrap();
        seed_users(&db, &["alice"]);
        db.insert_ad("a1", "user-alice", &ad("Ärger im Büro", "Desk", "alice", &[]), base())
            .unwrap();

        assert_eq!(ids(&db.list_ads(Some("desk"), 10).unwrap()), vec!["a1"]);
        assert_eq!(ids(&db.list_ads(Some("Ärger"), 10).unwrap()), vec!["a1"]);
        // SQLite's LIKE leaves non-ASCII letters case-sensitive
        assert!(db.list_ads(Some("ärger"), 10).unwrap().is_empty());
    }

    #[test]
    fn duplicate_username_is_reported_not_raised() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.create_user("u1", "alice", "hash").unwrap());
        assert!(!db.create_user("u2", "alice", "hash").unwrap());
        assert!(db.get_user_by_id("u2").unwrap().is_none());
        assert_eq!(db.get_user_by_username("alice").unwrap().unwrap().id, "u1");
    }

    #[test]
    fn listing_is_capped_and_newest_first() {
        let db = Database::open_in_memory().unwrap();
        seed_users(&db, &["alice"]);
        for i in 0..12 {
            db.insert_ad(
                &format!("a{i:02}"),
                "user-alice",
                &ad(&format!("Ad {i}"), "text", "alice", &[]),
                base() + Duration::minutes(i),
            )
            .unwrap();
        }

        let ads = db.list_ads(None, 10).unwrap();
        assert_eq!(ads.len(), 10);
        assert_eq!(ads[0].id, "a11");
        assert!(ads.windows(2).all(|w| w[0].updated_at > w[1].updated_at));
    }

    #[test]
    fn update_replaces_fields_and_tags_but_keeps_picture() {
        let db = Database::open_in_memory().unwrap();
        seed_users(&db, &["alice", "bob"]);
        let mut write = ad("Old", "old text", "alice", &["one", "two"]);
        write.picture = Some(Picture {
            bytes: vec![1, 2, 3],
            content_type: "image/png".into(),
        });
        db.insert_ad("a1", "user-alice", &write, base()).unwrap();

        let updated = db
            .update_ad("a1", &ad("New", "new text", "bob", &["three"]), base() + Duration::hours(1))
            .unwrap();
        assert!(updated);

        let row = db.get_ad("a1").unwrap().unwrap();
        assert_eq!(row.title, "New");
        assert_eq!(row.responsible_username, "bob");
        assert_eq!(row.owner_username, "alice");
        assert_eq!(row.tags, vec!["three"]);
        assert!(row.has_picture);
        assert_eq!(row.updated_at, timestamp(base() + Duration::hours(1)));

        let picture = db.get_ad_picture("a1").unwrap().unwrap();
        assert_eq!(picture.picture.as_deref(), Some(&[1u8, 2, 3][..]));
        assert_eq!(picture.content_type.as_deref(), Some("image/png"));

        assert!(!db.update_ad("missing", &ad("x", "y", "alice", &[]), base()).unwrap());
    }

    #[test]
    fn favorites_are_idempotent() {
        let db = Database::open_in_memory().unwrap();
        seed_users(&db, &["alice", "bob"]);
        db.insert_ad("a1", "user-alice", &ad("Red Car", "t", "alice", &[]), base()).unwrap();

        assert!(db.add_favorite("f1", "user-bob", "a1", base()).unwrap());
        assert!(!db.add_favorite("f2", "user-bob", "a1", base()).unwrap());
        assert_eq!(db.favorite_ad_ids("user-bob").unwrap(), vec!["a1"]);

        assert!(db.remove_favorite("user-bob", "a1").unwrap());
        assert!(!db.remove_favorite("user-bob", "a1").unwrap());
        assert!(db.favorite_ad_ids("user-bob").unwrap().is_empty());
    }

    #[test]
    fn latest_comment_report_orders_commented_ads_first() {
        let db = Database::open_in_memory().unwrap();
        seed_users(&db, &["alice", "bob"]);
        db.insert_ad("quiet", "user-alice", &ad("Quiet", "t", "alice", &[]), base() + Duration::hours(5))
            .unwrap();
        db.insert_ad("old", "user-alice", &ad("Old", "t", "bob", &[]), base()).unwrap();
        db.insert_ad("busy", "user-bob", &ad("Busy", "t", "alice", &[]), base()).unwrap();

        db.insert_comment("c1", "old", "user-bob", "first", base() + Duration::minutes(1)).unwrap();
        db.insert_comment("c2", "busy", "user-alice", "early", base() + Duration::minutes(2)).unwrap();
        db.insert_comment("c3", "busy", "user-bob", "latest", base() + Duration::minutes(3)).unwrap();

        let rows = db.ads_by_latest_comment().unwrap();
        let order: Vec<&str> = rows.iter().map(|r| r.ad_id.as_str()).collect();
        assert_eq!(order, vec!["busy", "old", "quiet"]);

        assert_eq!(rows[0].last_comment_content.as_deref(), Some("latest"));
        assert_eq!(rows[0].last_comment_owner.as_deref(), Some("bob"));
        assert_eq!(rows[0].responsible_username, "alice");
        assert_eq!(rows[1].last_comment_time, Some(timestamp(base() + Duration::minutes(1))));
        assert!(rows[2].last_comment_time.is_none());
    }

    #[test]
    fn deleting_an_ad_cascades() {
        let db = Database::open_in_memory().unwrap();
        seed_users(&db, &["alice", "bob"]);
        db.insert_ad("a1", "user-alice", &ad("Red Car", "t", "alice", &["car"]), base()).unwrap();
        db.insert_comment("c1", "a1", "user-bob", "Nice!", base()).unwrap();
        db.add_favorite("f1", "user-bob", "a1", base()).unwrap();

        assert!(db.delete_ad("a1").unwrap());
        assert!(!db.delete_ad("a1").unwrap());
        assert!(db.get_comment("c1").unwrap().is_none());
        assert!(db.favorite_ad_ids("user-bob").unwrap().is_empty());
        assert!(db.list_ads(Some("car"), 10).unwrap().is_empty());
    }

    #[test]
    fn comments_are_listed_newest_first() {
        let db = Database::open_in_memory().unwrap();
        seed_users(&db, &["alice"]);
        db.insert_ad("a1", "user-alice", &ad("Red Car", "t", "alice", &[]), base()).unwrap();
        db.insert_comment("c1", "a1", "user-alice", "older", base()).unwrap();
        db.insert_comment("c2", "a1", "user-alice", "newer", base() + Duration::seconds(1)).unwrap();

        let texts: Vec<String> = db
            .comments_for_ad("a1")
            .unwrap()
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(texts, vec!["newer", "older"]);
    }
}
