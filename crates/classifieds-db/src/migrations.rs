use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id          TEXT PRIMARY KEY,
                username    TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE TABLE ads (
                id              TEXT PRIMARY KEY,
                title           TEXT NOT NULL,
                price_cents     INTEGER,
                text            TEXT NOT NULL,
                picture         BLOB,
                content_type    TEXT,
                owner_id        TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                responsible_id  TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            );

            CREATE INDEX idx_ads_updated ON ads(updated_at);

            CREATE TABLE tags (
                id      INTEGER PRIMARY KEY,
                name    TEXT NOT NULL UNIQUE
            );

            CREATE TABLE ad_tags (
                ad_id   TEXT NOT NULL REFERENCES ads(id) ON DELETE CASCADE,
                tag_id  INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
                PRIMARY KEY (ad_id, tag_id)
            );

            CREATE TABLE comments (
                id          TEXT PRIMARY KEY,
                text        TEXT NOT NULL,
                ad_id       TEXT NOT NULL REFERENCES ads(id) ON DELETE CASCADE,
                owner_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            );

            CREATE INDEX idx_comments_ad ON comments(ad_id, updated_at);

            CREATE TABLE favs (
                id          TEXT PRIMARY KEY,
                user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                ad_id       TEXT NOT NULL REFERENCES ads(id) ON DELETE CASCADE,
                created_at  TEXT NOT NULL,
                UNIQUE(user_id, ad_id)
            );

            CREATE TABLE breeds (
                id      TEXT PRIMARY KEY,
                name    TEXT NOT NULL
            );

            CREATE TABLE cats (
                id          TEXT PRIMARY KEY,
                nickname    TEXT NOT NULL,
                foods       TEXT NOT NULL,
                weight      TEXT NOT NULL,
                breed_id    TEXT NOT NULL REFERENCES breeds(id) ON DELETE CASCADE
            );

            CREATE TABLE sessions (
                session_key TEXT PRIMARY KEY,
                data        TEXT NOT NULL,
                expires_at  TEXT NOT NULL
            );

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
