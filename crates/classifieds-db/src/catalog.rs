use crate::models::{BreedRow, CatRow};
use crate::{Database, OptionalExt};
use anyhow::Result;
use rusqlite::{Row, params};

impl Database {
    // -- Breeds --

    pub fn insert_breed(&self, id: &str, name: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("INSERT INTO breeds (id, name) VALUES (?1, ?2)", [id, name])?;
            Ok(())
        })
    }

    pub fn update_breed(&self, id: &str, name: &str) -> Result<bool> {
        self.with_conn(|conn| {
            Ok(conn.execute("UPDATE breeds SET name = ?2 WHERE id = ?1", [id, name])? > 0)
        })
    }

    /// Deletes the breed and, through the foreign key, all of its cats.
    pub fn delete_breed(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM breeds WHERE id = ?1", [id])? > 0))
    }

    pub fn get_breed(&self, id: &str) -> Result<Option<BreedRow>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT id, name FROM breeds WHERE id = ?1", [id], map_breed)
                .optional()
        })
    }

    pub fn list_breeds(&self) -> Result<Vec<BreedRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, name FROM breeds ORDER BY name, rowid")?;
            let rows = stmt
                .query_map([], map_breed)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn count_breeds(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM breeds", [], |row| row.get(0))?;
            Ok(count as usize)
        })
    }

    // -- Cats --

    pub fn insert_cat(&self, id: &str, nickname: &str, foods: &str, weight: &str, breed_id: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO cats (id, nickname, foods, weight, breed_id) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, nickname, foods, weight, breed_id],
            )?;
            Ok(())
        })
    }

    pub fn update_cat(&self, id: &str, nickname: &str, foods: &str, weight: &str, breed_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE cats SET nickname = ?2, foods = ?3, weight = ?4, breed_id = ?5 WHERE id = ?1",
                params![id, nickname, foods, weight, breed_id],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn delete_cat(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM cats WHERE id = ?1", [id])? > 0))
    }

    pub fn get_cat(&self, id: &str) -> Result<Option<CatRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT c.id, c.nickname, c.foods, c.weight, c.breed_id, b.name
                 FROM cats c
                 JOIN breeds b ON b.id = c.breed_id
                 WHERE c.id = ?1",
                [id],
                map_cat,
            )
            .optional()
        })
    }

    pub fn list_cats(&self) -> Result<Vec<CatRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.nickname, c.foods, c.weight, c.breed_id, b.name
                 FROM cats c
                 JOIN breeds b ON b.id = c.breed_id
                 ORDER BY c.nickname, c.rowid",
            )?;
            let rows = stmt
                .query_map([], map_cat)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn map_breed(row: &Row<'_>) -> rusqlite::Result<BreedRow> {
    Ok(BreedRow {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn map_cat(row: &Row<'_>) -> rusqlite::Result<CatRow> {
    Ok(CatRow {
        id: row.get(0)?,
        nickname: row.get(1)?,
        foods: row.get(2)?,
        weight: row.get(3)?,
        breed_id: row.get(4)?,
        breed_name: row.get(5)?,
    })
}
