use crate::errors::ServerError;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

#[derive(Debug, Clone, PartialEq)]
pub struct Favorite {
    pub id: i64,
    pub user_id: i64,
    pub apartment_id: i64,
    pub created_at: NaiveDateTime,
}

fn map_favorite(row: &rusqlite::Row<'_>) -> rusqlite::Result<Favorite> {
    Ok(Favorite {
        id: row.get(0)?,
        user_id: row.get(1)?,
        apartment_id: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// A user's favorites, newest first.
pub fn list_favorites(conn: &Connection, user_id: i64) -> Result<Vec<Favorite>, ServerError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, apartment_id, created_at
         FROM favorites
         WHERE user_id = ?1
         ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![user_id], map_favorite)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn is_favorited(conn: &Connection, user_id: i64, apartment_id: i64) -> Result<bool, ServerError> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM favorites WHERE user_id = ?1 AND apartment_id = ?2",
            params![user_id, apartment_id],
            |r| r.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn insert_favorite(
    conn: &Connection,
    user_id: i64,
    apartment_id: i64,
    now: NaiveDateTime,
) -> Result<Favorite, ServerError> {
    conn.execute(
        "INSERT INTO favorites (user_id, apartment_id, created_at) VALUES (?1, ?2, ?3)",
        params![user_id, apartment_id, now],
    )?;
    Ok(Favorite {
        id: conn.last_insert_rowid(),
        user_id,
        apartment_id,
        created_at: now,
    })
}

pub fn delete_favorite(conn: &Connection, id: i64) -> Result<bool, ServerError> {
    let deleted = conn.execute("DELETE FROM favorites WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}
