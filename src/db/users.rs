// src/db/users.rs
use crate::errors::ServerError;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

/// Find a user by username, creating it when missing. Returns the user id.
pub fn get_or_create_user(
    conn: &Connection,
    username: &str,
    email: &str,
    now: NaiveDateTime,
) -> Result<i64, ServerError> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM users WHERE username = ?1",
            params![username],
            |r| r.get(0),
        )
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }

    conn.execute(
        "INSERT INTO users (username, email, join_date, is_active) VALUES (?1, ?2, ?3, 1)",
        params![username, email, now],
    )?;
    Ok(conn.last_insert_rowid())
}
