use crate::domain::university::University;
use crate::errors::ServerError;
use rusqlite::{params, Connection};

/// Active universities ordered by name.
pub fn list_universities(conn: &Connection) -> Result<Vec<University>, ServerError> {
    let mut stmt = conn.prepare(
        "SELECT name, full_name, latitude, longitude
         FROM universities
         WHERE is_active = 1
         ORDER BY name",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(University {
            name: row.get(0)?,
            full_name: row.get(1)?,
            location: crate::domain::geo::Coordinates::new(row.get(2)?, row.get(3)?),
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Insert or refresh a university by name. Returns `true` when it was new.
pub fn upsert_university(conn: &Connection, uni: &University) -> Result<bool, ServerError> {
    let existed: i64 = conn.query_row(
        "SELECT COUNT(*) FROM universities WHERE name = ?1",
        params![uni.name],
        |r| r.get(0),
    )?;
    conn.execute(
        r#"
        INSERT INTO universities (name, full_name, latitude, longitude, is_active)
        VALUES (?1, ?2, ?3, ?4, 1)
        ON CONFLICT(name) DO UPDATE SET
            full_name = excluded.full_name,
            latitude  = excluded.latitude,
            longitude = excluded.longitude,
            is_active = 1
        "#,
        params![uni.name, uni.full_name, uni.location.lat, uni.location.lng],
    )?;
    Ok(existed == 0)
}
