use crate::domain::listing::{ListingId, ListingImage};
use crate::errors::ServerError;
use chrono::NaiveDateTime;
use rusqlite::{params, params_from_iter, Connection};
use std::collections::HashMap;

const IMAGE_COLUMNS: &str = r#"id, listing_id, image_url, label, "order""#;

fn map_image(row: &rusqlite::Row<'_>) -> rusqlite::Result<(ListingId, ListingImage)> {
    Ok((
        row.get(1)?,
        ListingImage {
            id: row.get(0)?,
            image_url: row.get(2)?,
            label: row.get(3)?,
            order: row.get(4)?,
        },
    ))
}

pub fn list_images(conn: &Connection, listing_id: ListingId) -> Result<Vec<ListingImage>, ServerError> {
    let mut stmt = conn.prepare(&format!(
        r#"SELECT {IMAGE_COLUMNS} FROM listing_images
           WHERE listing_id = ?1
           ORDER BY "order", created_at, id"#
    ))?;
    let rows = stmt.query_map(params![listing_id], map_image)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?.1);
    }
    Ok(out)
}

/// Listing ids bound per image query; SQLite caps bound parameters per statement.
const IDS_PER_QUERY: usize = 500;

/// Images for many listings at once, keyed by listing id, each list in display order.
pub fn images_for_listings(
    conn: &Connection,
    listing_ids: &[ListingId],
) -> Result<HashMap<ListingId, Vec<ListingImage>>, ServerError> {
    let mut out: HashMap<ListingId, Vec<ListingImage>> = HashMap::new();

    for chunk in listing_ids.chunks(IDS_PER_QUERY) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let mut stmt = conn.prepare_cached(&format!(
            r#"SELECT {IMAGE_COLUMNS} FROM listing_images
               WHERE listing_id IN ({placeholders})
               ORDER BY "order", created_at, id"#
        ))?;
        let rows = stmt.query_map(params_from_iter(chunk.iter()), map_image)?;

        // All of a listing's images come back from the same chunk.
        for r in rows {
            let (listing_id, image) = r?;
            out.entry(listing_id).or_default().push(image);
        }
    }
    Ok(out)
}

/// Append an image; its display order is the listing's current image count.
pub fn insert_image(
    conn: &Connection,
    listing_id: ListingId,
    image_url: &str,
    label: Option<&str>,
    now: NaiveDateTime,
) -> Result<ListingImage, ServerError> {
    let order: i64 = conn.query_row(
        "SELECT COUNT(*) FROM listing_images WHERE listing_id = ?1",
        params![listing_id],
        |r| r.get(0),
    )?;
    conn.execute(
        r#"INSERT INTO listing_images (listing_id, image_url, label, "order", created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)"#,
        params![listing_id, image_url, label, order, now],
    )?;
    Ok(ListingImage {
        id: conn.last_insert_rowid(),
        image_url: image_url.to_string(),
        label: label.map(str::to_string),
        order,
    })
}

pub fn delete_image(conn: &Connection, id: i64) -> Result<bool, ServerError> {
    let deleted = conn.execute("DELETE FROM listing_images WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::utils::init_test_db;

    #[test]
    fn batch_lookup_spans_more_ids_than_one_statement_binds() {
        let db = init_test_db();
        let now = chrono::Utc::now().naive_utc();

        let found = db
            .with_conn(|conn| {
                insert_image(conn, 1, "https://img.example/a.jpg", None, now)?;
                insert_image(conn, 40_000, "https://img.example/b.jpg", Some("Kitchen"), now)?;
                insert_image(conn, 40_000, "https://img.example/c.jpg", None, now)?;
                let ids: Vec<ListingId> = (1..=40_000).collect();
                images_for_listings(conn, &ids)
            })
            .expect("lookup failed");

        assert_eq!(found.len(), 2);
        assert_eq!(found[&1].len(), 1);
        let orders: Vec<i64> = found[&40_000].iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![0, 1]);
    }
}
