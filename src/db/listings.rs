use crate::db::images::images_for_listings;
use crate::domain::listing::{ApiListing, ListingChanges, ListingId, StoredListing};
use crate::errors::{FieldErrors, ServerError};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};

const SELECT_LISTINGS: &str = r#"
    SELECT
        l.id,               -- 0
        l.title,            -- 1
        l.description,      -- 2
        l.address,          -- 3
        l.city,             -- 4
        l.state,            -- 5
        l.zip_code,         -- 6
        l.latitude,         -- 7
        l.longitude,        -- 8
        l.monthly_rent,     -- 9
        l.bedrooms,         -- 10
        l.bathrooms,        -- 11
        l.square_feet,      -- 12
        l.room_type,        -- 13
        l.amenities,        -- 14
        l.image_url,        -- 15
        l.is_active,        -- 16
        l.available_from,   -- 17
        l.owner_id,         -- 18
        u.username,         -- 19
        u.is_active         -- 20
    FROM listings l
    LEFT JOIN users u ON u.id = l.owner_id
"#;

fn map_listing(row: &Row<'_>) -> rusqlite::Result<StoredListing> {
    Ok(StoredListing {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        address: row.get(3)?,
        city: row.get(4)?,
        state: row.get(5)?,
        zip_code: row.get(6)?,
        latitude: row.get(7)?,
        longitude: row.get(8)?,
        monthly_rent: row.get(9)?,
        bedrooms: row.get(10)?,
        bathrooms: row.get(11)?,
        square_feet: row.get(12)?,
        room_type: row.get(13)?,
        amenities: row.get(14)?,
        image_url: row.get(15)?,
        is_active: row.get(16)?,
        available_from: row.get(17)?,
        owner_id: row.get(18)?,
        owner_username: row.get(19)?,
        owner_is_active: row.get::<_, Option<bool>>(20)?.unwrap_or(true),
    })
}

fn query_listings(
    conn: &Connection,
    clause: &str,
    params: &[&dyn rusqlite::ToSql],
) -> Result<Vec<StoredListing>, ServerError> {
    let sql = format!("{SELECT_LISTINGS} {clause}");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params, map_listing)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Active listings that can be placed on the map, newest first.
pub fn list_active_listings(conn: &Connection) -> Result<Vec<StoredListing>, ServerError> {
    query_listings(
        conn,
        "WHERE l.is_active = 1 AND l.latitude IS NOT NULL AND l.longitude IS NOT NULL
         ORDER BY l.created_at DESC, l.id DESC",
        &[],
    )
}

/// Every listing of an owner, including soft-deleted ones.
pub fn list_listings_by_owner(
    conn: &Connection,
    owner_id: i64,
) -> Result<Vec<StoredListing>, ServerError> {
    query_listings(
        conn,
        "WHERE l.owner_id = ?1 ORDER BY l.created_at DESC, l.id DESC",
        &[&owner_id],
    )
}

pub fn get_listing(conn: &Connection, id: ListingId) -> Result<Option<StoredListing>, ServerError> {
    let sql = format!("{SELECT_LISTINGS} WHERE l.id = ?1");
    conn.query_row(&sql, params![id], map_listing)
        .optional()
        .map_err(ServerError::from)
}

pub fn listing_exists(conn: &Connection, id: ListingId) -> Result<bool, ServerError> {
    let found: Option<i64> = conn
        .query_row("SELECT 1 FROM listings WHERE id = ?1", params![id], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(found.is_some())
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ServerError> {
    value.ok_or_else(|| ServerError::Validation(FieldErrors::single(field, "This field is required.")))
}

/// Insert a validated listing. `location` mirrors the city.
pub fn insert_listing(
    conn: &Connection,
    changes: &ListingChanges,
    now: NaiveDateTime,
) -> Result<ListingId, ServerError> {
    let city = required(changes.city.as_deref(), "city")?;

    conn.execute(
        r#"
        INSERT INTO listings (
            title, description, location, address, city, state, zip_code,
            latitude, longitude, monthly_rent, bedrooms, bathrooms, square_feet,
            room_type, amenities, image_url, is_active, available_from,
            created_at, updated_at, owner_id
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7,
            ?8, ?9, ?10, ?11, ?12, ?13,
            ?14, ?15, ?16, 1, ?17,
            ?18, ?18, ?19
        )
        "#,
        params![
            required(changes.title.as_deref(), "title")?,
            required(changes.description.as_deref(), "description")?,
            city,
            changes.address.clone().flatten(),
            city,
            required(changes.state.as_deref(), "state")?,
            changes.zip_code.clone().flatten(),
            changes.latitude.flatten(),
            changes.longitude.flatten(),
            required(changes.monthly_rent, "price")?,
            required(changes.bedrooms.as_deref(), "bedrooms")?,
            required(changes.bathrooms.as_deref(), "bathrooms")?,
            changes.square_feet.flatten(),
            required(changes.room_type.as_deref(), "type")?,
            changes.amenities.as_deref().unwrap_or(""),
            changes.image_url.as_deref().unwrap_or(""),
            changes.available_from.flatten(),
            now,
            required(changes.owner_id, "owner_id")?,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

/// Apply the fields that were sent; everything else keeps its value.
/// Nullable columns sent as `null` are cleared.
/// Returns `false` when no such listing exists.
pub fn update_listing(
    conn: &Connection,
    id: ListingId,
    changes: &ListingChanges,
    now: NaiveDateTime,
) -> Result<bool, ServerError> {
    let updated = conn.execute(
        r#"
        UPDATE listings SET
            title          = COALESCE(?2, title),
            description    = COALESCE(?3, description),
            address        = CASE WHEN ?20 THEN ?4 ELSE address END,
            city           = COALESCE(?5, city),
            location       = COALESCE(?5, location),
            state          = COALESCE(?6, state),
            zip_code       = CASE WHEN ?21 THEN ?7 ELSE zip_code END,
            latitude       = CASE WHEN ?22 THEN ?8 ELSE latitude END,
            longitude      = CASE WHEN ?23 THEN ?9 ELSE longitude END,
            monthly_rent   = COALESCE(?10, monthly_rent),
            bedrooms       = COALESCE(?11, bedrooms),
            bathrooms      = COALESCE(?12, bathrooms),
            square_feet    = CASE WHEN ?24 THEN ?13 ELSE square_feet END,
            room_type      = COALESCE(?14, room_type),
            amenities      = COALESCE(?15, amenities),
            image_url      = COALESCE(?16, image_url),
            available_from = CASE WHEN ?25 THEN ?17 ELSE available_from END,
            owner_id       = COALESCE(?18, owner_id),
            updated_at     = ?19
        WHERE id = ?1
        "#,
        params![
            id,
            changes.title,
            changes.description,
            changes.address.clone().flatten(),
            changes.city,
            changes.state,
            changes.zip_code.clone().flatten(),
            changes.latitude.flatten(),
            changes.longitude.flatten(),
            changes.monthly_rent,
            changes.bedrooms,
            changes.bathrooms,
            changes.square_feet.flatten(),
            changes.room_type,
            changes.amenities,
            changes.image_url,
            changes.available_from.flatten(),
            changes.owner_id,
            now,
            changes.address.is_some(),
            changes.zip_code.is_some(),
            changes.latitude.is_some(),
            changes.longitude.is_some(),
            changes.square_feet.is_some(),
            changes.available_from.is_some(),
        ],
    )?;
    Ok(updated > 0)
}

/// Soft delete: the row stays, but drops out of the public listing feed.
pub fn soft_delete_listing(conn: &Connection, id: ListingId) -> Result<bool, ServerError> {
    let updated = conn.execute(
        "UPDATE listings SET is_active = 0 WHERE id = ?1",
        params![id],
    )?;
    Ok(updated > 0)
}

/// Serialize rows with their images, fetching all images in one query.
pub fn to_api_listings(
    conn: &Connection,
    rows: &[StoredListing],
) -> Result<Vec<ApiListing>, ServerError> {
    let ids: Vec<ListingId> = rows.iter().map(|r| r.id).collect();
    let mut images = images_for_listings(conn, &ids)?;
    Ok(rows
        .iter()
        .map(|row| row.to_api(images.remove(&row.id).unwrap_or_default()))
        .collect())
}
