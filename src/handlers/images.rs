use crate::db::images::{delete_image, insert_image, list_images};
use crate::db::listings::listing_exists;
use crate::db::Database;
use crate::errors::{FieldErrors, ServerError};
use crate::responses::{empty_response, json_response, ResultResp};
use crate::router::now;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ImageInput {
    pub listing_id: Option<i64>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

/// Register an already-hosted image URL for a listing.
pub fn create(db: &Database, input: ImageInput) -> ResultResp {
    let mut errors = FieldErrors::new();
    let url = input
        .image_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());
    if url.is_none() {
        errors.add("image_url", "This field is required.");
    } else if url.map_or(false, |u| url::Url::parse(u).is_err()) {
        errors.add("image_url", "Enter a valid URL.");
    }
    if input.listing_id.is_none() {
        errors.add("listing_id", "This field is required.");
    }
    errors.into_result()?;
    let (Some(listing_id), Some(url)) = (input.listing_id, url) else {
        return Err(ServerError::InternalError);
    };
    let label = input.label.as_deref().filter(|l| !l.trim().is_empty());

    let image = db.with_conn(|conn| {
        if !listing_exists(conn, listing_id)? {
            return Err(ServerError::NotFound);
        }
        insert_image(conn, listing_id, url, label, now())
    })?;

    tracing::info!(listing_id, image_id = image.id, "image registered");
    json_response(201, &image)
}

pub fn list(db: &Database, listing_id: i64) -> ResultResp {
    let images = db.with_conn(|conn| list_images(conn, listing_id))?;
    json_response(200, &images)
}

pub fn destroy(db: &Database, id: i64) -> ResultResp {
    if !db.with_conn(|conn| delete_image(conn, id))? {
        return Err(ServerError::NotFound);
    }
    empty_response()
}
