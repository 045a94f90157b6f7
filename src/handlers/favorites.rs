use crate::db::favorites::{delete_favorite, insert_favorite, is_favorited, list_favorites, Favorite};
use crate::db::listings::{get_listing, listing_exists, to_api_listings};
use crate::db::Database;
use crate::domain::listing::ApiListing;
use crate::errors::{FieldErrors, ServerError};
use crate::responses::{empty_response, json_response, ResultResp};
use crate::router::now;
use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct FavoriteInput {
    pub user_id: Option<i64>,
    pub apartment_id: Option<i64>,
}

/// A favorite with the full listing nested; `listing` is null once the row is gone.
#[derive(Debug, Serialize)]
pub struct FavoriteOut {
    pub id: i64,
    pub user_id: i64,
    pub apartment_id: i64,
    pub created_at: NaiveDateTime,
    pub listing: Option<ApiListing>,
}

fn with_listing(conn: &Connection, fav: Favorite) -> Result<FavoriteOut, ServerError> {
    let listing = match get_listing(conn, fav.apartment_id)? {
        Some(row) => to_api_listings(conn, std::slice::from_ref(&row))?.pop(),
        None => None,
    };
    Ok(FavoriteOut {
        id: fav.id,
        user_id: fav.user_id,
        apartment_id: fav.apartment_id,
        created_at: fav.created_at,
        listing,
    })
}

pub fn list(db: &Database, user_id: i64) -> ResultResp {
    let favorites = db.with_conn(|conn| {
        list_favorites(conn, user_id)?
            .into_iter()
            .map(|fav| with_listing(conn, fav))
            .collect::<Result<Vec<_>, _>>()
    })?;
    json_response(200, &favorites)
}

pub fn create(db: &Database, input: FavoriteInput) -> ResultResp {
    let mut errors = FieldErrors::new();
    if input.user_id.is_none() {
        errors.add("user_id", "This field is required.");
    }
    if input.apartment_id.is_none() {
        errors.add("apartment_id", "This field is required.");
    }
    errors.into_result()?;
    let (Some(user_id), Some(apartment_id)) = (input.user_id, input.apartment_id) else {
        return Err(ServerError::InternalError);
    };

    let created = db.with_conn(|conn| {
        if !listing_exists(conn, apartment_id)? {
            return Err(FieldErrors::single("non_field_errors", "Listing does not exist").into());
        }
        if is_favorited(conn, user_id, apartment_id)? {
            return Err(FieldErrors::single("non_field_errors", "Already in favorites").into());
        }
        let fav = insert_favorite(conn, user_id, apartment_id, now())?;
        with_listing(conn, fav)
    })?;

    tracing::info!(user_id, apartment_id, "favorite added");
    json_response(201, &created)
}

pub fn destroy(db: &Database, id: i64) -> ResultResp {
    if !db.with_conn(|conn| delete_favorite(conn, id))? {
        return Err(ServerError::NotFound);
    }
    empty_response()
}

pub fn check(db: &Database, user_id: i64, listing_id: i64) -> ResultResp {
    let favorited = db.with_conn(|conn| is_favorited(conn, user_id, listing_id))?;
    json_response(200, &json!({ "is_favorited": favorited }))
}
