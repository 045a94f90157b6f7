// handlers/listings.rs
use crate::db::listings::{
    get_listing, insert_listing, list_active_listings, list_listings_by_owner, listing_exists,
    soft_delete_listing, to_api_listings, update_listing,
};
use crate::db::Database;
use crate::domain::filter::FilterState;
use crate::domain::listing::{ApiListing, InputMode, Listing, ListingId, ListingInput};
use crate::errors::ServerError;
use crate::responses::{empty_response, json_response, ResultResp};
use crate::router::{now, query_pairs};
use rusqlite::Connection;

/// `GET /api/listings/`, optionally narrowed by the explorer's filter parameters.
pub fn list(db: &Database, query: &str) -> ResultResp {
    let pairs = query_pairs(query);
    let filter = FilterState::from_query(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    let listings = db.with_conn(|conn| {
        let rows = list_active_listings(conn)?;
        to_api_listings(conn, &rows)
    })?;

    if filter.is_default() {
        return json_response(200, &listings);
    }

    let matching: Vec<ApiListing> = listings
        .into_iter()
        .filter(|api| filter.passes(&Listing::from_wire(api.clone())))
        .collect();
    json_response(200, &matching)
}

pub fn by_owner(db: &Database, owner_id: i64) -> ResultResp {
    let listings = db.with_conn(|conn| {
        let rows = list_listings_by_owner(conn, owner_id)?;
        to_api_listings(conn, &rows)
    })?;
    json_response(200, &listings)
}

fn load_one(conn: &Connection, id: ListingId) -> Result<ApiListing, ServerError> {
    let row = get_listing(conn, id)?.ok_or(ServerError::NotFound)?;
    to_api_listings(conn, std::slice::from_ref(&row))?
        .pop()
        .ok_or(ServerError::InternalError)
}

pub fn detail(db: &Database, id: ListingId) -> ResultResp {
    let listing = db.with_conn(|conn| load_one(conn, id))?;
    json_response(200, &listing)
}

pub fn create(db: &Database, input: ListingInput) -> ResultResp {
    let changes = input.validate(InputMode::Create)?;

    let created = db.with_conn(|conn| {
        let id = insert_listing(conn, &changes, now())?;
        load_one(conn, id)
    })?;

    tracing::info!(id = created.id, title = %created.title, "listing created");
    json_response(201, &created)
}

/// `PUT` (all required fields) or `PATCH` (only the fields sent).
pub fn update(db: &Database, id: ListingId, input: ListingInput, mode: InputMode) -> ResultResp {
    let updated = db.with_conn(|conn| {
        if !listing_exists(conn, id)? {
            return Err(ServerError::NotFound);
        }
        let changes = input.validate(mode)?;
        update_listing(conn, id, &changes, now())?;
        load_one(conn, id)
    })?;

    tracing::info!(id, ?mode, "listing updated");
    json_response(200, &updated)
}

/// Soft delete; the listing leaves the public feed but stays readable by id.
pub fn destroy(db: &Database, id: ListingId) -> ResultResp {
    let deleted = db.with_conn(|conn| soft_delete_listing(conn, id))?;
    if !deleted {
        return Err(ServerError::NotFound);
    }
    tracing::info!(id, "listing deactivated");
    empty_response()
}
