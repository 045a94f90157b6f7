use crate::db::Database;
use crate::domain::listing::InputMode;
use crate::errors::ServerError;
use crate::handlers::{explorer, favorites, images, listings, universities};
use crate::responses::{css_response, empty_response, json_response, ResultResp};
use astra::Request;
use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::io::Read;

const MAIN_CSS: &str = include_str!("../static/main.css");

/// Request bodies above this size are rejected.
const MAX_BODY_BYTES: u64 = 1024 * 1024;

pub fn handle(mut req: Request, db: &Database) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let query = req.uri().query().unwrap_or("").to_string();

    // Trailing slashes are optional: "/api/listings" and "/api/listings/" match alike.
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    tracing::debug!(%method, %path, "request");

    match (method.as_str(), segments.as_slice()) {
        ("GET", []) => explorer::page(db, &query),
        ("GET", ["static", "main.css"]) => css_response(MAIN_CSS),

        ("GET", ["api", "health"]) => health(db),

        ("GET", ["api", "listings"]) => listings::list(db, &query),
        ("POST", ["api", "listings"]) => listings::create(db, read_json(&mut req)?),
        ("GET", ["api", "listings", "user", owner_id]) => {
            listings::by_owner(db, parse_id(owner_id)?)
        }
        ("GET", ["api", "listings", id]) => listings::detail(db, parse_id(id)?),
        ("PUT", ["api", "listings", id]) => {
            listings::update(db, parse_id(id)?, read_json(&mut req)?, InputMode::Replace)
        }
        ("PATCH", ["api", "listings", id]) => {
            listings::update(db, parse_id(id)?, read_json(&mut req)?, InputMode::Patch)
        }
        ("DELETE", ["api", "listings", id]) => listings::destroy(db, parse_id(id)?),

        ("GET", ["api", "universities"]) => universities::list(db),

        ("POST", ["api", "favorites"]) => favorites::create(db, read_json(&mut req)?),
        ("GET", ["api", "favorites", "check", user_id, listing_id]) => {
            favorites::check(db, parse_id(user_id)?, parse_id(listing_id)?)
        }
        ("DELETE", ["api", "favorites", "delete", id]) => favorites::destroy(db, parse_id(id)?),
        ("GET", ["api", "favorites", user_id]) => favorites::list(db, parse_id(user_id)?),

        ("POST", ["api", "images"]) => images::create(db, read_json(&mut req)?),
        ("DELETE", ["api", "images", "delete", id]) => images::destroy(db, parse_id(id)?),
        ("GET", ["api", "images", listing_id]) => images::list(db, parse_id(listing_id)?),

        // CORS preflight
        ("OPTIONS", ["api", ..]) => empty_response(),

        _ => Err(ServerError::NotFound),
    }
}

fn health(db: &Database) -> ResultResp {
    let database = if db.ping() { "connected" } else { "error" };
    json_response(200, &json!({ "status": "healthy", "database": database }))
}

/// Path ids are positive integers; anything else does not match a route.
fn parse_id(raw: &str) -> Result<i64, ServerError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(ServerError::NotFound)
}

/// Decoded `key=value` pairs, in order, keeping repeated keys.
pub fn query_pairs(query: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

fn read_json<T: DeserializeOwned>(req: &mut Request) -> Result<T, ServerError> {
    let mut body = Vec::new();
    req.body_mut()
        .reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_end(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("Could not read request body: {e}")))?;

    if body.len() as u64 > MAX_BODY_BYTES {
        return Err(ServerError::BadRequest("Request body too large".into()));
    }

    serde_json::from_slice(&body).map_err(|e| ServerError::BadRequest(format!("JSON parse error - {e}")))
}

pub fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}
