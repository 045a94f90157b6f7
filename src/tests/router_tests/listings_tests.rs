use crate::db::users::get_or_create_user;
use crate::db::Database;
use crate::errors::ServerError;
use crate::responses::error_response;
use crate::router::{handle, now};
use crate::tests::utils::{body_json, delete, expect_err, get, init_test_db, send_json};
use http::Method;
use serde_json::{json, Value};

fn make_owner(db: &Database, username: &str) -> i64 {
    db.with_conn(|conn| get_or_create_user(conn, username, &format!("{username}@example.com"), now()))
        .expect("Failed to create owner")
}

fn listing_body(owner_id: i64) -> Value {
    json!({
        "title": "Sunny 1BR near CSUN",
        "description": "Walk to campus",
        "address": "9500 Reseda Blvd",
        "city": "Northridge",
        "state": "CA",
        "zip_code": "91324",
        "lat": "34.2301",
        "lng": -118.536,
        "price": "1500",
        "bedrooms": 1,
        "bathrooms": "1",
        "sqft": 600,
        "type": "Apartment",
        "amenities": ["WiFi", "Parking"],
        "owner_id": owner_id
    })
}

fn create(db: &Database, body: &Value) -> Value {
    let resp = handle(send_json(Method::POST, "/api/listings/", body), db).expect("Create failed");
    assert_eq!(resp.status(), 201);
    body_json(resp)
}

#[test]
fn create_returns_full_listing_shape() {
    let db = init_test_db();
    let owner = make_owner(&db, "jdoe");

    let created = create(&db, &listing_body(owner));

    assert_eq!(created["price"], "1500.00");
    assert_eq!(created["lat"], "34.230100");
    assert_eq!(created["lng"], "-118.536000");
    assert_eq!(created["address"], "9500 Reseda Blvd, Northridge, CA, 91324");
    assert_eq!(created["bedrooms"], 1);
    assert_eq!(created["bathrooms"], 1.0);
    assert_eq!(created["type"], "Apartment");
    assert_eq!(created["amenities"], json!(["WiFi", "Parking"]));
    assert_eq!(created["owner"], json!({ "name": "J. Doe", "verified": true }));
    assert_eq!(created["available"], true);
    assert_eq!(created["images"], json!([]));
}

#[test]
fn create_reports_field_errors() {
    let db = init_test_db();

    let err = expect_err(handle(
        send_json(Method::POST, "/api/listings/", &json!({ "title": "", "price": "abc", "lat": 123 })),
        &db,
    ));
    assert!(matches!(err, ServerError::Validation(_)));

    let resp = error_response(err, "/api/listings/");
    assert_eq!(resp.status(), 400);
    let errors = body_json(resp);
    assert_eq!(errors["title"], json!(["This field may not be blank."]));
    assert_eq!(errors["price"], json!(["A valid number is required."]));
    assert_eq!(errors["lat"], json!(["Ensure this value is between -90 and 90."]));
    assert_eq!(errors["city"], json!(["This field is required."]));
}

#[test]
fn malformed_json_is_bad_request() {
    let db = init_test_db();
    let req = http::Request::builder()
        .method(Method::POST)
        .uri("/api/listings/")
        .body(astra::Body::from("{not json"))
        .unwrap();

    let err = expect_err(handle(req, &db));
    let resp = error_response(err, "/api/listings/");
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp)["error"], "Bad request");
}

#[test]
fn list_hides_inactive_and_unplaced_listings() {
    let db = init_test_db();
    let owner = make_owner(&db, "owner");

    let kept = create(&db, &listing_body(owner));
    let mut no_coords = listing_body(owner);
    no_coords["lat"] = Value::Null;
    no_coords["lng"] = Value::Null;
    let unplaced = create(&db, &no_coords);
    let removed = create(&db, &listing_body(owner));

    let resp = handle(delete(&format!("/api/listings/{}/", removed["id"])), &db).unwrap();
    assert_eq!(resp.status(), 204);

    let listed = body_json(handle(get("/api/listings/"), &db).unwrap());
    let ids: Vec<&Value> = listed.as_array().unwrap().iter().map(|l| &l["id"]).collect();
    assert_eq!(ids, vec![&kept["id"]]);

    // Detail still serves soft-deleted and unplaced rows.
    let detail = handle(get(&format!("/api/listings/{}", removed["id"])), &db).unwrap();
    assert_eq!(body_json(detail)["available"], false);
    let detail = handle(get(&format!("/api/listings/{}/", unplaced["id"])), &db).unwrap();
    assert_eq!(body_json(detail)["lat"], Value::Null);

    let owned = body_json(handle(get(&format!("/api/listings/user/{owner}/")), &db).unwrap());
    assert_eq!(owned.as_array().unwrap().len(), 3);
}

#[test]
fn list_applies_query_filters() {
    let db = init_test_db();
    let owner = make_owner(&db, "owner");

    create(&db, &listing_body(owner));
    let mut westwood = listing_body(owner);
    westwood["title"] = json!("Westwood studio");
    westwood["city"] = json!("Los Angeles");
    westwood["zip_code"] = json!("90024");
    westwood["price"] = json!(2100);
    westwood["type"] = json!("Studio");
    westwood["amenities"] = json!(["WiFi", "Pool", "Gym"]);
    create(&db, &westwood);

    let titles = |uri: &str| -> Vec<String> {
        body_json(handle(get(uri), &db).unwrap())
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["title"].as_str().unwrap().to_string())
            .collect()
    };

    assert_eq!(titles("/api/listings/").len(), 2);
    assert_eq!(titles("/api/listings/?q=91324"), vec!["Sunny 1BR near CSUN"]);
    assert_eq!(titles("/api/listings/?price_max=2000"), vec!["Sunny 1BR near CSUN"]);
    assert_eq!(titles("/api/listings/?type=Studio&type=House"), vec!["Westwood studio"]);
    assert_eq!(titles("/api/listings/?amenity=Pool&amenity=Gym"), vec!["Westwood studio"]);
    assert!(titles("/api/listings/?amenity=Pool&amenity=Parking").is_empty());
}

#[test]
fn patch_changes_only_sent_fields_and_put_requires_all() {
    let db = init_test_db();
    let owner = make_owner(&db, "owner");
    let created = create(&db, &listing_body(owner));
    let uri = format!("/api/listings/{}/", created["id"]);

    let resp = handle(send_json(Method::PATCH, &uri, &json!({ "price": 1425.5 })), &db).unwrap();
    assert_eq!(resp.status(), 200);
    let patched = body_json(resp);
    assert_eq!(patched["price"], "1425.50");
    assert_eq!(patched["title"], created["title"]);
    assert_eq!(patched["amenities"], created["amenities"]);

    let err = expect_err(handle(send_json(Method::PUT, &uri, &json!({ "title": "Only a title" })), &db));
    let resp = error_response(err, &uri);
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp)["price"], json!(["This field is required."]));

    let mut full = listing_body(owner);
    full["title"] = json!("Renamed");
    let resp = handle(send_json(Method::PUT, &uri, &full), &db).unwrap();
    assert_eq!(body_json(resp)["title"], "Renamed");
}

#[test]
fn missing_listing_is_not_found() {
    let db = init_test_db();

    for req in [
        get("/api/listings/999/"),
        delete("/api/listings/999/"),
        send_json(Method::PATCH, "/api/listings/999/", &json!({ "title": "x" })),
        get("/api/listings/not-a-number/"),
    ] {
        let err = expect_err(handle(req, &db));
        assert!(matches!(err, ServerError::NotFound));
    }
}

#[test]
fn owner_missing_from_users_shows_generic_owner() {
    let db = init_test_db();
    let created = create(&db, &listing_body(4242));
    assert_eq!(created["owner"], json!({ "name": "Property Owner", "verified": true }));
}

#[test]
fn feed_serves_collections_larger_than_one_statement_binds() {
    let db = init_test_db();
    let total: i64 = 33_000;
    db.with_conn(|conn| {
        conn.execute(
            "WITH RECURSIVE n(i) AS (SELECT 1 UNION ALL SELECT i + 1 FROM n WHERE i < ?1)
             INSERT INTO listings (
                 title, description, location, city, state, latitude, longitude,
                 monthly_rent, bedrooms, bathrooms, room_type, created_at, updated_at, owner_id
             )
             SELECT 'Room ' || i, 'Bulk', 'Northridge', 'Northridge', 'CA', 34.2, -118.5,
                    1000 + i, '1', '1', 'Apartment', ?2, ?2, 1
             FROM n",
            rusqlite::params![total, now()],
        )?;
        Ok(())
    })
    .expect("Bulk insert failed");

    let listed = body_json(handle(get("/api/listings/"), &db).expect("Feed failed"));
    assert_eq!(listed.as_array().map(Vec::len), Some(total as usize));
}

#[test]
fn patch_null_clears_nullable_fields() {
    let db = init_test_db();
    let owner = make_owner(&db, "owner");
    let created = create(&db, &listing_body(owner));
    let uri = format!("/api/listings/{}/", created["id"]);

    let resp = handle(
        send_json(Method::PATCH, &uri, &json!({ "zip_code": null, "sqft": null, "lat": null, "lng": null })),
        &db,
    )
    .unwrap();
    let patched = body_json(resp);
    assert_eq!(patched["sqft"], Value::Null);
    assert_eq!(patched["lat"], Value::Null);
    assert_eq!(patched["lng"], Value::Null);
    assert_eq!(patched["address"], "9500 Reseda Blvd, Northridge, CA");

    // Fields left out of the body keep their values.
    assert_eq!(patched["title"], created["title"]);
    assert_eq!(patched["price"], created["price"]);

    let listed = body_json(handle(get("/api/listings/"), &db).unwrap());
    assert_eq!(listed.as_array().map(Vec::len), Some(0));
}
