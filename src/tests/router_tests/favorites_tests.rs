use crate::db::seed::seed_all;
use crate::router::handle;
use crate::tests::utils::{body_json, delete, expect_err, get, init_test_db, send_json};
use http::Method;
use serde_json::json;

#[test]
fn favorite_lifecycle() {
    let db = init_test_db();
    seed_all(&db).unwrap();

    let listings = body_json(handle(get("/api/listings/"), &db).unwrap());
    let listing_id = listings[0]["id"].as_i64().unwrap();

    let check = |db: &crate::db::Database| {
        body_json(handle(get(&format!("/api/favorites/check/7/{listing_id}/")), db).unwrap())
    };
    assert_eq!(check(&db), json!({ "is_favorited": false }));

    let resp = handle(
        send_json(Method::POST, "/api/favorites/", &json!({ "user_id": 7, "apartment_id": listing_id })),
        &db,
    )
    .unwrap();
    assert_eq!(resp.status(), 201);
    let favorite = body_json(resp);
    assert_eq!(favorite["listing"]["id"], listing_id);
    assert_eq!(check(&db), json!({ "is_favorited": true }));

    let saved = body_json(handle(get("/api/favorites/7/"), &db).unwrap());
    assert_eq!(saved.as_array().unwrap().len(), 1);
    assert_eq!(saved[0]["apartment_id"], listing_id);
    assert!(saved[0]["created_at"].is_string());

    let resp = handle(delete(&format!("/api/favorites/delete/{}/", favorite["id"])), &db).unwrap();
    assert_eq!(resp.status(), 204);
    assert_eq!(check(&db), json!({ "is_favorited": false }));

    let err = expect_err(handle(delete(&format!("/api/favorites/delete/{}/", favorite["id"])), &db));
    assert!(matches!(err, crate::errors::ServerError::NotFound));
}

#[test]
fn favorite_validation_messages() {
    let db = init_test_db();
    seed_all(&db).unwrap();
    let listing_id = body_json(handle(get("/api/listings/"), &db).unwrap())[0]["id"].clone();

    let post = |body: serde_json::Value| {
        let err = expect_err(handle(send_json(Method::POST, "/api/favorites/", &body), &db));
        body_json(crate::responses::error_response(err, "/api/favorites/"))
    };

    assert_eq!(
        post(json!({ "user_id": 1, "apartment_id": 99999 })),
        json!({ "non_field_errors": ["Listing does not exist"] })
    );

    handle(
        send_json(Method::POST, "/api/favorites/", &json!({ "user_id": 1, "apartment_id": listing_id })),
        &db,
    )
    .unwrap();
    assert_eq!(
        post(json!({ "user_id": 1, "apartment_id": listing_id })),
        json!({ "non_field_errors": ["Already in favorites"] })
    );

    assert_eq!(
        post(json!({})),
        json!({
            "apartment_id": ["This field is required."],
            "user_id": ["This field is required."]
        })
    );
}

#[test]
fn favorites_of_deactivated_listing_keep_nested_listing() {
    let db = init_test_db();
    seed_all(&db).unwrap();
    let listing_id = body_json(handle(get("/api/listings/"), &db).unwrap())[0]["id"].clone();

    handle(
        send_json(Method::POST, "/api/favorites/", &json!({ "user_id": 3, "apartment_id": listing_id })),
        &db,
    )
    .unwrap();
    handle(delete(&format!("/api/listings/{listing_id}/")), &db).unwrap();

    let saved = body_json(handle(get("/api/favorites/3/"), &db).unwrap());
    assert_eq!(saved[0]["listing"]["available"], false);
}
