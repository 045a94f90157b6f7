use crate::db::seed::seed_all;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_json, delete, expect_err, get, init_test_db, send_json};
use http::Method;
use serde_json::json;

#[test]
fn images_are_ordered_and_nested_in_listing() {
    let db = init_test_db();
    seed_all(&db).unwrap();
    let listing_id = body_json(handle(get("/api/listings/"), &db).unwrap())[0]["id"]
        .as_i64()
        .unwrap();

    for (url, label) in [
        ("https://img.example.com/front.jpg", json!("Front")),
        ("https://img.example.com/kitchen.jpg", json!(null)),
    ] {
        let resp = handle(
            send_json(
                Method::POST,
                "/api/images/",
                &json!({ "listing_id": listing_id, "image_url": url, "label": label }),
            ),
            &db,
        )
        .unwrap();
        assert_eq!(resp.status(), 201);
    }

    let images = body_json(handle(get(&format!("/api/images/{listing_id}/")), &db).unwrap());
    assert_eq!(images[0]["order"], 0);
    assert_eq!(images[0]["label"], "Front");
    assert_eq!(images[1]["order"], 1);
    assert_eq!(images[1]["label"], json!(null));

    let listing = body_json(handle(get(&format!("/api/listings/{listing_id}/")), &db).unwrap());
    assert_eq!(listing["images"].as_array().unwrap().len(), 2);

    let first_id = images[0]["id"].as_i64().unwrap();
    let resp = handle(delete(&format!("/api/images/delete/{first_id}/")), &db).unwrap();
    assert_eq!(resp.status(), 204);
    let err = expect_err(handle(delete(&format!("/api/images/delete/{first_id}/")), &db));
    assert!(matches!(err, ServerError::NotFound));
}

#[test]
fn image_for_missing_listing_is_not_found() {
    let db = init_test_db();
    let err = expect_err(handle(
        send_json(
            Method::POST,
            "/api/images/",
            &json!({ "listing_id": 404, "image_url": "https://img.example.com/a.jpg" }),
        ),
        &db,
    ));
    assert!(matches!(err, ServerError::NotFound));
}

#[test]
fn image_url_is_validated() {
    let db = init_test_db();
    let err = expect_err(handle(
        send_json(Method::POST, "/api/images/", &json!({ "listing_id": 1, "image_url": "not a url" })),
        &db,
    ));
    match err {
        ServerError::Validation(fields) => {
            assert_eq!(fields.get("image_url"), Some(&["Enter a valid URL.".to_string()][..]));
        }
        other => panic!("unexpected error {other:?}"),
    }
}
