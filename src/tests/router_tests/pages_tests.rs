use crate::db::seed::seed_all;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_json, body_string, expect_err, get, init_test_db};
use http::Method;

#[test]
fn universities_are_camel_cased_with_string_coordinates() {
    let db = init_test_db();
    seed_all(&db).unwrap();

    let unis = body_json(handle(get("/api/universities"), &db).unwrap());
    let unis = unis.as_array().unwrap();
    assert_eq!(unis.len(), 43);
    assert_eq!(unis[0]["name"], "CSU Bakersfield");
    assert!(unis[0]["fullName"].is_string());
    assert!(unis[0]["lat"].as_str().unwrap().contains('.'));
}

#[test]
fn health_checks_database() {
    let db = init_test_db();
    let health = body_json(handle(get("/api/health/"), &db).unwrap());
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["database"], "connected");
}

#[test]
fn explorer_page_renders_sorted_cards() {
    let db = init_test_db();
    seed_all(&db).unwrap();

    let resp = handle(get("/"), &db).unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("10 listings"));
    assert!(body.contains("Campus Rentals"));

    // Cheapest seeded listing comes first.
    let prices: Vec<usize> = ["$950/mo", "$1,600/mo"]
        .iter()
        .filter_map(|p| body.find(p))
        .collect();
    assert_eq!(prices.len(), 2);
    assert!(prices[0] < prices[1]);
}

#[test]
fn explorer_page_applies_query_filters_and_target() {
    let db = init_test_db();
    seed_all(&db).unwrap();

    let body = body_string(handle(get("/?q=91324&university=CSUN"), &db).unwrap());
    assert!(body.contains("1 listing"));
    assert!(body.contains("2BR Near CSUN"));
    assert!(body.contains(" mi from campus"));
    assert!(body.contains("selected>CSUN</option>"));

    // A viewport with nothing in it shows the placeholder.
    let body = body_string(handle(get("/?bounds=10,10,11,11"), &db).unwrap());
    assert!(body.contains("0 listings"));
    assert!(body.contains("No listings match"));
}

#[test]
fn unknown_routes_are_not_found() {
    let db = init_test_db();
    for uri in ["/nope", "/api/listings/1/extra/", "/api/favorites/check/1/"] {
        assert!(matches!(expect_err(handle(get(uri), &db)), ServerError::NotFound), "{uri}");
    }

    let req = http::Request::builder()
        .method(Method::PUT)
        .uri("/api/universities/")
        .body(astra::Body::empty())
        .unwrap();
    assert!(matches!(expect_err(handle(req, &db)), ServerError::NotFound));
}

#[test]
fn html_errors_for_pages_json_for_api() {
    let page = crate::responses::error_response(ServerError::NotFound, "/missing");
    assert_eq!(page.status(), 404);
    assert!(body_string(page).contains("Error 404"));

    let api = crate::responses::error_response(ServerError::DbError("locked".into()), "/api/listings/");
    assert_eq!(api.status(), 500);
    assert_eq!(body_json(api)["error"], "Internal server error");
}
