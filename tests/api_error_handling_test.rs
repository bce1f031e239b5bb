use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use recipe_catalog::api;
use recipe_catalog::db;
use recipe_catalog::infrastructure::AppState;
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot`

// Helper to create a test router on an in-memory database
async fn setup_app() -> Router {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    api::api_router(AppState::new(db))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().uri(uri).method(method);
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn import(app: &Router, text: &str) -> Value {
    let req = Request::builder()
        .uri("/categories/import")
        .method("POST")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(text.to_string()))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = setup_app().await;
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_get_category_not_found() {
    let app = setup_app().await;

    let (status, body) = send(&app, "GET", "/categories/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "DELETE", "/categories/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_category_rejects_bad_code() {
    let app = setup_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/categories",
        Some(json!({ "dewey_code": "6.4.1", "name": "Too many dots" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("6.4.1"));
}

#[tokio::test]
async fn test_create_category_derives_level() {
    let app = setup_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/categories",
        Some(json!({ "dewey_code": " 641.5 ", "name": "Bread", "parent_code": "641" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["dewey_code"], "641.5");
    assert_eq!(body["level"], 4);
    assert_eq!(body["parent_code"], "641");
    assert_eq!(body["is_active"], true);

    let (status, _) = send(
        &app,
        "POST",
        "/categories",
        Some(json!({ "dewey_code": "641.5", "name": "Bread again" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_category_with_children_conflicts() {
    let app = setup_app().await;

    let (_, parent) = send(
        &app,
        "POST",
        "/categories",
        Some(json!({ "dewey_code": "00", "name": "Basics" })),
    )
    .await;
    let (_, child) = send(
        &app,
        "POST",
        "/categories",
        Some(json!({ "dewey_code": "000", "name": "Stocks", "parent_code": "00" })),
    )
    .await;

    let parent_uri = format!("/categories/{}", parent["id"]);
    let child_uri = format!("/categories/{}", child["id"]);

    let (status, _) = send(&app, "DELETE", &parent_uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "DELETE", &child_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", &parent_uri, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_import_and_tree() {
    let app = setup_app().await;

    let summary = import(&app, "6 Cooking, 64 Techniques\n641 Baking, Not a field\n").await;
    assert_eq!(summary["imported_count"], 3);
    assert_eq!(summary["error_count"], 1);

    let again = import(&app, "6 Cooking, 64 Techniques\n641 Baking\n").await;
    assert_eq!(again["imported_count"], 0);
    assert_eq!(again["error_count"], 0);

    let (status, tree) = send(&app, "GET", "/categories/tree", None).await;
    assert_eq!(status, StatusCode::OK);
    let roots = tree.as_array().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0]["dewey_code"], "6");
    assert_eq!(roots[0]["children"][0]["dewey_code"], "64");
    assert_eq!(roots[0]["children"][0]["children"][0]["dewey_code"], "641");
}

#[tokio::test]
async fn test_classify_recipe_over_http() {
    let app = setup_app().await;
    import(&app, "6 Cooking, 64 Techniques, 641 Baking, 641.5 Bread\n").await;

    let (status, recipe) = send(
        &app,
        "POST",
        "/recipes",
        Some(json!({ "name": "Baguette", "rating": 5, "tags": ["french"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/recipes/{}/classification", recipe["id"]);

    let (status, classified) = send(&app, "PUT", &uri, Some(json!({ "code": "641.5" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(classified["classification_code"], "641.5.001");
    assert_eq!(
        classified["tags"],
        json!(["french", "6 Cooking", "64 Techniques", "641 Baking", "641.5 Bread"])
    );

    let (status, next) = send(&app, "GET", "/classification/next?base=641.5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(next["code"], "641.5.002");

    let (status, cleared) = send(&app, "PUT", &uri, Some(json!({ "code": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["classification_code"], Value::Null);
    assert_eq!(cleared["tags"], json!(["french"]));
}

#[tokio::test]
async fn test_classification_errors() {
    let app = setup_app().await;

    let (status, _) = send(&app, "GET", "/classification/next?base=64..1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "PUT",
        "/recipes/42/classification",
        Some(json!({ "code": "641" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/recipes",
        Some(json!({ "name": "Bad rating", "rating": 11 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
