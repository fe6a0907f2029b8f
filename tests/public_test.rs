mod common;

use rocket::http::Status;
use serde_json::{json, Value};

use common::{bearer, body, contains_internal_id, login, spawn_app, spawn_app_with, test_config};
use portfolio_api::config::AppConfig;

#[rocket::async_test]
async fn index_names_the_api() {
    let app = spawn_app().await;
    let response = app.client.get("/api").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(
        response.headers().get_one("Access-Control-Allow-Origin"),
        Some("*")
    );
    let index = body(response).await;
    assert_eq!(index["message"], "Portfolio API");
    assert_eq!(index["version"], env!("CARGO_PKG_VERSION"));
}

#[rocket::async_test]
async fn preflight_requests_are_answered() {
    let app = spawn_app().await;
    let response = app.client.options("/api/admin/projects").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert!(response
        .headers()
        .get_one("Access-Control-Allow-Headers")
        .is_some_and(|allowed| allowed.contains("Authorization")));
}

#[rocket::async_test]
async fn configured_origin_is_advertised() {
    let app = spawn_app_with(AppConfig {
        cors_allowed_origin: "https://portfolio.example.dev".to_string(),
        ..test_config()
    })
    .await;

    let response = app.client.options("/api/public/projects").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let headers = response.headers();
    assert_eq!(
        headers.get_one("Access-Control-Allow-Origin"),
        Some("https://portfolio.example.dev")
    );
    assert_eq!(headers.get_one("Vary"), Some("Origin"));
    assert!(headers
        .get_one("Access-Control-Allow-Methods")
        .is_some_and(|methods| methods.contains("PUT")));
}

#[rocket::async_test]
async fn empty_portfolio_serves_empty_collections() {
    let app = spawn_app().await;

    let personal = body(app.client.get("/api/public/personal").dispatch().await).await;
    assert_eq!(personal, json!({}));

    for path in [
        "/api/public/skills",
        "/api/public/technologies",
        "/api/public/projects",
        "/api/public/services",
        "/api/public/testimonials",
        "/api/public/statistics",
        "/api/public/social-links",
        "/api/public/process-steps",
        "/api/public/blog",
        "/api/resources",
    ] {
        let response = app.client.get(path).dispatch().await;
        assert_eq!(response.status(), Status::Ok, "{path}");
        assert_eq!(body(response).await, json!([]), "{path}");
    }
}

#[rocket::async_test]
async fn unknown_paths_get_a_json_404() {
    let app = spawn_app().await;
    let response = app.client.get("/api/public/nothing-here").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    assert_eq!(body(response).await["detail"], "Not Found");
}

#[rocket::async_test]
async fn public_output_never_leaks_storage_ids() {
    let app = spawn_app().await;
    let token = login(&app.client).await;

    let seeds: [(&str, Value); 4] = [
        (
            "/api/admin/technologies",
            json!({ "name": "Rust", "category": "Language", "icon": "rust" }),
        ),
        (
            "/api/admin/statistics",
            json!({ "label": "Audits", "value": "40+", "icon": "shield", "order_index": 1 }),
        ),
        (
            "/api/admin/social-links",
            json!({ "name": "GitHub", "url": "https://github.com/example", "icon": "github", "order_index": 1 }),
        ),
        (
            "/api/admin/process-steps",
            json!({ "step": 1, "title": "Discovery", "description": "Scope the engagement", "icon": "search" }),
        ),
    ];
    for (path, payload) in seeds {
        let response = app
            .client
            .post(path)
            .header(bearer(&token))
            .json(&payload)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Created, "{path}");
    }
    app.client
        .post("/api/admin/resources/init")
        .header(bearer(&token))
        .dispatch()
        .await;

    for path in [
        "/api/public/technologies",
        "/api/public/statistics",
        "/api/public/social-links",
        "/api/public/process-steps",
        "/api/resources",
    ] {
        let listed = body(app.client.get(path).dispatch().await).await;
        assert_eq!(listed.as_array().unwrap().len(), if path == "/api/resources" { 5 } else { 1 });
        assert!(!contains_internal_id(&listed), "{path} exposed _id");
    }
}

#[rocket::async_test]
async fn newsletter_signup_is_idempotent() {
    let app = spawn_app().await;

    let response = app
        .client
        .post("/api/newsletter/subscribe")
        .json(&json!({ "email": "Reader@Example.dev" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(body(response).await["status"], "new");

    let response = app
        .client
        .post("/api/newsletter/subscribe")
        .json(&json!({ "email": "reader@example.dev" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let again = body(response).await;
    assert_eq!(again["status"], "existing");
    assert_eq!(again["message"], "Email already subscribed");

    let response = app
        .client
        .post("/api/newsletter/subscribe")
        .json(&json!({ "email": "nope" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    let token = login(&app.client).await;
    let subscribers = body(
        app.client
            .get("/api/admin/newsletter")
            .header(bearer(&token))
            .dispatch()
            .await,
    )
    .await;
    let subscribers = subscribers.as_array().unwrap();
    assert_eq!(subscribers.len(), 1);
    assert_eq!(subscribers[0]["email"], "reader@example.dev");
    assert_eq!(subscribers[0]["status"], "active");
}

#[rocket::async_test]
async fn resource_catalog_is_seeded_once() {
    let app = spawn_app().await;
    let token = login(&app.client).await;

    let response = app.client.post("/api/admin/resources/init").dispatch().await;
    assert_eq!(response.status(), Status::Unauthorized);

    let first = body(
        app.client
            .post("/api/admin/resources/init")
            .header(bearer(&token))
            .dispatch()
            .await,
    )
    .await;
    assert_eq!(first["message"], "Default resources initialized successfully");
    assert_eq!(first["count"], 5);
    assert_eq!(first["resource_ids"].as_array().unwrap().len(), 5);

    let second = body(
        app.client
            .post("/api/admin/resources/init")
            .header(bearer(&token))
            .dispatch()
            .await,
    )
    .await;
    assert_eq!(second["message"], "Resources already initialized");
    assert_eq!(second["count"], 5);
    assert!(second.get("resource_ids").is_none());
}

#[rocket::async_test]
async fn downloads_are_recorded_and_counted() {
    let app = spawn_app().await;
    let token = login(&app.client).await;

    let seeded = body(
        app.client
            .post("/api/admin/resources/init")
            .header(bearer(&token))
            .dispatch()
            .await,
    )
    .await;
    let id = seeded["resource_ids"][0].as_str().unwrap().to_string();

    let before = body(app.client.get(format!("/api/resources/{id}")).dispatch().await).await;
    let count = before["downloads"].as_i64().unwrap();
    assert!(before["type"].is_string());

    let response = app
        .client
        .post(format!("/api/resources/{id}/download?user_email=reader@example.dev"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let receipt = body(response).await;
    assert_eq!(receipt["message"], "Download recorded");
    assert_eq!(receipt["resource"]["downloads"], count + 1);

    let response = app.client.post(format!("/api/resources/{id}/download")).dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let after = body(app.client.get(format!("/api/resources/{id}")).dispatch().await).await;
    assert_eq!(after["downloads"], count + 2);
}

#[rocket::async_test]
async fn downloading_an_unknown_resource_is_not_found() {
    let app = spawn_app().await;
    let response = app.client.post("/api/resources/missing/download").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    assert_eq!(body(response).await["detail"], "Resource not found");
}
