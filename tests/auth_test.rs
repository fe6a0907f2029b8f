mod common;

use chrono::Duration;
use mongodb::bson::doc;
use rocket::http::Status;
use serde_json::json;

use common::{bearer, body, login, spawn_app, test_config, ADMIN_EMAIL, ADMIN_PASSWORD, ADMIN_USERNAME};
use portfolio_api::jwt::TokenService;

#[rocket::async_test]
async fn login_returns_a_bearer_token_accepted_by_me() {
    let app = spawn_app().await;
    let token = login(&app.client).await;

    let response = app.client.get("/api/auth/me").header(bearer(&token)).dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let profile = body(response).await;
    assert_eq!(profile["username"], ADMIN_USERNAME);
    assert_eq!(profile["email"], ADMIN_EMAIL);
    assert_eq!(profile["is_active"], true);
    assert!(profile.get("hashed_password").is_none());
    assert!(profile["last_login"].is_string());
}

#[rocket::async_test]
async fn login_accepts_a_json_body_without_a_content_type() {
    let app = spawn_app().await;
    let response = app
        .client
        .post("/api/auth/login")
        .body(json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let token = body(response).await;
    assert_eq!(token["token_type"], "bearer");
    assert!(token["access_token"].is_string());
}

#[rocket::async_test]
async fn wrong_password_and_unknown_user_get_the_same_answer() {
    let app = spawn_app().await;

    for (username, password) in [(ADMIN_USERNAME, "not-the-password"), ("ghost", ADMIN_PASSWORD)] {
        let response = app
            .client
            .post("/api/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);
        assert_eq!(body(response).await["detail"], "Incorrect username or password");
    }
}

#[rocket::async_test]
async fn missing_header_is_not_authenticated() {
    let app = spawn_app().await;
    let response = app.client.get("/api/auth/me").dispatch().await;

    assert_eq!(response.status(), Status::Unauthorized);
    assert_eq!(response.headers().get_one("WWW-Authenticate"), Some("Bearer"));
    assert_eq!(body(response).await["detail"], "Not authenticated");
}

#[rocket::async_test]
async fn bad_tokens_cannot_be_validated() {
    let app = spawn_app().await;
    let config = test_config();
    let tokens = TokenService::new(&config.secret_key, Duration::minutes(30));
    let forged = TokenService::new("some-other-secret", Duration::minutes(30));

    let candidates = [
        "garbage".to_string(),
        tokens.issue_token(ADMIN_USERNAME, Duration::seconds(-10)).unwrap(),
        tokens.issue_token("nobody", Duration::minutes(5)).unwrap(),
        forged.issue_token(ADMIN_USERNAME, Duration::minutes(5)).unwrap(),
    ];

    for token in candidates {
        let response = app.client.get("/api/auth/me").header(bearer(&token)).dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized, "token {token}");
        assert_eq!(response.headers().get_one("WWW-Authenticate"), Some("Bearer"));
        assert_eq!(body(response).await["detail"], "Could not validate credentials");
    }
}

#[rocket::async_test]
async fn deactivated_admin_is_turned_away() {
    let app = spawn_app().await;
    let token = login(&app.client).await;

    let admins = app.admins();
    let admin = admins.lookup(ADMIN_USERNAME).await.unwrap().unwrap();
    admins
        .set_fields(&admin.id, doc! { "is_active": false })
        .await
        .unwrap();

    let response = app.client.get("/api/auth/me").header(bearer(&token)).dispatch().await;
    assert_eq!(response.status(), Status::Unauthorized);
    assert_eq!(body(response).await["detail"], "Inactive user");

    let response = app
        .client
        .post("/api/auth/login")
        .json(&json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);
    assert_eq!(body(response).await["detail"], "Inactive user");
}

#[rocket::async_test]
async fn change_password_checks_the_current_one() {
    let app = spawn_app().await;
    let token = login(&app.client).await;

    let response = app
        .client
        .post("/api/auth/change-password")
        .header(bearer(&token))
        .json(&json!({ "current_password": "wrong-guess", "new_password": "brand-new-secret" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(body(response).await["detail"], "Current password is incorrect");

    let response = app
        .client
        .post("/api/auth/change-password")
        .header(bearer(&token))
        .json(&json!({ "current_password": ADMIN_PASSWORD, "new_password": "brand-new-secret" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(body(response).await["message"], "Password changed successfully");

    let response = app
        .client
        .post("/api/auth/login")
        .json(&json!({ "username": ADMIN_USERNAME, "password": "brand-new-secret" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
}

#[rocket::async_test]
async fn short_new_password_is_rejected() {
    let app = spawn_app().await;
    let token = login(&app.client).await;

    let response = app
        .client
        .post("/api/auth/change-password")
        .header(bearer(&token))
        .json(&json!({ "current_password": ADMIN_PASSWORD, "new_password": "short" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[rocket::async_test]
async fn create_admin_requires_auth_and_unique_names() {
    let app = spawn_app().await;
    let new_admin = json!({
        "username": "editor",
        "email": "editor@example.dev",
        "password": "editor-password",
    });

    let response = app.client.post("/api/auth/create-admin").json(&new_admin).dispatch().await;
    assert_eq!(response.status(), Status::Unauthorized);

    let token = login(&app.client).await;
    let response = app
        .client
        .post("/api/auth/create-admin")
        .header(bearer(&token))
        .json(&new_admin)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    let profile = body(response).await;
    assert_eq!(profile["username"], "editor");
    assert!(profile.get("hashed_password").is_none());

    let response = app
        .client
        .post("/api/auth/create-admin")
        .header(bearer(&token))
        .json(&new_admin)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(body(response).await["detail"], "Username already exists");

    let response = app
        .client
        .post("/api/auth/create-admin")
        .header(bearer(&token))
        .json(&json!({
            "username": "someone-else",
            "email": "editor@example.dev",
            "password": "editor-password",
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(body(response).await["detail"], "Email already exists");
}
