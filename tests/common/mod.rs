#![allow(dead_code)]

use std::sync::Arc;

use rocket::http::{Header, Status};
use rocket::local::asynchronous::Client;
use serde_json::{json, Value};

use portfolio_api::build_rocket;
use portfolio_api::config::AppConfig;
use portfolio_api::models::admin::{AdminUser, AdminUserCreate};
use portfolio_api::repository::{MemoryStore, RecordStore, Repository};
use portfolio_api::services::admin_provisioning;
use portfolio_api::services::password::PasswordHasher;

pub const ADMIN_USERNAME: &str = "owner";
pub const ADMIN_EMAIL: &str = "owner@example.dev";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

pub struct TestApp {
    pub client: Client,
    pub store: Arc<dyn RecordStore>,
}

impl TestApp {
    pub fn admins(&self) -> Repository<AdminUser> {
        Repository::new(self.store.clone())
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        bcrypt_cost: 4,
        ..AppConfig::default()
    }
}

/// A fresh in-memory application with one active administrator.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_config()).await
}

pub async fn spawn_app_with(config: AppConfig) -> TestApp {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let users = Repository::<AdminUser>::new(store.clone());
    admin_provisioning::create_admin(
        &users,
        &PasswordHasher::new(4),
        AdminUserCreate {
            username: ADMIN_USERNAME.to_string(),
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        },
    )
    .await
    .expect("seed admin");

    let client = Client::tracked(build_rocket(config, store.clone()))
        .await
        .expect("valid rocket instance");
    TestApp { client, store }
}

pub fn bearer(token: &str) -> Header<'static> {
    Header::new("Authorization", format!("Bearer {token}"))
}

pub async fn login(client: &Client) -> String {
    let response = client
        .post("/api/auth/login")
        .json(&json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let body: Value = response.into_json().await.expect("token body");
    body["access_token"].as_str().expect("access_token").to_string()
}

pub async fn body(response: rocket::local::asynchronous::LocalResponse<'_>) -> Value {
    response.into_json().await.expect("json body")
}

/// Walks a JSON tree and reports whether any object carries an `_id` key.
pub fn contains_internal_id(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.contains_key("_id") || map.values().any(contains_internal_id),
        Value::Array(items) => items.iter().any(contains_internal_id),
        _ => false,
    }
}
