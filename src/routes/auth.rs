use chrono::Utc;
use mongodb::bson::doc;
use rocket::response::status::Created;
use rocket::serde::json::Json;
use rocket::{Route, State};

use crate::errors::{ApiError, ApiResult};
use crate::jwt::TokenService;
use crate::models::admin::{AdminLogin, AdminProfile, AdminUser, AdminUserCreate, PasswordChange, TokenResponse};
use crate::models::{timestamp, Validate};
use crate::repository::{Record, Repository};
use crate::routes::Message;
use crate::services::admin_provisioning;
use crate::services::auth_guard::AdminGuard;
use crate::services::password::PasswordHasher;

fn bad_credentials() -> ApiError {
    ApiError::Unauthorized("Incorrect username or password".to_string())
}

#[post("/login", data = "<credentials>")]
pub async fn login(
    credentials: Json<AdminLogin>,
    users: &State<Repository<AdminUser>>,
    hasher: &State<PasswordHasher>,
    tokens: &State<TokenService>,
) -> ApiResult<Json<TokenResponse>> {
    let admin = users
        .lookup(&credentials.username)
        .await?
        .ok_or_else(bad_credentials)?;

    if !hasher.verify(&credentials.password, &admin.hashed_password).await {
        tracing::info!(username = %credentials.username, "login rejected");
        return Err(bad_credentials());
    }
    if !admin.is_active {
        return Err(ApiError::Unauthorized("Inactive user".to_string()));
    }

    users
        .set_fields(&admin.id, doc! { "last_login": timestamp::to_bson(&Utc::now()) })
        .await?;

    let token = tokens.issue_token(&admin.username, tokens.default_ttl())?;
    tracing::info!(username = %admin.username, "admin logged in");
    Ok(Json(TokenResponse::bearer(token)))
}

#[get("/me")]
pub fn me(admin: AdminGuard) -> Json<AdminProfile> {
    Json(admin.0.profile())
}

#[post("/create-admin", data = "<input>")]
pub async fn create_admin(
    _admin: AdminGuard,
    input: Json<AdminUserCreate>,
    users: &State<Repository<AdminUser>>,
    hasher: &State<PasswordHasher>,
) -> ApiResult<Created<Json<AdminProfile>>> {
    let created = admin_provisioning::create_admin(users, hasher, input.into_inner()).await?;
    Ok(Created::new("/api/auth/me").body(Json(created.profile())))
}

#[post("/change-password", data = "<input>")]
pub async fn change_password(
    admin: AdminGuard,
    input: Json<PasswordChange>,
    users: &State<Repository<AdminUser>>,
    hasher: &State<PasswordHasher>,
) -> ApiResult<Json<Message>> {
    let admin = admin.0;
    if !hasher.verify(&input.current_password, &admin.hashed_password).await {
        return Err(ApiError::Validation("Current password is incorrect".to_string()));
    }
    input.validate()?;

    let hashed_password = hasher.hash(&input.new_password).await?;
    users
        .set_fields(&admin.id, doc! { "hashed_password": hashed_password })
        .await?
        .ok_or(ApiError::NotFound(AdminUser::LABEL))?;

    tracing::info!(username = %admin.username, "password changed");
    Ok(Message::new("Password changed successfully"))
}

pub fn routes() -> Vec<Route> {
    routes![login, me, create_admin, change_password]
}
