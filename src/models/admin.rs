use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{check_email, new_id, require, timestamp, Validate, ValidationError};
use crate::repository::Record;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Stored administrator account. Never serialized to clients directly; see
/// [`AdminProfile`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AdminUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub last_login: Option<DateTime<Utc>>,
}

fn active_by_default() -> bool {
    true
}

impl AdminUser {
    pub fn new(username: String, email: String, hashed_password: String) -> Self {
        AdminUser {
            id: new_id(),
            username,
            email,
            hashed_password,
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    pub fn profile(&self) -> AdminProfile {
        AdminProfile {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            is_active: self.is_active,
            created_at: self.created_at,
            last_login: self.last_login,
        }
    }
}

impl Record for AdminUser {
    const COLLECTION: &'static str = "admin_users";
    const LABEL: &'static str = "Admin user";
    const LOOKUP_FIELD: &'static str = "username";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AdminProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AdminUserCreate {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Validate for AdminUserCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        require("username", &self.username)?;
        check_email("email", &self.email)?;
        check_password("password", &self.password)
    }
}

#[derive(Deserialize, Debug)]
pub struct AdminLogin {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

impl Validate for PasswordChange {
    fn validate(&self) -> Result<(), ValidationError> {
        check_password("new_password", &self.new_password)
    }
}

fn check_password(field: &str, password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError(format!(
            "{field} must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_hides_the_hash() {
        let admin = AdminUser::new("root".into(), "root@example.dev".into(), "$2b$04$hash".into());
        let json = serde_json::to_value(admin.profile()).unwrap();
        assert_eq!(json["username"], "root");
        assert!(json.get("hashed_password").is_none());
    }

    #[test]
    fn short_passwords_are_rejected() {
        let input = AdminUserCreate {
            username: "root".into(),
            email: "root@example.dev".into(),
            password: "short".into(),
        };
        assert!(input.validate().is_err());
    }
}
