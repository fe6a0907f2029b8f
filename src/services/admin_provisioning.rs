use mongodb::bson::doc;

use crate::errors::{ApiError, ApiResult};
use crate::models::admin::{AdminUser, AdminUserCreate};
use crate::models::Validate;
use crate::repository::Repository;
use crate::services::password::PasswordHasher;

#[derive(Debug)]
pub enum Provisioned {
    Created(AdminUser),
    AlreadyProvisioned,
}

/// Registers a new administrator. Username and email are both unique.
pub async fn create_admin(
    users: &Repository<AdminUser>,
    hasher: &PasswordHasher,
    input: AdminUserCreate,
) -> ApiResult<AdminUser> {
    input.validate()?;

    if users.exists(doc! { "username": input.username.as_str() }).await? {
        return Err(ApiError::Validation("Username already exists".to_string()));
    }
    if users.exists(doc! { "email": input.email.as_str() }).await? {
        return Err(ApiError::Validation("Email already exists".to_string()));
    }

    let hashed_password = hasher.hash(&input.password).await?;
    let admin = AdminUser::new(input.username, input.email, hashed_password);
    users.create(&admin).await?;

    tracing::info!(username = %admin.username, "admin account created");
    Ok(admin)
}

/// First-run provisioning: creates the account only while no administrator
/// exists yet.
pub async fn provision_first_admin(
    users: &Repository<AdminUser>,
    hasher: &PasswordHasher,
    input: AdminUserCreate,
) -> ApiResult<Provisioned> {
    if users.count(doc! {}).await? > 0 {
        tracing::info!("an admin account already exists, skipping provisioning");
        return Ok(Provisioned::AlreadyProvisioned);
    }
    create_admin(users, hasher, input).await.map(Provisioned::Created)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::repository::MemoryStore;

    fn input(username: &str, email: &str) -> AdminUserCreate {
        AdminUserCreate {
            username: username.to_string(),
            email: email.to_string(),
            password: "s3cret-password".to_string(),
        }
    }

    #[tokio::test]
    async fn provisioning_runs_only_once() {
        let users = Repository::<AdminUser>::new(Arc::new(MemoryStore::new()));
        let hasher = PasswordHasher::new(4);

        let first = provision_first_admin(&users, &hasher, input("owner", "owner@example.dev"))
            .await
            .unwrap();
        assert!(matches!(first, Provisioned::Created(_)));

        let second = provision_first_admin(&users, &hasher, input("other", "other@example.dev"))
            .await
            .unwrap();
        assert!(matches!(second, Provisioned::AlreadyProvisioned));
        assert_eq!(users.count(doc! {}).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_username_and_email_are_rejected() {
        let users = Repository::<AdminUser>::new(Arc::new(MemoryStore::new()));
        let hasher = PasswordHasher::new(4);
        create_admin(&users, &hasher, input("owner", "owner@example.dev"))
            .await
            .unwrap();

        let err = create_admin(&users, &hasher, input("owner", "new@example.dev"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Username already exists");

        let err = create_admin(&users, &hasher, input("someone", "owner@example.dev"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Email already exists");
    }

    #[tokio::test]
    async fn stored_hash_verifies() {
        let users = Repository::<AdminUser>::new(Arc::new(MemoryStore::new()));
        let hasher = PasswordHasher::new(4);
        let admin = create_admin(&users, &hasher, input("owner", "owner@example.dev"))
            .await
            .unwrap();
        let stored = users.lookup("owner").await.unwrap().unwrap();
        assert_eq!(stored.id, admin.id);
        assert!(hasher.verify("s3cret-password", &stored.hashed_password).await);
    }
}
