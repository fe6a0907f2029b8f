pub mod admin_provisioning;
pub mod analytics;
pub mod auth_guard;
pub mod availability;
pub mod cors;
pub mod password;
