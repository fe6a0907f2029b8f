pub mod app_config;
pub mod mongo_config;

pub use app_config::{AdminBootstrap, AppConfig};
