#[macro_use]
extern crate rocket;

pub mod config;
pub mod errors;
pub mod jwt;
pub mod logging;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

use std::sync::Arc;

use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};

use crate::config::AppConfig;
use crate::jwt::TokenService;
use crate::models::admin::AdminUser;
use crate::models::blog::BlogPost;
use crate::models::booking::Booking;
use crate::models::newsletter::NewsletterSubscription;
use crate::models::personal::PersonalInfo;
use crate::models::process_step::ProcessStep;
use crate::models::project::Project;
use crate::models::quote::Quote;
use crate::models::resource::{Resource, ResourceDownload};
use crate::models::service::Service;
use crate::models::skill::SkillCategory;
use crate::models::social_link::SocialLink;
use crate::models::statistic::Statistic;
use crate::models::technology::Technology;
use crate::models::testimonial::{PendingTestimonial, Testimonial};
use crate::repository::{RecordStore, Repository};
use crate::services::analytics::Analytics;
use crate::services::cors::{self, Cors};
use crate::services::password::PasswordHasher;

fn manage_repositories(rocket: Rocket<Build>, store: &Arc<dyn RecordStore>) -> Rocket<Build> {
    rocket
        .manage(Repository::<AdminUser>::new(store.clone()))
        .manage(Repository::<PersonalInfo>::new(store.clone()))
        .manage(Repository::<SkillCategory>::new(store.clone()))
        .manage(Repository::<Technology>::new(store.clone()))
        .manage(Repository::<Project>::new(store.clone()))
        .manage(Repository::<Service>::new(store.clone()))
        .manage(Repository::<Testimonial>::new(store.clone()))
        .manage(Repository::<PendingTestimonial>::new(store.clone()))
        .manage(Repository::<Statistic>::new(store.clone()))
        .manage(Repository::<SocialLink>::new(store.clone()))
        .manage(Repository::<ProcessStep>::new(store.clone()))
        .manage(Repository::<Resource>::new(store.clone()))
        .manage(Repository::<ResourceDownload>::new(store.clone()))
        .manage(Repository::<BlogPost>::new(store.clone()))
        .manage(Repository::<Quote>::new(store.clone()))
        .manage(Repository::<Booking>::new(store.clone()))
        .manage(Repository::<NewsletterSubscription>::new(store.clone()))
        .manage(Analytics::new(store.clone()))
}

/// Assembles the application on top of `store`. Rocket's own logger is
/// switched off; requests are traced through `tracing` instead.
pub fn build_rocket(config: AppConfig, store: Arc<dyn RecordStore>) -> Rocket<Build> {
    let figment = rocket::Config::figment().merge(("log_level", "off"));
    let tokens = TokenService::new(
        &config.secret_key,
        chrono::Duration::minutes(config.access_token_expire_minutes),
    );

    let cors = Cors::new(config.cors_allowed_origin.as_str());
    let shutdown_store = store.clone();
    let mut rocket = manage_repositories(rocket::custom(figment), &store)
        .manage(tokens)
        .manage(PasswordHasher::new(config.bcrypt_cost))
        .attach(cors)
        .attach(AdHoc::on_liftoff("Launch log", |rocket| {
            Box::pin(async move {
                let settings = rocket.config();
                tracing::info!(address = %settings.address, port = settings.port, "portfolio api listening");
            })
        }))
        .attach(AdHoc::on_shutdown("Record store shutdown", move |_| {
            Box::pin(async move {
                shutdown_store.shutdown().await;
                tracing::info!("record store closed");
            })
        }))
        .mount("/", routes![cors::preflight])
        .mount("/api", routes::interactions::routes())
        .mount("/api/public", routes::public::routes())
        .mount("/api/auth", routes::auth::routes())
        .mount("/api/analytics", routes::analytics::routes())
        .register("/", routes::catchers());

    for (base, admin_routes) in routes::admin::mounts() {
        rocket = rocket.mount(base, admin_routes);
    }
    rocket
}
