//! Administrator endpoints under `/api/admin`. Every handler takes an
//! [`AdminGuard`], so an unauthenticated request never reaches the store.

use chrono::Utc;
use mongodb::bson::{self, doc, Document};
use rocket::response::status::Created;
use rocket::serde::json::{json, Json, Value};
use rocket::{Route, State};

use crate::errors::{ApiError, ApiResult};
use crate::models::booking::{Booking, BookingStatusUpdate};
use crate::models::newsletter::NewsletterSubscription;
use crate::models::personal::{PersonalInfo, PersonalInfoCreate, PersonalInfoUpdate};
use crate::models::quote::{Quote, QuoteUpdate};
use crate::models::resource::{default_resources, Resource};
use crate::models::testimonial::{PendingTestimonial, ReviewStatus, Testimonial};
use crate::models::{timestamp, Editable, Validate};
use crate::repository::{Record, Repository, StoreError};
use crate::routes::Message;
use crate::services::auth_guard::AdminGuard;

fn stamped(mut fields: Document) -> Document {
    fields.insert("updated_at", timestamp::to_bson(&Utc::now()));
    fields
}

pub(crate) async fn list_records<T: Record>(repo: &Repository<T>) -> ApiResult<Json<Vec<T>>> {
    Ok(Json(repo.list(doc! {}).await?))
}

pub(crate) async fn fetch_record<T: Record>(repo: &Repository<T>, key: &str) -> ApiResult<Json<T>> {
    repo.lookup(key)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(T::LABEL))
}

pub(crate) async fn create_record<T: Editable>(
    repo: &Repository<T>,
    base: &str,
    input: T::Create,
) -> ApiResult<Created<Json<T>>> {
    input.validate()?;
    if let Some((filter, message)) = T::conflict(&input) {
        if repo.exists(filter).await? {
            return Err(ApiError::Validation(message.to_string()));
        }
    }

    let record = T::from_create(input);
    repo.create(&record).await?;
    tracing::info!(collection = T::COLLECTION, id = record.id(), "record created");

    let location = format!("{base}/{}", record.id());
    Ok(Created::new(location).body(Json(record)))
}

/// Applies only the fields present in `patch` and refreshes `updated_at`.
pub(crate) async fn update_record<T: Editable>(
    repo: &Repository<T>,
    id: &str,
    patch: T::Patch,
) -> ApiResult<Json<T>> {
    patch.validate()?;
    let existing = repo.get(id).await?.ok_or(ApiError::NotFound(T::LABEL))?;
    if let Some((filter, message)) = existing.conflict_on_update(&patch) {
        if repo.exists(filter).await? {
            return Err(ApiError::Validation(message.to_string()));
        }
    }

    let mut fields = bson::to_document(&patch).map_err(StoreError::from)?;
    existing.prepare_update(&mut fields);

    repo.set_fields(id, stamped(fields))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(T::LABEL))
}

pub(crate) async fn delete_record<T: Record>(repo: &Repository<T>, id: &str) -> ApiResult<Json<Message>> {
    if !repo.delete(id).await? {
        return Err(ApiError::NotFound(T::LABEL));
    }
    tracing::info!(collection = T::COLLECTION, id, "record deleted");
    Ok(Message::new(format!("{} deleted successfully", T::LABEL)))
}

/// Generates the list / fetch / create / update / delete handlers of one
/// content collection, mounted at `$base`.
macro_rules! content_routes {
    ($module:ident, $record:ty, $base:literal) => {
        pub mod $module {
            use super::*;

            pub const BASE: &str = $base;

            #[get("/")]
            pub async fn list(_admin: AdminGuard, repo: &State<Repository<$record>>) -> ApiResult<Json<Vec<$record>>> {
                list_records(repo).await
            }

            #[get("/<id>")]
            pub async fn fetch(_admin: AdminGuard, id: &str, repo: &State<Repository<$record>>) -> ApiResult<Json<$record>> {
                fetch_record(repo, id).await
            }

            #[post("/", data = "<input>")]
            pub async fn create(
                _admin: AdminGuard,
                input: Json<<$record as Editable>::Create>,
                repo: &State<Repository<$record>>,
            ) -> ApiResult<Created<Json<$record>>> {
                create_record(repo, BASE, input.into_inner()).await
            }

            #[put("/<id>", data = "<input>")]
            pub async fn update(
                _admin: AdminGuard,
                id: &str,
                input: Json<<$record as Editable>::Patch>,
                repo: &State<Repository<$record>>,
            ) -> ApiResult<Json<$record>> {
                update_record(repo, id, input.into_inner()).await
            }

            #[delete("/<id>")]
            pub async fn remove(_admin: AdminGuard, id: &str, repo: &State<Repository<$record>>) -> ApiResult<Json<Message>> {
                delete_record(repo, id).await
            }

            pub fn routes() -> Vec<Route> {
                routes![list, fetch, create, update, remove]
            }
        }
    };
}

content_routes!(skills, crate::models::skill::SkillCategory, "/api/admin/skills");
content_routes!(technologies, crate::models::technology::Technology, "/api/admin/technologies");
content_routes!(projects, crate::models::project::Project, "/api/admin/projects");
content_routes!(services, crate::models::service::Service, "/api/admin/services");
content_routes!(testimonials, crate::models::testimonial::Testimonial, "/api/admin/testimonials");
content_routes!(statistics, crate::models::statistic::Statistic, "/api/admin/statistics");
content_routes!(social_links, crate::models::social_link::SocialLink, "/api/admin/social-links");
content_routes!(process_steps, crate::models::process_step::ProcessStep, "/api/admin/process-steps");
content_routes!(resources, crate::models::resource::Resource, "/api/admin/resources");
content_routes!(blog, crate::models::blog::BlogPost, "/api/admin/blog");

/// The single personal-information record.
pub mod personal {
    use super::*;

    pub const BASE: &str = "/api/admin/personal";

    #[get("/")]
    pub async fn fetch(_admin: AdminGuard, repo: &State<Repository<PersonalInfo>>) -> ApiResult<Json<PersonalInfo>> {
        repo.find_one(doc! {})
            .await?
            .map(Json)
            .ok_or(ApiError::NotFound(PersonalInfo::LABEL))
    }

    #[post("/", data = "<input>")]
    pub async fn create(
        _admin: AdminGuard,
        input: Json<PersonalInfoCreate>,
        repo: &State<Repository<PersonalInfo>>,
    ) -> ApiResult<Created<Json<PersonalInfo>>> {
        if repo.exists(doc! {}).await? {
            return Err(ApiError::Validation(
                "Personal information already exists. Use PUT to update.".to_string(),
            ));
        }
        create_record(repo, BASE, input.into_inner()).await
    }

    #[put("/", data = "<input>")]
    pub async fn update(
        _admin: AdminGuard,
        input: Json<PersonalInfoUpdate>,
        repo: &State<Repository<PersonalInfo>>,
    ) -> ApiResult<Json<PersonalInfo>> {
        let existing = repo
            .find_one(doc! {})
            .await?
            .ok_or(ApiError::NotFound(PersonalInfo::LABEL))?;
        update_record(repo, &existing.id, input.into_inner()).await
    }

    pub fn routes() -> Vec<Route> {
        routes![fetch, create, update]
    }
}

/// Moderation queue of visitor-submitted testimonials, mounted next to the
/// testimonial routes.
pub mod moderation {
    use super::*;

    pub const BASE: &str = "/api/admin/testimonials";

    async fn pending(repo: &Repository<PendingTestimonial>, id: &str) -> ApiResult<PendingTestimonial> {
        let submission = repo
            .get(id)
            .await?
            .ok_or(ApiError::NotFound(PendingTestimonial::LABEL))?;
        if submission.status != ReviewStatus::Pending {
            return Err(ApiError::Validation(format!(
                "Testimonial was already {}",
                submission.status.as_str()
            )));
        }
        Ok(submission)
    }

    async fn mark(repo: &Repository<PendingTestimonial>, id: &str, status: ReviewStatus) -> ApiResult<()> {
        let fields = doc! {
            "status": status.as_str(),
            "reviewed_at": timestamp::to_bson(&Utc::now()),
        };
        repo.set_fields(id, fields)
            .await?
            .map(|_| ())
            .ok_or(ApiError::NotFound(PendingTestimonial::LABEL))
    }

    #[get("/pending")]
    pub async fn list(
        _admin: AdminGuard,
        repo: &State<Repository<PendingTestimonial>>,
    ) -> ApiResult<Json<Vec<PendingTestimonial>>> {
        let filter = doc! { "status": ReviewStatus::Pending.as_str() };
        Ok(Json(repo.list(filter).await?))
    }

    #[put("/pending/<id>/approve")]
    pub async fn approve(
        _admin: AdminGuard,
        id: &str,
        queue: &State<Repository<PendingTestimonial>>,
        testimonials: &State<Repository<Testimonial>>,
    ) -> ApiResult<Json<Message>> {
        let submission = pending(queue, id).await?;
        let testimonial = submission.to_testimonial();
        testimonials.create(&testimonial).await?;
        mark(queue, id, ReviewStatus::Approved).await?;

        tracing::info!(pending_id = id, testimonial_id = %testimonial.id, "testimonial approved");
        Ok(Message::new("Testimonial approved and added"))
    }

    #[put("/pending/<id>/reject")]
    pub async fn reject(
        _admin: AdminGuard,
        id: &str,
        queue: &State<Repository<PendingTestimonial>>,
    ) -> ApiResult<Json<Message>> {
        pending(queue, id).await?;
        mark(queue, id, ReviewStatus::Rejected).await?;
        tracing::info!(pending_id = id, "testimonial rejected");
        Ok(Message::new("Testimonial rejected"))
    }

    pub fn routes() -> Vec<Route> {
        routes![list, approve, reject]
    }
}

pub mod bookings {
    use super::*;

    pub const BASE: &str = "/api/admin/bookings";

    #[get("/")]
    pub async fn list(_admin: AdminGuard, repo: &State<Repository<Booking>>) -> ApiResult<Json<Vec<Booking>>> {
        list_records(repo).await
    }

    #[get("/<id>")]
    pub async fn fetch(_admin: AdminGuard, id: &str, repo: &State<Repository<Booking>>) -> ApiResult<Json<Booking>> {
        fetch_record(repo, id).await
    }

    /// Cancelling a booking frees its slot for the availability lookup.
    #[put("/<id>/status", data = "<input>")]
    pub async fn set_status(
        _admin: AdminGuard,
        id: &str,
        input: Json<BookingStatusUpdate>,
        repo: &State<Repository<Booking>>,
    ) -> ApiResult<Json<Booking>> {
        let fields = stamped(doc! { "status": input.status.as_str() });
        let booking = repo
            .set_fields(id, fields)
            .await?
            .ok_or(ApiError::NotFound(Booking::LABEL))?;
        tracing::info!(id, status = input.status.as_str(), "booking status changed");
        Ok(Json(booking))
    }

    pub fn routes() -> Vec<Route> {
        routes![list, fetch, set_status]
    }
}

pub mod quotes {
    use super::*;

    pub const BASE: &str = "/api/admin/quotes";

    #[get("/")]
    pub async fn list(_admin: AdminGuard, repo: &State<Repository<Quote>>) -> ApiResult<Json<Vec<Quote>>> {
        list_records(repo).await
    }

    #[get("/<id>")]
    pub async fn fetch(_admin: AdminGuard, id: &str, repo: &State<Repository<Quote>>) -> ApiResult<Json<Quote>> {
        fetch_record(repo, id).await
    }

    #[put("/<id>", data = "<input>")]
    pub async fn update(
        _admin: AdminGuard,
        id: &str,
        input: Json<QuoteUpdate>,
        repo: &State<Repository<Quote>>,
    ) -> ApiResult<Json<Quote>> {
        input.validate()?;
        let fields = bson::to_document(&input.into_inner()).map_err(StoreError::from)?;
        repo.set_fields(id, stamped(fields))
            .await?
            .map(Json)
            .ok_or(ApiError::NotFound(Quote::LABEL))
    }

    pub fn routes() -> Vec<Route> {
        routes![list, fetch, update]
    }
}

pub mod newsletter {
    use super::*;

    pub const BASE: &str = "/api/admin/newsletter";

    #[get("/")]
    pub async fn list(
        _admin: AdminGuard,
        repo: &State<Repository<NewsletterSubscription>>,
    ) -> ApiResult<Json<Vec<NewsletterSubscription>>> {
        list_records(repo).await
    }

    pub fn routes() -> Vec<Route> {
        routes![list]
    }
}

/// Seeds the starter resource catalog, mounted next to the resource routes.
pub mod resource_seed {
    use super::*;

    pub const BASE: &str = "/api/admin/resources";

    #[post("/init")]
    pub async fn init(_admin: AdminGuard, repo: &State<Repository<Resource>>) -> ApiResult<Json<Value>> {
        let existing = repo.count(doc! {}).await?;
        if existing > 0 {
            return Ok(Json(json!({
                "message": "Resources already initialized",
                "count": existing,
            })));
        }

        let seeded = default_resources();
        for resource in &seeded {
            repo.create(resource).await?;
        }
        tracing::info!(count = seeded.len(), "default resources installed");

        let ids: Vec<&str> = seeded.iter().map(|resource| resource.id.as_str()).collect();
        Ok(Json(json!({
            "message": "Default resources initialized successfully",
            "count": seeded.len(),
            "resource_ids": ids,
        })))
    }

    pub fn routes() -> Vec<Route> {
        routes![init]
    }
}

/// Every admin route group with its mount point.
pub fn mounts() -> Vec<(&'static str, Vec<Route>)> {
    vec![
        (personal::BASE, personal::routes()),
        (skills::BASE, skills::routes()),
        (technologies::BASE, technologies::routes()),
        (projects::BASE, projects::routes()),
        (services::BASE, services::routes()),
        (testimonials::BASE, testimonials::routes()),
        (moderation::BASE, moderation::routes()),
        (statistics::BASE, statistics::routes()),
        (social_links::BASE, social_links::routes()),
        (process_steps::BASE, process_steps::routes()),
        (resources::BASE, resources::routes()),
        (resource_seed::BASE, resource_seed::routes()),
        (blog::BASE, blog::routes()),
        (bookings::BASE, bookings::routes()),
        (quotes::BASE, quotes::routes()),
        (newsletter::BASE, newsletter::routes()),
    ]
}
