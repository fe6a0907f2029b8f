//! Visitor-facing endpoints under `/api`: quote requests, bookings,
//! newsletter signups, testimonial submissions and resource downloads.

use std::net::IpAddr;

use mongodb::bson::doc;
use rocket::response::status::Created;
use rocket::serde::json::{json, Json, Value};
use rocket::{Route, State};
use serde::Serialize;

use crate::errors::{ApiError, ApiResult};
use crate::models::booking::{Booking, BookingCreate};
use crate::models::newsletter::{NewsletterSubscribe, NewsletterSubscription};
use crate::models::quote::{Quote, QuoteCreate};
use crate::models::resource::{Resource, ResourceDownload};
use crate::models::testimonial::{PendingTestimonial, TestimonialSubmission};
use crate::models::{check_email, Validate};
use crate::repository::{Record, Repository};
use crate::routes::admin::{fetch_record, list_records};
use crate::services::availability::{self, Availability};

#[get("/")]
pub fn index() -> Json<Value> {
    Json(json!({
        "message": "Portfolio API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[post("/quotes", data = "<input>")]
pub async fn request_quote(
    input: Json<QuoteCreate>,
    repo: &State<Repository<Quote>>,
) -> ApiResult<Created<Json<Quote>>> {
    input.validate()?;
    let quote = Quote::from_request(input.into_inner());
    repo.create(&quote).await?;
    tracing::info!(id = %quote.id, project_type = %quote.quote_data.project_type, "quote requested");
    Ok(Created::new(format!("/api/admin/quotes/{}", quote.id)).body(Json(quote)))
}

/// Two concurrent requests for the same slot both succeed; nothing here
/// re-checks availability at write time.
#[post("/bookings", data = "<input>")]
pub async fn book(
    input: Json<BookingCreate>,
    repo: &State<Repository<Booking>>,
) -> ApiResult<Created<Json<Booking>>> {
    input.validate()?;
    let booking = Booking::from_request(input.into_inner());
    repo.create(&booking).await?;
    tracing::info!(
        id = %booking.id,
        date = %booking.booking_data.date,
        time = %booking.booking_data.time,
        "booking confirmed"
    );
    Ok(Created::new(format!("/api/admin/bookings/{}", booking.id)).body(Json(booking)))
}

#[get("/bookings/availability/<date>")]
pub async fn open_slots(date: &str, repo: &State<Repository<Booking>>) -> ApiResult<Json<Availability>> {
    Ok(Json(availability::for_date(repo, date).await?))
}

#[derive(Serialize, Debug)]
pub struct SubscribeOutcome {
    pub message: &'static str,
    pub status: &'static str,
}

/// Subscribing twice is not an error; the second call reports `existing`.
#[post("/newsletter/subscribe", data = "<input>")]
pub async fn subscribe(
    input: Json<NewsletterSubscribe>,
    repo: &State<Repository<NewsletterSubscription>>,
) -> ApiResult<Json<SubscribeOutcome>> {
    let input = NewsletterSubscribe {
        email: input.into_inner().email.trim().to_lowercase(),
    };
    input.validate()?;
    let email = input.email;

    if repo.lookup(&email).await?.is_some() {
        return Ok(Json(SubscribeOutcome {
            message: "Email already subscribed",
            status: "existing",
        }));
    }

    repo.create(&NewsletterSubscription::new(email)).await?;
    tracing::info!("newsletter subscription added");
    Ok(Json(SubscribeOutcome {
        message: "Successfully subscribed to newsletter",
        status: "new",
    }))
}

#[post("/testimonials/submit", data = "<input>")]
pub async fn submit_testimonial(
    input: Json<TestimonialSubmission>,
    repo: &State<Repository<PendingTestimonial>>,
) -> ApiResult<Created<Json<PendingTestimonial>>> {
    input.validate()?;
    let submission = PendingTestimonial::from_submission(input.into_inner());
    repo.create(&submission).await?;
    tracing::info!(id = %submission.id, "testimonial submitted for review");
    Ok(Created::new(format!("/api/admin/testimonials/pending/{}", submission.id)).body(Json(submission)))
}

#[get("/resources")]
pub async fn resources(repo: &State<Repository<Resource>>) -> ApiResult<Json<Vec<Resource>>> {
    list_records(repo).await
}

#[get("/resources/<id>")]
pub async fn resource(id: &str, repo: &State<Repository<Resource>>) -> ApiResult<Json<Resource>> {
    fetch_record(repo, id).await
}

#[derive(Serialize, Debug)]
pub struct DownloadReceipt {
    pub message: &'static str,
    pub resource: Resource,
}

/// Records the download and returns the resource with its updated counter.
#[post("/resources/<id>/download?<user_email>")]
pub async fn download(
    id: &str,
    user_email: Option<String>,
    client_ip: Option<IpAddr>,
    resources: &State<Repository<Resource>>,
    downloads: &State<Repository<ResourceDownload>>,
) -> ApiResult<Json<DownloadReceipt>> {
    if let Some(email) = &user_email {
        check_email("user_email", email)?;
    }
    if !resources.exists(doc! { "id": id }).await? {
        return Err(ApiError::NotFound(Resource::LABEL));
    }

    let record = ResourceDownload::new(id, user_email, client_ip.map(|ip| ip.to_string()));
    downloads.create(&record).await?;

    let resource = resources
        .update(id, doc! { "$inc": { "downloads": 1 } })
        .await?
        .ok_or(ApiError::NotFound(Resource::LABEL))?;

    tracing::info!(resource_id = id, downloads = resource.downloads, "download recorded");
    Ok(Json(DownloadReceipt {
        message: "Download recorded",
        resource,
    }))
}

pub fn routes() -> Vec<Route> {
    routes![
        index,
        request_quote,
        book,
        open_slots,
        subscribe,
        submit_testimonial,
        resources,
        resource,
        download
    ]
}
