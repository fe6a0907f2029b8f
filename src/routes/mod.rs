pub mod admin;
pub mod analytics;
pub mod auth;
pub mod interactions;
pub mod public;

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{Catcher, Request};
use serde::Serialize;

use crate::errors::{ApiError, ErrorBody};
use crate::services::auth_guard::{self, AuthFailure};

#[derive(Serialize, Debug)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Message {
            message: message.into(),
        })
    }
}

fn detail(status: Status, detail: &str) -> (Status, Json<ErrorBody>) {
    (
        status,
        Json(ErrorBody {
            detail: detail.to_string(),
        }),
    )
}

#[catch(400)]
fn bad_request() -> (Status, Json<ErrorBody>) {
    detail(Status::BadRequest, "Malformed request")
}

#[catch(401)]
fn unauthorized(request: &Request<'_>) -> ApiError {
    let failure = auth_guard::cached_failure(request).unwrap_or(AuthFailure::Missing);
    ApiError::Unauthorized(failure.detail().to_string())
}

#[catch(404)]
fn not_found() -> (Status, Json<ErrorBody>) {
    detail(Status::NotFound, "Not Found")
}

/// Well-formed JSON that does not fit the expected shape.
#[catch(422)]
fn unprocessable() -> (Status, Json<ErrorBody>) {
    detail(Status::BadRequest, "Request body does not match the expected shape")
}

#[catch(500)]
fn internal_error() -> (Status, Json<ErrorBody>) {
    detail(Status::InternalServerError, "Internal server error")
}

#[catch(default)]
fn fallback(status: Status, _request: &Request<'_>) -> (Status, Json<ErrorBody>) {
    detail(status, status.reason().unwrap_or("Request failed"))
}

pub fn catchers() -> Vec<Catcher> {
    catchers![
        bad_request,
        unauthorized,
        not_found,
        unprocessable,
        internal_error,
        fallback
    ]
}
