use rocket::http::{Header, Status};
use rocket::response::{self, Responder, Response};
use rocket::serde::json::Json;
use rocket::Request;
use serde::Serialize;
use thiserror::Error;

use crate::models::ValidationError;
use crate::repository::StoreError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Internal server error")]
    Internal(#[from] StoreError),

    #[error("Internal server error")]
    Unexpected(String),
}

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::Validation(_) => Status::BadRequest,
            ApiError::Unauthorized(_) => Status::Unauthorized,
            ApiError::NotFound(_) => Status::NotFound,
            ApiError::Internal(_) | ApiError::Unexpected(_) => Status::InternalServerError,
        }
    }

    pub fn credentials() -> Self {
        ApiError::Unauthorized("Could not validate credentials".to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.0)
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        match &self {
            ApiError::Internal(e) => {
                tracing::error!(uri = %request.uri(), error = %e, "store failure");
            }
            ApiError::Unexpected(e) => {
                tracing::error!(uri = %request.uri(), error = %e, "unexpected failure");
            }
            _ => tracing::debug!(uri = %request.uri(), detail = %self, "request rejected"),
        }

        let status = self.status();
        let body = Json(ErrorBody {
            detail: self.to_string(),
        });

        let mut builder = Response::build_from(body.respond_to(request)?);
        builder.status(status);
        if status == Status::Unauthorized {
            builder.header(Header::new("WWW-Authenticate", "Bearer"));
        }
        Ok(builder.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_resource() {
        let err = ApiError::NotFound("Project");
        assert_eq!(err.to_string(), "Project not found");
        assert_eq!(err.status(), Status::NotFound);
    }

    #[test]
    fn internal_errors_hide_their_cause() {
        let err = ApiError::Internal(StoreError::Unsupported("$where".to_string()));
        assert_eq!(err.to_string(), "Internal server error");
        assert_eq!(err.status(), Status::InternalServerError);
    }
}
