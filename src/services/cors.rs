use std::path::PathBuf;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::{Request, Response};

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// Adds CORS headers for the configured front-end origin to every response.
pub struct Cors {
    allowed_origin: String,
}

impl Cors {
    pub fn new(allowed_origin: impl Into<String>) -> Self {
        Cors {
            allowed_origin: allowed_origin.into(),
        }
    }
}

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "CORS headers",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new(
            "Access-Control-Allow-Origin",
            self.allowed_origin.clone(),
        ));
        if self.allowed_origin != "*" {
            response.set_header(Header::new("Vary", "Origin"));
        }
        response.set_header(Header::new("Access-Control-Allow-Methods", ALLOWED_METHODS));
        response.set_header(Header::new("Access-Control-Allow-Headers", ALLOWED_HEADERS));
    }
}

/// Preflight requests get an empty 200 carrying the headers above.
#[options("/<_path..>")]
pub fn preflight(_path: PathBuf) -> Status {
    Status::Ok
}
