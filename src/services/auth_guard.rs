use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;

use crate::jwt::TokenService;
use crate::models::admin::AdminUser;
use crate::repository::Repository;

/// Why a protected request was turned away. The resolved result is kept in
/// the request-local cache so the 401 catcher can report the right detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    Missing,
    Invalid,
    Inactive,
    Unavailable,
}

impl AuthFailure {
    pub fn status(self) -> Status {
        match self {
            AuthFailure::Unavailable => Status::InternalServerError,
            _ => Status::Unauthorized,
        }
    }

    pub fn detail(self) -> &'static str {
        match self {
            AuthFailure::Missing => "Not authenticated",
            AuthFailure::Invalid => "Could not validate credentials",
            AuthFailure::Inactive => "Inactive user",
            AuthFailure::Unavailable => "Internal server error",
        }
    }
}

pub type Resolution = Result<AdminUser, AuthFailure>;

/// The authenticated administrator acting on this request.
pub struct AdminGuard(pub AdminUser);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminGuard {
    type Error = AuthFailure;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let resolution: &Resolution = request.local_cache_async(resolve(request)).await;
        match resolution {
            Ok(admin) => Outcome::Success(AdminGuard(admin.clone())),
            Err(failure) => Outcome::Error((failure.status(), *failure)),
        }
    }
}

/// The cached resolution for this request, if a guard ran.
pub fn cached_failure(request: &Request<'_>) -> Option<AuthFailure> {
    let resolution: &Resolution = request.local_cache(|| Err(AuthFailure::Missing));
    resolution.as_ref().err().copied()
}

async fn resolve(request: &Request<'_>) -> Resolution {
    let token = bearer_token(request).ok_or(AuthFailure::Missing)?;

    let rocket = request.rocket();
    let (Some(tokens), Some(users)) = (
        rocket.state::<TokenService>(),
        rocket.state::<Repository<AdminUser>>(),
    ) else {
        tracing::error!("auth state is not managed");
        return Err(AuthFailure::Unavailable);
    };

    let claims = tokens.verify_token(token).map_err(|_| AuthFailure::Invalid)?;
    let admin = match users.lookup(&claims.sub).await {
        Ok(Some(admin)) => admin,
        Ok(None) => {
            tracing::debug!(subject = %claims.sub, "token names an unknown admin");
            return Err(AuthFailure::Invalid);
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to load admin");
            return Err(AuthFailure::Unavailable);
        }
    };

    if !admin.is_active {
        return Err(AuthFailure::Inactive);
    }
    Ok(admin)
}

fn bearer_token<'a>(request: &'a Request<'_>) -> Option<&'a str> {
    let header = request.headers().get_one("Authorization")?;
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
