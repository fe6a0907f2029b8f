use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin username.
    pub sub: String,
    pub iat: i64,
    /// Absolute expiry, seconds since the Unix epoch.
    pub exp: i64,
}
