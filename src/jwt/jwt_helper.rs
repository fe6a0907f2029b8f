use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::errors::ApiError;
use crate::jwt::claims::Claims;

/// Issues and verifies HS256 bearer tokens with a server-held secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    default_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, default_ttl: Duration) -> Self {
        TokenService {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn issue_token(&self, subject: &str, ttl: Duration) -> Result<String, ApiError> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(ttl)
            .ok_or_else(|| ApiError::Unexpected(format!("token lifetime {ttl} is out of range")))?;
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Unexpected(format!("failed to sign token: {e}")))
    }

    /// Bad signature, malformed payload and expiry all collapse into the same
    /// error so callers cannot tell them apart.
    pub fn verify_token(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "token rejected");
                ApiError::credentials()
            })
    }
}
