use std::{env, fmt::Display, ops::RangeInclusive, str::FromStr};

use tracing::{info, warn};

const INSECURE_SECRET_KEY: &str = "insecure-secret-key-change-me";

/// Costs bcrypt accepts.
pub const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;
/// Token lifetimes from one minute up to one year.
pub const TOKEN_EXPIRY_RANGE: RangeInclusive<i64> = 1..=525_600;

/// Runtime settings read from the environment.
///
/// Rocket's own settings (port, address, workers) stay in Rocket's figment
/// and are configured with the usual `ROCKET_*` variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongo_url: String,
    pub db_name: String,
    pub secret_key: String,
    pub access_token_expire_minutes: i64,
    pub bcrypt_cost: u32,
    /// Value of `Access-Control-Allow-Origin` on every response.
    pub cors_allowed_origin: String,
    pub admin_bootstrap: Option<AdminBootstrap>,
}

/// Operator-supplied credentials for the first administrator account.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl AppConfig {
    pub fn load() -> Self {
        Self {
            mongo_url: try_load("MONGO_URL", "mongodb://localhost:27017"),
            db_name: try_load("DB_NAME", "portfolio"),
            secret_key: try_load("SECRET_KEY", INSECURE_SECRET_KEY),
            access_token_expire_minutes: clamp_to(
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                try_load("ACCESS_TOKEN_EXPIRE_MINUTES", "60"),
                TOKEN_EXPIRY_RANGE,
            ),
            bcrypt_cost: clamp_to("BCRYPT_COST", try_load("BCRYPT_COST", "12"), BCRYPT_COST_RANGE),
            cors_allowed_origin: try_load("CORS_ALLOWED_ORIGIN", "*"),
            admin_bootstrap: AdminBootstrap::from_env(),
        }
    }

    pub fn uses_insecure_secret(&self) -> bool {
        self.secret_key == INSECURE_SECRET_KEY
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mongo_url: "mongodb://localhost:27017".to_string(),
            db_name: "portfolio".to_string(),
            secret_key: INSECURE_SECRET_KEY.to_string(),
            access_token_expire_minutes: 60,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            cors_allowed_origin: "*".to_string(),
            admin_bootstrap: None,
        }
    }
}

impl AdminBootstrap {
    fn from_env() -> Option<Self> {
        let username = env::var("ADMIN_USERNAME").ok()?;
        let email = env::var("ADMIN_EMAIL").ok()?;
        let Ok(password) = env::var("ADMIN_PASSWORD") else {
            warn!("ADMIN_USERNAME is set but ADMIN_PASSWORD is missing, skipping admin bootstrap");
            return None;
        };

        Some(Self {
            username,
            email,
            password,
        })
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        info!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|_| default.to_string());

    raw.parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
        default
            .parse()
            .unwrap_or_else(|_| unreachable!("default for {key} must parse"))
    })
}

fn clamp_to<T: PartialOrd + Copy + Display>(key: &str, value: T, range: RangeInclusive<T>) -> T {
    let clamped = if value < *range.start() {
        *range.start()
    } else if value > *range.end() {
        *range.end()
    } else {
        return value;
    };
    warn!("{key} value {value} is outside {}..={}, using {clamped}", range.start(), range.end());
    clamped
}
