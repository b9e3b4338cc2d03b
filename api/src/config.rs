use std::env;

use anyhow::Context;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Key for the HMAC-SHA256 password hashes
    pub secret_key: String,
    /// Lifetime of a login session
    pub session_ttl_hours: i64,
    /// Sustained request rate allowed on login/logout/signup per client IP
    pub auth_rate_per_second: u64,
    pub auth_rate_burst: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: parse_var("PORT", 8080)?,
            secret_key: env::var("SECRET_KEY")
                .unwrap_or_else(|_| "dev-key-not-for-production".to_string()),
            session_ttl_hours: parse_var("SESSION_TTL_HOURS", 24 * 14)?,
            auth_rate_per_second: parse_var("AUTH_RATE_PER_SECOND", 2)?,
            auth_rate_burst: parse_var("AUTH_RATE_BURST", 5)?,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", name, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            database_url: "postgres://localhost/yanote_test".to_string(),
            port: 0,
            secret_key: "test-secret-key".to_string(),
            session_ttl_hours: 1,
            auth_rate_per_second: 2,
            auth_rate_burst: 5,
        }
    }
}
