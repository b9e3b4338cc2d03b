//! User service
//!
//! Handles signup, password checks, and the lifecycle of login sessions.

use std::sync::Arc;
use std::sync::OnceLock;

use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use rand::Rng;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::domain::entities::{NewSession, NewUser, User, MAX_USERNAME_LENGTH};
use crate::domain::ports::{SessionRepository, UserRepository};
use crate::error::{AppError, DomainError};

type HmacSha256 = Hmac<Sha256>;

const MIN_PASSWORD_LENGTH: usize = 8;

fn username_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[\w.@+-]+$").expect("username pattern is valid"))
}

/// Signup form fields
#[derive(Debug, Clone, Default)]
pub struct SignupInput {
    pub username: String,
    pub password1: String,
    pub password2: String,
}

impl SignupInput {
    fn validate(&self) -> Result<&str, DomainError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(DomainError::invalid("username", "This field is required."));
        }
        if username.chars().count() > MAX_USERNAME_LENGTH
            || !username_pattern().is_match(username)
        {
            return Err(DomainError::invalid(
                "username",
                format!(
                    "Enter a valid username: at most {} letters, digits and @/./+/-/_ characters.",
                    MAX_USERNAME_LENGTH
                ),
            ));
        }
        if self.password1.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::invalid(
                "password1",
                format!(
                    "This password is too short. It must contain at least {} characters.",
                    MIN_PASSWORD_LENGTH
                ),
            ));
        }
        if self.password1 != self.password2 {
            return Err(DomainError::invalid(
                "password2",
                "The two password fields didn't match.",
            ));
        }
        Ok(username)
    }
}

/// Service for user accounts and sessions
pub struct UserService<UR, SR>
where
    UR: UserRepository + ?Sized,
    SR: SessionRepository + ?Sized,
{
    users: Arc<UR>,
    sessions: Arc<SR>,
    secret_key: String,
    session_ttl: Duration,
}

impl<UR, SR> UserService<UR, SR>
where
    UR: UserRepository + ?Sized,
    SR: SessionRepository + ?Sized,
{
    pub fn new(
        users: Arc<UR>,
        sessions: Arc<SR>,
        secret_key: String,
        session_ttl: Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            secret_key,
            session_ttl,
        }
    }

    /// Register a new user
    pub async fn signup(&self, input: &SignupInput) -> Result<User, AppError> {
        let username = input.validate()?;

        if self.users.find_by_username(username).await?.is_some() {
            return Err(DomainError::invalid(
                "username",
                "A user with that username already exists.",
            )
            .into());
        }

        let password_hash = hash_password(&input.password1, &self.secret_key)?;
        let user = self
            .users
            .create(&NewUser {
                username: username.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                DomainError::AlreadyExists(_) => {
                    DomainError::invalid("username", "A user with that username already exists.")
                }
                e => e,
            })?;

        tracing::info!(user_id = %user.id, username = %user.username, "User signed up");
        Ok(user)
    }

    /// Check credentials and open a session.
    ///
    /// Returns the user and the bearer token (only shown once).
    pub async fn login(&self, username: &str, password: &str) -> Result<(User, String), AppError> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash, &self.secret_key) {
            tracing::warn!(username = %user.username, "Failed login attempt");
            return Err(DomainError::InvalidCredentials.into());
        }

        let token = self.open_session(&user).await?;
        Ok((user, token))
    }

    /// Issue a session for an already identified user
    pub async fn open_session(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let purged = self.sessions.delete_expired(now).await?;
        if purged > 0 {
            tracing::debug!(purged, "Removed expired sessions");
        }

        let token = generate_session_token();
        self.sessions
            .create(&NewSession {
                user_id: user.id,
                token_hash: hash_token(&token),
                expires_at: now + self.session_ttl,
            })
            .await?;

        tracing::info!(user_id = %user.id, "Session opened");
        Ok(token)
    }

    /// Resolve a bearer token to its user, `None` if unknown or expired
    pub async fn authenticate(&self, token: &str) -> Result<Option<User>, AppError> {
        let token_hash = hash_token(token);
        let Some(session) = self.sessions.find_by_token_hash(&token_hash).await? else {
            return Ok(None);
        };

        if session.is_expired(Utc::now()) {
            self.sessions.delete_by_token_hash(&token_hash).await?;
            return Ok(None);
        }

        Ok(self.users.find_by_id(&session.user_id).await?)
    }

    /// Revoke the session behind `token`
    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        self.sessions
            .delete_by_token_hash(&hash_token(token))
            .await?;
        Ok(())
    }
}

/// Generate a random session token
fn generate_session_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    hex::encode(bytes)
}

/// Hash a session token for storage
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

fn password_mac(salt: &str, password: &str, key: &str) -> Result<HmacSha256, DomainError> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|e| DomainError::Internal(format!("Invalid secret key: {}", e)))?;
    mac.update(salt.as_bytes());
    mac.update(b"$");
    mac.update(password.as_bytes());
    Ok(mac)
}

/// Hash a password as `salt$hex(hmac(key, salt$password))`
fn hash_password(password: &str, key: &str) -> Result<String, DomainError> {
    let mut rng = rand::thread_rng();
    let salt_bytes: Vec<u8> = (0..16).map(|_| rng.gen()).collect();
    let salt = hex::encode(salt_bytes);

    let digest = password_mac(&salt, password, key)?.finalize().into_bytes();
    Ok(format!("{}${}", salt, hex::encode(digest)))
}

/// Constant-time password check
fn verify_password(password: &str, stored: &str, key: &str) -> bool {
    let Some((salt, expected_hex)) = stored.split_once('$') else {
        return false;
    };
    let Ok(expected) = hex::decode(expected_hex) else {
        return false;
    };
    match password_mac(salt, password, key) {
        Ok(mac) => mac.verify_slice(&expected).is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
pub(crate) fn hash_password_for_tests(password: &str, key: &str) -> String {
    hash_password(password, key).expect("test key is valid")
}
