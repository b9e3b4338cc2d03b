//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{
    NewNote, NewSession, NewUser, Note, NoteChanges, NoteId, Session, User, UserId,
};
use crate::error::DomainError;

/// Repository for Note entities
///
/// Implementations must keep `slug` unique across all notes, including under
/// concurrent writers, and report a clash as `DomainError::DuplicateSlug`
/// without persisting anything.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new note
    async fn create(&self, note: &NewNote) -> Result<Note, DomainError>;

    /// Overwrite title, text and slug of an existing note
    async fn update(&self, id: &NoteId, changes: &NoteChanges) -> Result<Note, DomainError>;

    /// Remove a note; `NotFound` if it is already gone
    async fn delete(&self, id: &NoteId) -> Result<(), DomainError>;

    /// All notes written by `author`, oldest first
    async fn list_for(&self, author: &UserId) -> Result<Vec<Note>, DomainError>;

    /// The note with `slug`, only if `author` wrote it
    async fn get_for(&self, author: &UserId, slug: &str) -> Result<Option<Note>, DomainError>;

    /// The note with `slug` regardless of author
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Note>, DomainError>;
}

/// Repository for User entities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user; `AlreadyExists` if the username is taken
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;
}

/// Repository for login sessions
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &NewSession) -> Result<Session, DomainError>;

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, DomainError>;

    /// Remove a session; succeeds even if it does not exist
    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<(), DomainError>;

    /// Drop every session that expired before `now`, returning how many went
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;
}
