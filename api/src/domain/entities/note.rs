//! Note domain entity
//!
//! A personal text note, addressed by a globally unique slug and visible
//! only to its author.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

pub const MAX_TITLE_LENGTH: usize = 100;
pub const MAX_SLUG_LENGTH: usize = 100;

/// Unique identifier for a note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId(pub Uuid);

impl NoteId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for NoteId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author: UserId,
    pub created_at: DateTime<Utc>,
}

impl Note {
    pub fn is_authored_by(&self, user: &UserId) -> bool {
        self.author == *user
    }
}

/// Validated data for a new note. The slug is already resolved.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author: UserId,
}

/// Validated replacement fields for an existing note
#[derive(Debug, Clone)]
pub struct NoteChanges {
    pub title: String,
    pub text: String,
    pub slug: String,
}
