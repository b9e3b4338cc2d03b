//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::domain::entities::{
    NewNote, NewSession, NewUser, Note, NoteChanges, NoteId, Session, User, UserId,
};
use crate::domain::ports::{NoteRepository, SessionRepository, UserRepository};
use crate::error::DomainError;

// ============================================================================
// In-Memory Note Repository
// ============================================================================

/// Slug uniqueness is checked and written under one write lock, mirroring
/// the unique index of the Postgres adapter.
#[derive(Default)]
pub struct InMemoryNoteRepository {
    notes: Arc<RwLock<HashMap<NoteId, Note>>>,
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a note for testing
    pub fn with_note(self, note: Note) -> Self {
        self.insert(note);
        self
    }

    pub fn insert(&self, note: Note) {
        self.notes.write().unwrap().insert(note.id, note);
    }

    pub fn count(&self) -> usize {
        self.notes.read().unwrap().len()
    }

    pub fn get(&self, id: &NoteId) -> Option<Note> {
        self.notes.read().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn create(&self, new_note: &NewNote) -> Result<Note, DomainError> {
        let mut notes = self.notes.write().unwrap();
        if notes.values().any(|n| n.slug == new_note.slug) {
            return Err(DomainError::DuplicateSlug(new_note.slug.clone()));
        }

        let note = Note {
            id: NoteId::new(),
            title: new_note.title.clone(),
            text: new_note.text.clone(),
            slug: new_note.slug.clone(),
            author: new_note.author,
            created_at: Utc::now(),
        };
        notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn update(&self, id: &NoteId, changes: &NoteChanges) -> Result<Note, DomainError> {
        let mut notes = self.notes.write().unwrap();
        if notes
            .values()
            .any(|n| n.slug == changes.slug && n.id != *id)
        {
            return Err(DomainError::DuplicateSlug(changes.slug.clone()));
        }

        let note = notes
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Note {} not found", id)))?;
        note.title = changes.title.clone();
        note.text = changes.text.clone();
        note.slug = changes.slug.clone();
        Ok(note.clone())
    }

    async fn delete(&self, id: &NoteId) -> Result<(), DomainError> {
        self.notes
            .write()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::NotFound(format!("Note {} not found", id)))
    }

    async fn list_for(&self, author: &UserId) -> Result<Vec<Note>, DomainError> {
        let notes = self.notes.read().unwrap();
        let mut own: Vec<_> = notes
            .values()
            .filter(|n| n.author == *author)
            .cloned()
            .collect();
        own.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(own)
    }

    async fn get_for(&self, author: &UserId, slug: &str) -> Result<Option<Note>, DomainError> {
        let notes = self.notes.read().unwrap();
        Ok(notes
            .values()
            .find(|n| n.slug == slug && n.author == *author)
            .cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Note>, DomainError> {
        let notes = self.notes.read().unwrap();
        Ok(notes.values().find(|n| n.slug == slug).cloned())
    }
}

// ============================================================================
// In-Memory User Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a user for testing
    pub fn with_user(self, user: User) -> Self {
        self.insert(user);
        self
    }

    pub fn insert(&self, user: User) {
        self.users.write().unwrap().insert(user.id, user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: &NewUser) -> Result<User, DomainError> {
        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.username == new_user.username) {
            return Err(DomainError::AlreadyExists(format!(
                "User {}",
                new_user.username
            )));
        }

        let user = User {
            id: UserId::new(),
            username: new_user.username.clone(),
            password_hash: new_user.password_hash.clone(),
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().unwrap().get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.username == username).cloned())
    }
}

// ============================================================================
// In-Memory Session Repository
// ============================================================================

#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.sessions.read().unwrap().len()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, new_session: &NewSession) -> Result<Session, DomainError> {
        let session = Session {
            id: Uuid::new_v4(),
            user_id: new_session.user_id,
            token_hash: new_session.token_hash.clone(),
            created_at: Utc::now(),
            expires_at: new_session.expires_at,
        };
        self.sessions
            .write()
            .unwrap()
            .insert(session.token_hash.clone(), session.clone());
        Ok(session)
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, DomainError> {
        Ok(self.sessions.read().unwrap().get(token_hash).cloned())
    }

    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<(), DomainError> {
        self.sessions.write().unwrap().remove(token_hash);
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut sessions = self.sessions.write().unwrap();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now));
        Ok((before - sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_note_for, test_user_named};

    #[tokio::test]
    async fn concurrent_creates_with_one_slug_keep_one_note() {
        let repo = Arc::new(InMemoryNoteRepository::new());
        let author = test_user_named("author");

        let mut handles = Vec::new();
        for i in 0..16 {
            let repo = repo.clone();
            let new_note = NewNote {
                title: format!("title {}", i),
                text: "text".to_string(),
                slug: "shared".to_string(),
                author: author.id,
            };
            handles.push(tokio::spawn(async move { repo.create(&new_note).await }));
        }

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(repo.count(), 1);
    }

    #[tokio::test]
    async fn update_to_missing_note_is_not_found() {
        let repo = InMemoryNoteRepository::new();
        let changes = NoteChanges {
            title: "t".to_string(),
            text: "t".to_string(),
            slug: "s".to_string(),
        };

        let result = repo.update(&NoteId::new(), &changes).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_rejects_taken_slug() {
        let author = test_user_named("author");
        let mine = test_note_for(&author, "mine");
        let repo = InMemoryNoteRepository::new()
            .with_note(mine.clone())
            .with_note(test_note_for(&author, "theirs"));

        let result = repo
            .update(
                &mine.id,
                &NoteChanges {
                    title: "t".to_string(),
                    text: "t".to_string(),
                    slug: "theirs".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(DomainError::DuplicateSlug(_))));
        assert_eq!(repo.get(&mine.id).unwrap().slug, "mine");
    }
}
