//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::Utc;

use crate::app::user_service::hash_password_for_tests;
use crate::domain::entities::{Note, NoteId, User, UserId};

pub const TEST_PASSWORD: &str = "test-password";
pub const TEST_SECRET_KEY: &str = "test-secret-key";

/// Create a test user with a specific name and password `TEST_PASSWORD`
pub fn test_user_named(username: &str) -> User {
    User {
        id: UserId::new(),
        username: username.to_string(),
        password_hash: hash_password_for_tests(TEST_PASSWORD, TEST_SECRET_KEY),
        created_at: Utc::now(),
    }
}

/// Create a test note owned by `author`
pub fn test_note_for(author: &User, slug: &str) -> Note {
    Note {
        id: NoteId::new(),
        title: "Заголовок".to_string(),
        text: "Текст".to_string(),
        slug: slug.to_string(),
        author: author.id,
        created_at: Utc::now(),
    }
}
