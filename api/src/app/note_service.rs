//! Note service
//!
//! Note lifecycle for a signed-in user: validation of submitted fields,
//! slug derivation, and the author-only view of the note store.

use std::sync::Arc;

use crate::domain::entities::{
    NewNote, Note, NoteChanges, User, MAX_SLUG_LENGTH, MAX_TITLE_LENGTH,
};
use crate::domain::ports::NoteRepository;
use crate::domain::slug::{is_valid_slug, slugify_truncated};
use crate::error::{AppError, DomainError};

/// Raw note fields as submitted by a client
#[derive(Debug, Clone, Default)]
pub struct NoteInput {
    pub title: String,
    pub text: String,
    /// Empty means "derive from the title"
    pub slug: String,
}

/// Checked fields, slug resolved
#[derive(Debug, Clone, PartialEq, Eq)]
struct ValidNote {
    title: String,
    text: String,
    slug: String,
}

impl NoteInput {
    fn validate(&self) -> Result<ValidNote, DomainError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DomainError::invalid("title", "This field is required."));
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(DomainError::invalid(
                "title",
                format!("Ensure this value has at most {} characters.", MAX_TITLE_LENGTH),
            ));
        }

        if self.text.trim().is_empty() {
            return Err(DomainError::invalid("text", "This field is required."));
        }

        let slug = match self.slug.trim() {
            "" => {
                let derived = slugify_truncated(title);
                if derived.is_empty() {
                    return Err(DomainError::invalid(
                        "slug",
                        "Could not derive a slug from the title, enter one explicitly.",
                    ));
                }
                derived
            }
            given => {
                if given.len() > MAX_SLUG_LENGTH {
                    return Err(DomainError::invalid(
                        "slug",
                        format!("Ensure this value has at most {} characters.", MAX_SLUG_LENGTH),
                    ));
                }
                if !is_valid_slug(given) {
                    return Err(DomainError::invalid(
                        "slug",
                        "Use only latin letters, digits, underscores or hyphens.",
                    ));
                }
                given.to_string()
            }
        };

        Ok(ValidNote {
            title: title.to_string(),
            text: self.text.clone(),
            slug,
        })
    }
}

/// Service for managing notes
pub struct NoteService<NR>
where
    NR: NoteRepository + ?Sized,
{
    notes: Arc<NR>,
}

impl<NR> NoteService<NR>
where
    NR: NoteRepository + ?Sized,
{
    pub fn new(notes: Arc<NR>) -> Self {
        Self { notes }
    }

    /// Create a note owned by `author`
    pub async fn create(&self, author: &User, input: &NoteInput) -> Result<Note, AppError> {
        let valid = input.validate()?;

        if self.notes.find_by_slug(&valid.slug).await?.is_some() {
            return Err(DomainError::DuplicateSlug(valid.slug).into());
        }

        let note = self
            .notes
            .create(&NewNote {
                title: valid.title,
                text: valid.text,
                slug: valid.slug,
                author: author.id,
            })
            .await?;

        tracing::info!(note_id = %note.id, slug = %note.slug, author = %author.id, "Note created");
        Ok(note)
    }

    /// Replace the fields of one of `user`'s notes
    pub async fn update(
        &self,
        user: &User,
        slug: &str,
        input: &NoteInput,
    ) -> Result<Note, AppError> {
        let note = self.get_for(user, slug).await?;
        let valid = input.validate()?;

        if let Some(holder) = self.notes.find_by_slug(&valid.slug).await? {
            if holder.id != note.id {
                return Err(DomainError::DuplicateSlug(valid.slug).into());
            }
        }

        let updated = self
            .notes
            .update(
                &note.id,
                &NoteChanges {
                    title: valid.title,
                    text: valid.text,
                    slug: valid.slug,
                },
            )
            .await?;

        tracing::info!(note_id = %updated.id, slug = %updated.slug, "Note updated");
        Ok(updated)
    }

    /// Delete one of `user`'s notes
    pub async fn delete(&self, user: &User, slug: &str) -> Result<(), AppError> {
        let note = self.get_for(user, slug).await?;
        self.notes.delete(&note.id).await?;

        tracing::info!(note_id = %note.id, slug = %note.slug, "Note deleted");
        Ok(())
    }

    /// Every note written by `user`
    pub async fn list_for(&self, user: &User) -> Result<Vec<Note>, AppError> {
        Ok(self.notes.list_for(&user.id).await?)
    }

    /// Look up a note by slug as seen by `user`.
    ///
    /// Someone else's note is reported exactly like a missing one.
    pub async fn get_for(&self, user: &User, slug: &str) -> Result<Note, AppError> {
        self.notes
            .get_for(&user.id, slug)
            .await?
            .filter(|note| note.is_authored_by(&user.id))
            .ok_or_else(|| DomainError::NotFound(format!("Note {}", slug)).into())
    }
}
