//! PostgreSQL adapter for NoteRepository
//!
//! Slug uniqueness is enforced by the unique index on `notes.slug`; a
//! violation is reported as `DuplicateSlug` and the statement persists
//! nothing.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use crate::domain::entities::{NewNote, Note, NoteChanges, NoteId, UserId};
use crate::domain::ports::NoteRepository;
use crate::entity::notes;
use crate::error::DomainError;

/// PostgreSQL implementation of NoteRepository
pub struct PostgresNoteRepository {
    db: DatabaseConnection,
}

impl PostgresNoteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn write_error(e: DbErr, slug: &str) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::DuplicateSlug(slug.to_string()),
        _ => DomainError::Database(e.to_string()),
    }
}

#[async_trait]
impl NoteRepository for PostgresNoteRepository {
    async fn create(&self, note: &NewNote) -> Result<Note, DomainError> {
        let model = notes::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(note.title.clone()),
            text: Set(note.text.clone()),
            slug: Set(note.slug.clone()),
            author_id: Set(note.author.0),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, &note.slug))?;

        Ok(result.into())
    }

    async fn update(&self, id: &NoteId, changes: &NoteChanges) -> Result<Note, DomainError> {
        let result = notes::ActiveModel {
            id: Set(id.0),
            title: Set(changes.title.clone()),
            text: Set(changes.text.clone()),
            slug: Set(changes.slug.clone()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotUpdated => DomainError::NotFound(format!("Note {} not found", id)),
            e => write_error(e, &changes.slug),
        })?;

        Ok(result.into())
    }

    async fn delete(&self, id: &NoteId) -> Result<(), DomainError> {
        let result = notes::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(format!("Note {} not found", id)));
        }
        Ok(())
    }

    async fn list_for(&self, author: &UserId) -> Result<Vec<Note>, DomainError> {
        let results = notes::Entity::find()
            .filter(notes::Column::AuthorId.eq(author.0))
            .order_by_asc(notes::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn get_for(&self, author: &UserId, slug: &str) -> Result<Option<Note>, DomainError> {
        let result = notes::Entity::find()
            .filter(notes::Column::Slug.eq(slug))
            .filter(notes::Column::AuthorId.eq(author.0))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Note>, DomainError> {
        let result = notes::Entity::find()
            .filter(notes::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }
}

/// Convert SeaORM model to domain entity
impl From<notes::Model> for Note {
    fn from(model: notes::Model) -> Self {
        Note {
            id: NoteId(model.id),
            title: model.title,
            text: model.text,
            slug: model.slug,
            author: UserId(model.author_id),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
