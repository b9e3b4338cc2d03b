//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod note_repo;
pub mod session_repo;
pub mod user_repo;


pub use note_repo::PostgresNoteRepository;
pub use session_repo::PostgresSessionRepository;
pub use user_repo::PostgresUserRepository;
