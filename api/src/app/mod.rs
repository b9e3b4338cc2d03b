//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities and ports.

pub mod note_service;
pub mod user_service;

pub use note_service::{NoteInput, NoteService};
pub use user_service::{SignupInput, UserService};
