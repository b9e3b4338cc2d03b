//! HTTP handlers
//!
//! Axum request handlers for the note and account pages.

pub mod forms;
pub mod notes;
pub mod users;

pub use notes::{
    add_form, create_note, delete_confirm, delete_note, edit_form, home, list_notes, note_detail,
    success, update_note,
};
pub use users::{login, login_form, logout, signup, signup_form};
