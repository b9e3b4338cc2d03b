//! Note handlers
//!
//! Home, list, detail, add/edit forms, delete confirmation and the success
//! page. Everything except the home page sits behind `login_required`, so the
//! acting `User` is always present in request extensions.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Extension, Form, Json,
};
use serde::{Deserialize, Serialize};

use super::forms::{redirect, FormView};
use crate::app::NoteInput;
use crate::auth::Principal;
use crate::domain::entities::{Note, User};
use crate::error::AppError;
use crate::routes::RouteName;
use crate::AppState;

/// Submitted note form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteFormData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub slug: String,
}

impl NoteFormData {
    fn to_input(&self) -> NoteInput {
        NoteInput {
            title: self.title.clone(),
            text: self.text.clone(),
            slug: self.slug.clone(),
        }
    }
}

impl From<&Note> for NoteFormData {
    fn from(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            text: note.text.clone(),
            slug: note.slug.clone(),
        }
    }
}

/// Page URLs for one note
#[derive(Debug, Serialize)]
pub struct NoteLinks {
    pub detail: String,
    pub edit: String,
    pub delete: String,
}

impl NoteLinks {
    fn for_slug(slug: &str) -> Self {
        Self {
            detail: RouteName::NotesDetail.with_slug(slug),
            edit: RouteName::NotesEdit.with_slug(slug),
            delete: RouteName::NotesDelete.with_slug(slug),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub id: String,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author: String,
    pub created_at: String,
    pub links: NoteLinks,
}

impl NoteResponse {
    fn new(note: Note, author: &User) -> Self {
        Self {
            links: NoteLinks::for_slug(&note.slug),
            id: note.id.to_string(),
            title: note.title,
            text: note.text,
            slug: note.slug,
            author: author.username.clone(),
            created_at: note.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub page: &'static str,
    /// Username of the visitor, if signed in
    pub user: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NoteListPage {
    pub object_list: Vec<NoteResponse>,
}

#[derive(Debug, Serialize)]
pub struct NotePage {
    pub page: &'static str,
    pub note: NoteResponse,
}

#[derive(Debug, Serialize)]
pub struct SuccessPage {
    pub page: &'static str,
    pub message: &'static str,
}

fn note_form(values: NoteFormData) -> FormView<NoteFormData> {
    FormView::new("note", values)
}

/// GET /
pub async fn home(Extension(principal): Extension<Principal>) -> Json<HomePage> {
    Json(HomePage {
        page: "home",
        user: principal.user().map(|u| u.username.clone()),
    })
}

/// GET /notes/
///
/// Notes written by the signed-in user.
pub async fn list_notes(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<NoteListPage>, AppError> {
    let notes = state.note_service.list_for(&user).await?;

    Ok(Json(NoteListPage {
        object_list: notes
            .into_iter()
            .map(|n| NoteResponse::new(n, &user))
            .collect(),
    }))
}

/// GET /note/:slug/
pub async fn note_detail(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(slug): Path<String>,
) -> Result<Json<NotePage>, AppError> {
    let note = state.note_service.get_for(&user, &slug).await?;

    Ok(Json(NotePage {
        page: "detail",
        note: NoteResponse::new(note, &user),
    }))
}

/// GET /add/
pub async fn add_form() -> Response {
    note_form(NoteFormData::default()).into_response()
}

/// POST /add/
pub async fn create_note(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Form(data): Form<NoteFormData>,
) -> Result<Response, AppError> {
    match state.note_service.create(&user, &data.to_input()).await {
        Ok(_) => Ok(redirect(RouteName::NotesSuccess.path())),
        Err(e) => note_form(data).rerender_on(e),
    }
}

/// GET /edit/:slug/
pub async fn edit_form(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let note = state.note_service.get_for(&user, &slug).await?;
    Ok(note_form(NoteFormData::from(&note)).into_response())
}

/// POST /edit/:slug/
pub async fn update_note(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(slug): Path<String>,
    Form(data): Form<NoteFormData>,
) -> Result<Response, AppError> {
    match state
        .note_service
        .update(&user, &slug, &data.to_input())
        .await
    {
        Ok(_) => Ok(redirect(RouteName::NotesSuccess.path())),
        Err(e) => note_form(data).rerender_on(e),
    }
}

/// GET /delete/:slug/
///
/// Confirmation page; nothing is deleted.
pub async fn delete_confirm(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(slug): Path<String>,
) -> Result<Json<NotePage>, AppError> {
    let note = state.note_service.get_for(&user, &slug).await?;

    Ok(Json(NotePage {
        page: "delete",
        note: NoteResponse::new(note, &user),
    }))
}

/// POST or DELETE /delete/:slug/
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    state.note_service.delete(&user, &slug).await?;
    Ok(redirect(RouteName::NotesSuccess.path()))
}

/// GET /done/
pub async fn success() -> Json<SuccessPage> {
    Json(SuccessPage {
        page: "success",
        message: "Success!",
    })
}
