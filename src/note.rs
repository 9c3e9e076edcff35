//! Free-form notes: reminders and receipts that do not fit a transaction,
//! with pages for listing, creating and editing them.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::{Connection, Row};
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    alert::AlertTemplate,
    database_id::DatabaseId,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, base, edit_delete_action_links,
    },
    navigation::NavBar,
    timezone::today,
};

pub type NoteId = DatabaseId;

/// A dated, free-form note.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub body: String,
    pub date: Date,
}

/// The form data for creating or editing a note.
#[derive(Debug, Clone, Deserialize)]
pub struct NoteForm {
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub date: Date,
}

/// Create the note table.
pub fn create_note_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS note (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            body TEXT NOT NULL,
            date TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

/// Create a new note.
pub fn create_note(form: &NoteForm, connection: &Connection) -> Result<Note, Error> {
    connection.execute(
        "INSERT INTO note (title, body, date) VALUES (?1, ?2, ?3)",
        rusqlite::params![form.title, form.body, form.date],
    )?;

    let id = connection.last_insert_rowid();

    Ok(Note {
        id,
        title: form.title.clone(),
        body: form.body.clone(),
        date: form.date,
    })
}

/// Retrieve a note by its `id`.
pub fn get_note(id: NoteId, connection: &Connection) -> Result<Note, Error> {
    connection
        .query_row(
            "SELECT id, title, body, date FROM note WHERE id = ?1",
            [id],
            map_row,
        )
        .map_err(|error| error.into())
}

/// All notes, most recent first.
pub fn get_all_notes(connection: &Connection) -> Result<Vec<Note>, Error> {
    connection
        .prepare("SELECT id, title, body, date FROM note ORDER BY date DESC, id DESC")?
        .query_map([], map_row)?
        .map(|maybe_note| maybe_note.map_err(|error| error.into()))
        .collect()
}

/// Overwrite a note's fields with the form's values.
///
/// # Errors
///
/// Returns an [Error::UpdateMissingNote] if `id` does not refer to an
/// existing note.
pub fn update_note(id: NoteId, form: &NoteForm, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE note SET title = ?1, body = ?2, date = ?3 WHERE id = ?4",
        rusqlite::params![form.title, form.body, form.date, id],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingNote);
    }

    Ok(())
}

/// Delete a note by its `id`.
///
/// # Errors
///
/// Returns an [Error::DeleteMissingNote] if `id` does not refer to an
/// existing note.
pub fn delete_note(id: NoteId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM note WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingNote);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Note, rusqlite::Error> {
    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        body: row.get(2)?,
        date: row.get(3)?,
    })
}

/// The state needed for the notes page.
#[derive(Debug, Clone)]
pub struct NotesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for NotesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the notes page.
pub async fn get_notes_page(State(state): State<NotesPageState>) -> Result<Response, Error> {
    let notes = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_notes(&connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve notes: {error}"))?
    };

    Ok(notes_view(&notes).into_response())
}

fn note_card(note: &Note) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_NOTE_VIEW, note.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_NOTE, note.id);
    let confirm_message = format!("Are you sure you want to delete '{}'?", note.title);

    html!(
        article class="p-4 bg-white border border-gray-200 rounded-lg shadow-sm
            dark:bg-gray-800 dark:border-gray-700 space-y-2"
        {
            div class="flex items-baseline justify-between"
            {
                h2 class="text-lg font-semibold" { (note.title) }

                span class="text-sm text-gray-500 dark:text-gray-400" { (note.date) }
            }

            p class="text-sm text-gray-700 dark:text-gray-300 whitespace-pre-line"
            {
                (note.body)
            }

            div class="flex gap-4"
            {
                (edit_delete_action_links(
                    &edit_url,
                    &delete_url,
                    &confirm_message,
                    "closest article",
                    "delete",
                ))
            }
        }
    )
}

fn notes_view(notes: &[Note]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NOTES_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 lg:max-w-3xl lg:w-full lg:mx-auto"
            {
                div class="flex items-baseline justify-between"
                {
                    h1 class="text-xl font-bold" { "Notes" }

                    a href=(endpoints::NEW_NOTE_VIEW) class=(LINK_STYLE) { "New Note" }
                }

                @for note in notes {
                    (note_card(note))
                }

                @if notes.is_empty() {
                    p class="text-center text-gray-500 dark:text-gray-400"
                    {
                        "No notes written yet."
                    }
                }
            }
        }
    );

    base("Notes", &[], &content)
}

fn note_form_fields(title: &str, body: &str, date: Date) -> Markup {
    html! {
        div
        {
            label for="title" class=(FORM_LABEL_STYLE) { "Title" }

            input
                id="title"
                type="text"
                name="title"
                placeholder="Title"
                value=(title)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                id="date"
                type="date"
                name="date"
                value=(date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="body" class=(FORM_LABEL_STYLE) { "Note" }

            textarea
                id="body"
                name="body"
                rows="6"
                placeholder="Write your note here..."
                class=(FORM_TEXT_INPUT_STYLE)
            {
                (body)
            }
        }
    }
}

/// The state needed for the create note page.
#[derive(Debug, Clone)]
pub struct CreateNotePageState {
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateNotePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the page for creating a note. The date defaults to today.
pub async fn get_create_note_page(State(state): State<CreateNotePageState>) -> Response {
    let nav_bar = NavBar::new(endpoints::NEW_NOTE_VIEW).into_html();

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_NOTE)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (note_form_fields("", "", today(&state.local_timezone)))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Note" }
            }
        }
    };

    base("New Note", &[], &content).into_response()
}

/// The state needed to create a note.
#[derive(Debug, Clone)]
pub struct CreateNoteState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateNoteState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new note. Redirects to the notes view on
/// success.
pub async fn create_note_endpoint(
    State(state): State<CreateNoteState>,
    Form(form): Form<NoteForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_note(&form, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::NOTES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not create note with {form:?}: {error}");
            error.into_alert_response()
        }
    }
}

/// The state needed for the edit note page.
#[derive(Debug, Clone)]
pub struct EditNotePageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditNotePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for editing a note.
pub async fn get_edit_note_page(
    Path(note_id): Path<NoteId>,
    State(state): State<EditNotePageState>,
) -> Result<Response, Error> {
    let note = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_note(note_id, &connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve note {note_id}: {error}"))?
    };

    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_NOTE_VIEW, note.id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_NOTE, note.id);
    let nav_bar = NavBar::new(&edit_endpoint).into_html();

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_endpoint)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (note_form_fields(&note.title, &note.body, note.date))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Note" }
            }
        }
    };

    Ok(base("Edit Note", &[], &content).into_response())
}

/// The state needed to update a note.
#[derive(Debug, Clone)]
pub struct EditNoteState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditNoteState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating a note. Redirects to the notes view on
/// success.
pub async fn edit_note_endpoint(
    Path(note_id): Path<NoteId>,
    State(state): State<EditNoteState>,
    Form(form): Form<NoteForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_note(note_id, &form, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::NOTES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingNote) => Error::UpdateMissingNote.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not update note {note_id} with {form:?}: {error}");
            error.into_alert_response()
        }
    }
}

/// The state needed to delete a note.
#[derive(Debug, Clone)]
pub struct DeleteNoteState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteNoteState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a note.
pub async fn delete_note_endpoint(
    Path(note_id): Path<NoteId>,
    State(state): State<DeleteNoteState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_note(note_id, &connection) {
        Ok(()) => AlertTemplate::success("Note deleted successfully", "")
            .into_markup()
            .into_response(),
        Err(Error::DeleteMissingNote) => Error::DeleteMissingNote.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete note {note_id}: {error}");
            error.into_alert_response()
        }
    }
}


#[cfg(test)]
mod note_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        endpoints,
        test_utils::{assert_hx_redirect, assert_valid_html, parse_html_document},
    };

    use super::{
        CreateNoteState, DeleteNoteState, NoteForm, NotesPageState, create_note,
        create_note_endpoint, delete_note_endpoint, get_all_notes, get_notes_page,
    };

    fn get_db_connection() -> Arc<Mutex<Connection>> {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");
        Arc::new(Mutex::new(connection))
    }

    #[tokio::test]
    async fn creates_note_and_redirects() {
        let db_connection = get_db_connection();
        let state = CreateNoteState {
            db_connection: db_connection.clone(),
        };

        let response = create_note_endpoint(
            State(state),
            Form(NoteForm {
                title: "Warranty".to_string(),
                body: "Fridge warranty expires next June.".to_string(),
                date: date!(2024 - 06 - 01),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::NOTES_VIEW);
        assert_eq!(
            get_all_notes(&db_connection.lock().unwrap()).unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn page_lists_notes() {
        let db_connection = get_db_connection();
        create_note(
            &NoteForm {
                title: "Warranty".to_string(),
                body: "Fridge warranty expires next June.".to_string(),
                date: date!(2024 - 06 - 01),
            },
            &db_connection.lock().unwrap(),
        )
        .expect("Could not create test note");

        let response = get_notes_page(State(NotesPageState { db_connection }))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let text = html.html();
        assert!(text.contains("Warranty"));
        assert!(text.contains("Fridge warranty expires next June."));
    }

    #[tokio::test]
    async fn delete_missing_note_returns_not_found() {
        let state = DeleteNoteState {
            db_connection: get_db_connection(),
        };

        let response = delete_note_endpoint(Path(999), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
