//! Household dependents: the people transactions can be recorded for, the
//! page for managing them, and their database operations.

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

use crate::{
    AppState, Error,
    alert::AlertTemplate,
    database_id::DatabaseId,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        edit_delete_action_links,
    },
    navigation::NavBar,
};

pub type DependentId = DatabaseId;

/// A household member that transactions and reminders can be recorded for.
#[derive(Debug, Clone, PartialEq)]
pub struct Dependent {
    pub id: DependentId,
    pub name: String,
    pub phone: Option<String>,
}

/// The form data for creating or editing a dependent.
#[derive(Debug, Clone, Deserialize)]
pub struct DependentForm {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl DependentForm {
    /// The phone number with an empty submission treated as none.
    fn normalized_phone(&self) -> Option<&str> {
        self.phone.as_deref().filter(|phone| !phone.is_empty())
    }
}

/// Create the dependent table.
pub fn create_dependent_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS dependent (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            phone TEXT
        )",
        [],
    )?;

    Ok(())
}

/// Create a new dependent.
pub fn create_dependent(form: &DependentForm, connection: &Connection) -> Result<Dependent, Error> {
    connection.execute(
        "INSERT INTO dependent (name, phone) VALUES (?1, ?2)",
        rusqlite::params![form.name, form.normalized_phone()],
    )?;

    let id = connection.last_insert_rowid();

    Ok(Dependent {
        id,
        name: form.name.clone(),
        phone: form.normalized_phone().map(str::to_owned),
    })
}

/// Retrieve a dependent by its `id`.
pub fn get_dependent(id: DependentId, connection: &Connection) -> Result<Dependent, Error> {
    connection
        .query_row(
            "SELECT id, name, phone FROM dependent WHERE id = ?1",
            [id],
            map_row,
        )
        .map_err(|error| error.into())
}

/// All dependents sorted by name.
pub fn get_all_dependents(connection: &Connection) -> Result<Vec<Dependent>, Error> {
    connection
        .prepare("SELECT id, name, phone FROM dependent ORDER BY name")?
        .query_map([], map_row)?
        .map(|maybe_dependent| maybe_dependent.map_err(|error| error.into()))
        .collect()
}

/// Overwrite a dependent's fields with the form's values.
///
/// # Errors
///
/// Returns an [Error::UpdateMissingDependent] if `id` does not refer to an
/// existing dependent.
pub fn update_dependent(
    id: DependentId,
    form: &DependentForm,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE dependent SET name = ?1, phone = ?2 WHERE id = ?3",
        rusqlite::params![form.name, form.normalized_phone(), id],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingDependent);
    }

    Ok(())
}

/// Delete a dependent by its `id`. Transactions recorded for the dependent
/// keep their rows with the link cleared.
///
/// # Errors
///
/// Returns an [Error::DeleteMissingDependent] if `id` does not refer to an
/// existing dependent.
pub fn delete_dependent(id: DependentId, connection: &Connection) -> Result<(), Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    sql_transaction.execute(
        "UPDATE \"transaction\" SET dependent_id = NULL WHERE dependent_id = ?1",
        [id],
    )?;
    let rows_affected = sql_transaction.execute("DELETE FROM dependent WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingDependent);
    }

    sql_transaction.commit()?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Dependent, rusqlite::Error> {
    Ok(Dependent {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
    })
}

/// The state needed for the dependents page.
#[derive(Debug, Clone)]
pub struct DependentsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DependentsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the dependents page: an inline create form above the list.
pub async fn get_dependents_page(
    State(state): State<DependentsPageState>,
) -> Result<Response, Error> {
    let dependents = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_dependents(&connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve dependents: {error}"))?
    };

    Ok(dependents_view(&dependents).into_response())
}

fn dependent_form_fields(name: &str, phone: Option<&str>) -> Markup {
    html! {
        div
        {
            label for="name" class=(FORM_LABEL_STYLE) { "Name" }

            input
                id="name"
                type="text"
                name="name"
                placeholder="Name"
                value=(name)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="phone" class=(FORM_LABEL_STYLE) { "Phone (optional)" }

            input
                id="phone"
                type="tel"
                name="phone"
                placeholder="Phone number"
                value=[phone]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

fn dependents_view(dependents: &[Dependent]) -> Markup {
    let nav_bar = NavBar::new(endpoints::DEPENDENTS_VIEW).into_html();

    let table_row = |dependent: &Dependent| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_DEPENDENT_VIEW, dependent.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_DEPENDENT, dependent.id);
        let confirm_message = format!("Are you sure you want to delete '{}'?", dependent.name);

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (dependent.name) }

                td class=(TABLE_CELL_STYLE)
                {
                    @if let Some(phone) = &dependent.phone {
                        (phone)
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &edit_url,
                            &delete_url,
                            &confirm_message,
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 lg:max-w-5xl lg:w-full lg:mx-auto"
            {
                h1 class="text-xl font-bold" { "Dependents" }

                form
                    hx-post=(endpoints::POST_DEPENDENT)
                    hx-target-error="#alert-container"
                    class="space-y-4"
                {
                    (dependent_form_fields("", None))

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Dependent" }
                }

                table class="w-full text-sm text-left rtl:text-right
                    text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Phone" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for dependent in dependents {
                            (table_row(dependent))
                        }

                        @if dependents.is_empty() {
                            tr
                            {
                                td
                                    colspan="3"
                                    class="px-6 py-4 text-center
                                        text-gray-500 dark:text-gray-400"
                                {
                                    "No dependents added yet."
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Dependents", &[], &content)
}

/// The state needed to create a dependent.
#[derive(Debug, Clone)]
pub struct CreateDependentState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateDependentState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new dependent. Redirects back to the
/// dependents view on success.
pub async fn create_dependent_endpoint(
    State(state): State<CreateDependentState>,
    Form(form): Form<DependentForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_dependent(&form, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::DEPENDENTS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not create dependent with {form:?}: {error}");
            error.into_alert_response()
        }
    }
}

/// The state needed for the edit dependent page.
#[derive(Debug, Clone)]
pub struct EditDependentPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditDependentPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for editing a dependent.
pub async fn get_edit_dependent_page(
    Path(dependent_id): Path<DependentId>,
    State(state): State<EditDependentPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let dependent = get_dependent(dependent_id, &connection).inspect_err(|error| {
        tracing::error!("Failed to retrieve dependent {dependent_id}: {error}")
    })?;

    Ok(edit_dependent_view(&dependent).into_response())
}

fn edit_dependent_view(dependent: &Dependent) -> Markup {
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_DEPENDENT_VIEW, dependent.id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_DEPENDENT, dependent.id);
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
                (dependent_form_fields(&dependent.name, dependent.phone.as_deref()))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Dependent" }
            }
        }
    };

    base("Edit Dependent", &[], &content)
}

/// The state needed to update a dependent.
#[derive(Debug, Clone)]
pub struct EditDependentState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditDependentState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating a dependent. Redirects to the dependents
/// view on success.
pub async fn edit_dependent_endpoint(
    Path(dependent_id): Path<DependentId>,
    State(state): State<EditDependentState>,
    Form(form): Form<DependentForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_dependent(dependent_id, &form, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::DEPENDENTS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingDependent) => Error::UpdateMissingDependent.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not update dependent {dependent_id} with {form:?}: {error}");
            error.into_alert_response()
        }
    }
}

/// The state needed to delete a dependent.
#[derive(Debug, Clone)]
pub struct DeleteDependentState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteDependentState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a dependent.
pub async fn delete_dependent_endpoint(
    Path(dependent_id): Path<DependentId>,
    State(state): State<DeleteDependentState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_dependent(dependent_id, &connection) {
        Ok(()) => AlertTemplate::success("Dependent deleted successfully", "")
            .into_markup()
            .into_response(),
        Err(Error::DeleteMissingDependent) => Error::DeleteMissingDependent.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete dependent {dependent_id}: {error}");
            error.into_alert_response()
        }
    }
}


#[cfg(test)]
mod dependent_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        endpoints,
        test_utils::{assert_hx_redirect, assert_valid_html, parse_html_document},
    };

    use super::{
        CreateDependentState, DeleteDependentState, DependentForm, DependentsPageState,
        create_dependent, create_dependent_endpoint, delete_dependent_endpoint,
        get_all_dependents, get_dependents_page,
    };

    fn get_db_connection() -> Arc<Mutex<Connection>> {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");
        Arc::new(Mutex::new(connection))
    }

    #[tokio::test]
    async fn creates_dependent_and_redirects() {
        let db_connection = get_db_connection();
        let state = CreateDependentState {
            db_connection: db_connection.clone(),
        };

        let response = create_dependent_endpoint(
            State(state),
            Form(DependentForm {
                name: "Ana".to_string(),
                phone: None,
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DEPENDENTS_VIEW);
        assert_eq!(
            get_all_dependents(&db_connection.lock().unwrap())
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn page_lists_dependents() {
        let db_connection = get_db_connection();
        create_dependent(
            &DependentForm {
                name: "Ana".to_string(),
                phone: Some("555-0100".to_string()),
            },
            &db_connection.lock().unwrap(),
        )
        .expect("Could not create test dependent");

        let response = get_dependents_page(State(DependentsPageState { db_connection }))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let text = html.html();
        assert!(text.contains("Ana"));
        assert!(text.contains("555-0100"));
    }

    #[tokio::test]
    async fn delete_missing_dependent_returns_not_found() {
        let state = DeleteDependentState {
            db_connection: get_db_connection(),
        };

        let response = delete_dependent_endpoint(Path(999), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
