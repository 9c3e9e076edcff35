//! The page for creating an account.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    AppState, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        dollar_input_styles,
    },
    navigation::NavBar,
    timezone::today,
};

/// The state needed for the create account page.
#[derive(Debug, Clone)]
pub struct CreateAccountPageState {
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateAccountPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the page for creating an account.
pub async fn get_create_account_page(State(state): State<CreateAccountPageState>) -> Response {
    let max_date = today(&state.local_timezone);

    create_account_view(max_date).into_response()
}

fn create_account_view(max_date: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_ACCOUNT_VIEW).into_html();

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_ACCOUNT)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (account_form_fields("", 0.0, max_date, max_date))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Account" }
            }
        }
    };

    base("Create Account", &[dollar_input_styles()], &content)
}

/// The name, balance and date inputs shared by the create and edit account forms.
pub(super) fn account_form_fields(name: &str, balance: f64, date: Date, max_date: Date) -> Markup {
    html! {
        div
        {
            label for="name" class=(FORM_LABEL_STYLE) { "Account Name" }

            input
                id="name"
                type="text"
                name="name"
                placeholder="Account Name"
                value=(name)
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="balance" class=(FORM_LABEL_STYLE) { "Balance" }

            div class="input-wrapper w-full"
            {
                input
                    id="balance"
                    type="number"
                    name="balance"
                    step="0.01"
                    value=(balance)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                id="date"
                type="date"
                name="date"
                value=(date)
                max=(max_date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
