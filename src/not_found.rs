//! The route handler and response for pages that do not exist.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

pub fn get_404_not_found_response() -> Response {
    let page = error_view(
        "Not Found",
        "404",
        "Page not found.",
        "Sorry, we couldn't find that page. Check the address for typos.",
    );

    (StatusCode::NOT_FOUND, Html(page.into_string())).into_response()
}
