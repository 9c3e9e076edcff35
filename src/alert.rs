//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered into the `#alert-container` element via an HTMX
//! out-of-band swap so that any endpoint can surface a message without
//! re-rendering the page.

use maud::{Markup, html};

/// Alert message types for styling
#[derive(Debug, Clone, PartialEq)]
pub enum AlertType {
    Success,
    Error,
}

/// Renders alert messages with appropriate styling
#[derive(Debug, Clone)]
pub struct AlertTemplate {
    pub alert_type: AlertType,
    pub message: String,
    pub details: String,
}

impl AlertTemplate {
    /// Create a new success alert
    pub fn success(message: &str, details: &str) -> Self {
        Self {
            alert_type: AlertType::Success,
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Create a new error alert
    pub fn error(message: &str, details: &str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Create a new error alert without details
    pub fn error_simple(message: &str) -> Self {
        Self::error(message, "")
    }

    /// Render the alert as markup targeting the alert container.
    pub fn into_markup(self) -> Markup {
        let (container_style, icon) = match self.alert_type {
            AlertType::Success => (
                "flex items-start gap-3 w-full p-4 mb-4 rounded-lg shadow \
                text-green-800 bg-green-50 dark:bg-gray-800 dark:text-green-400",
                "✓",
            ),
            AlertType::Error => (
                "flex items-start gap-3 w-full p-4 mb-4 rounded-lg shadow \
                text-red-800 bg-red-50 dark:bg-gray-800 dark:text-red-400",
                "✗",
            ),
        };

        html!(
            div id="alert-container" hx-swap-oob="true" class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(container_style) role="alert"
                {
                    span class="text-lg font-bold" aria-hidden="true" { (icon) }

                    div class="flex-1 text-sm"
                    {
                        p class="font-semibold" { (self.message) }

                        @if !self.details.is_empty()
                        {
                            p { (self.details) }
                        }
                    }

                    button
                        type="button"
                        class="ms-auto -mx-1.5 -my-1.5 rounded-lg p-1.5 inline-flex items-center justify-center h-8 w-8 hover:bg-gray-100 dark:hover:bg-gray-700"
                        aria-label="Close"
                        onclick="this.closest('#alert-container').classList.add('hidden')"
                    {
                        "×"
                    }
                }
            }
        )
    }
}
