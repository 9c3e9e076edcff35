//! Cookie based authentication for the single-user app.

pub(crate) mod cookie;
mod middleware;
mod redirect;

pub use middleware::{auth_guard, auth_guard_hx};
pub(crate) use cookie::{invalidate_auth_cookie, set_auth_cookie};
pub(crate) use redirect::normalize_redirect_url;

#[cfg(test)]
pub use middleware::AuthState;
