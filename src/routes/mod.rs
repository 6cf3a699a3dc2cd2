//! Route definitions and router assembly.
//!
//! ## Routes
//!
//! - `GET /` - Latest snippets
//! - `GET /snippet/create` - New snippet form
//! - `POST /snippet/create` - Submit a new snippet
//! - `GET /snippet/{id}` - View one snippet
//! - `GET /static/*` - Static assets (bypasses the flash/session layer)
//!
//! The literal `/snippet/create` route wins over the dynamic
//! `/snippet/{id}` pattern regardless of registration order, so "create"
//! is never misparsed as an id. A known path with the wrong method gets a
//! 405 with an `Allow` header; an unknown path gets a 404.

mod home;
mod snippet;

use axum::Router;
use axum::response::Html;
use axum::routing::get;
use axum_extra::extract::SignedCookieJar;
use chrono::{Datelike, Utc};
use tower_http::services::ServeDir;

use crate::error::AppError;
use crate::flash;
use crate::middleware;
use crate::state::AppState;
use crate::templates::TemplateData;

/// Build the complete application router, wrapped in the standard
/// middleware chain.
pub fn router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/", get(home::home))
        .route(
            "/snippet/create",
            get(snippet::create_form).post(snippet::create_submit),
        )
        .route("/snippet/{id}", get(snippet::show))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
        // Standard chain. Layers wrap bottom-up: security headers sit
        // closest to the router, request logging outside them, and the
        // panic recovery boundary outermost so no inner layer's partial
        // output can leak past it.
        .layer(axum::middleware::from_fn(middleware::secure_headers))
        .layer(axum::middleware::from_fn(middleware::log_request))
        .layer(middleware::recover_panic())
}

/// Render a cached page with the default data every HTML response carries:
/// the current year and the pending flash message, consumed read-once.
///
/// The returned jar carries the flash removal and must travel with the
/// response.
pub(crate) fn render_page(
    state: &AppState,
    jar: SignedCookieJar,
    page: &str,
    mut data: TemplateData,
) -> Result<(SignedCookieJar, Html<String>), AppError> {
    let (jar, pending) = flash::pop(jar);
    data.current_year = Utc::now().year();
    data.flash = pending;

    let html = state.templates.render(page, &data)?;
    Ok((jar, Html(html)))
}
