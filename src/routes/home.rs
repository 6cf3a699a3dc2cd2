//! Home page - the ten most recent live snippets.

use axum::extract::State;
use axum::response::Html;
use axum_extra::extract::SignedCookieJar;

use crate::error::AppError;
use crate::state::AppState;
use crate::templates::TemplateData;

/// `GET /`
pub async fn home(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Html<String>), AppError> {
    let snippets = state.store.latest()?;

    let data = TemplateData {
        snippets: Some(snippets),
        ..Default::default()
    };
    super::render_page(&state, jar, "home", data)
}
