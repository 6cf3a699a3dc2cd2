//! Snippet pages: view one, show the create form, handle a submission.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::SignedCookieJar;

use crate::error::AppError;
use crate::flash;
use crate::forms::Form;
use crate::state::AppState;
use crate::templates::TemplateData;

/// Permitted values for the expires field, in days.
const EXPIRES_OPTIONS: &[&str] = &["365", "7", "1"];

/// `GET /snippet/{id}`
///
/// The id must be a positive integer; anything else is a 404 before the
/// store is ever touched.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Html<String>), AppError> {
    let id: i64 = match id.parse() {
        Ok(n) if n >= 1 => n,
        _ => return Err(AppError::NotFound),
    };

    let snippet = state.store.get(id)?;

    let data = TemplateData {
        snippet: Some(snippet),
        ..Default::default()
    };
    super::render_page(&state, jar, "show", data)
}

/// `GET /snippet/create` - an empty, error-free form.
pub async fn create_form(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Html<String>), AppError> {
    let data = TemplateData {
        form: Some(Form::default()),
        ..Default::default()
    };
    super::render_page(&state, jar, "create", data)
}

/// `POST /snippet/create`
///
/// A malformed submission (wrong content type or an undecodable payload)
/// is a 400. A payload failing validation re-renders the form as a 200
/// with prior input and messages. A valid payload inserts the snippet,
/// sets the success flash and redirects (303) to the new snippet's page.
pub async fn create_submit(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    if !content_type.starts_with("application/x-www-form-urlencoded") {
        return Err(AppError::BadRequest(format!(
            "unsupported form content type {content_type:?}"
        )));
    }

    let body = std::str::from_utf8(&body)
        .map_err(|e| AppError::BadRequest(format!("form payload is not valid UTF-8: {e}")))?;
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(body)
        .map_err(|e| AppError::BadRequest(format!("undecodable form payload: {e}")))?;

    let mut form = Form::new(pairs);
    form.required(&["title", "content", "expires"]);
    form.max_length("title", 100);
    form.permitted_values("expires", EXPIRES_OPTIONS);

    if !form.is_valid() {
        let data = TemplateData {
            form: Some(form),
            ..Default::default()
        };
        let page = super::render_page(&state, jar, "create", data)?;
        return Ok(page.into_response());
    }

    let expires_days: i64 = form
        .get("expires")
        .parse()
        .map_err(|_| AppError::BadRequest("expires must be a number of days".to_string()))?;

    let id = state
        .store
        .insert(form.get("title"), form.get("content"), expires_days)?;

    let jar = flash::set(jar, "Snippet successfully created!");
    Ok((jar, Redirect::to(&format!("/snippet/{id}"))).into_response())
}
