use axum::{
    body::Body,
    extract::{Path, State},
    http::{
        header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE, SET_COOKIE},
        HeaderValue,
    },
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::export::{render_profile, ProfileExport};
use crate::search::client::{SearchError, SearchQuery};
use crate::search::session::VisitorSession;
use crate::state::AppState;
use crate::view::search::search_page;

/// Form body of `POST /search`.
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub job_description: String,
}

impl SearchForm {
    fn into_query(self) -> Result<SearchQuery, AppError> {
        if self.job_title.trim().is_empty() || self.job_description.trim().is_empty() {
            return Err(AppError::Validation(
                "Job title and job description are both required.".to_string(),
            ));
        }
        Ok(SearchQuery {
            job_title: self.job_title,
            job_description: self.job_description,
        })
    }
}

/// Attaches the session cookie when the visitor's id was minted on this request.
fn with_cookie(visitor: VisitorSession, response: impl IntoResponse) -> Response {
    let mut response = response.into_response();
    if let Some(cookie) = visitor.set_cookie() {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => warn!("Invalid session cookie header: {e}"),
        }
    }
    response
}

fn no_candidate(index: usize) -> AppError {
    AppError::NotFound(format!("No candidate at position {index} in the current results"))
}

/// GET /search
pub async fn handle_search_page(
    State(state): State<AppState>,
    visitor: VisitorSession,
) -> Response {
    let session = state.sessions.snapshot(visitor.id).await;
    with_cookie(visitor, Html(search_page(&session)))
}

/// POST /search
///
/// Starts the search and redirects back to the page. The outbound call runs on
/// its own task; the page shows the loading state until it settles.
pub async fn handle_search_submit(
    State(state): State<AppState>,
    visitor: VisitorSession,
    Form(form): Form<SearchForm>,
) -> Result<Response, AppError> {
    let query = form.into_query()?;
    let ticket = state
        .sessions
        .update(visitor.id, |session| session.begin(&query))
        .await;

    info!(session = %visitor.id, job_title = %query.job_title, "Search started");

    let sessions = state.sessions.clone();
    let matcher = state.matcher.clone();
    let id = visitor.id;
    tokio::spawn(async move {
        let outcome = matcher.find_candidates(&query).await;
        match &outcome {
            Ok(candidates) => info!(session = %id, count = candidates.len(), "Search finished"),
            Err(SearchError::Status { code, .. }) => {
                warn!(session = %id, status = code, "Search failed with error status")
            }
            Err(e) => warn!(session = %id, "Search failed: {e}"),
        }
        if sessions
            .modify(id, |session| session.complete(ticket, outcome))
            .await
            .is_none()
        {
            debug!(session = %id, "Session evicted before the search finished");
        }
    });

    Ok(with_cookie(visitor, Redirect::to("/search")))
}

/// GET /search/candidates/:index
pub async fn handle_open_candidate(
    State(state): State<AppState>,
    visitor: VisitorSession,
    Path(index): Path<usize>,
) -> Result<Response, AppError> {
    let session = state
        .sessions
        .modify(visitor.id, |session| {
            session.open(index)?;
            Some(session.clone())
        })
        .await
        .flatten()
        .ok_or_else(|| no_candidate(index))?;
    Ok(with_cookie(visitor, Html(search_page(&session))))
}

/// GET /search/candidates/:index/preview
pub async fn handle_preview_candidate(
    State(state): State<AppState>,
    visitor: VisitorSession,
    Path(index): Path<usize>,
) -> Result<Response, AppError> {
    let session = state
        .sessions
        .modify(visitor.id, |session| {
            session.show_preview(index)?;
            Some(session.clone())
        })
        .await
        .flatten()
        .ok_or_else(|| no_candidate(index))?;
    Ok(with_cookie(visitor, Html(search_page(&session))))
}

/// GET /search/candidates/:index/close
pub async fn handle_close_candidate(
    State(state): State<AppState>,
    visitor: VisitorSession,
    Path(_index): Path<usize>,
) -> Response {
    state.sessions.modify(visitor.id, |session| session.close()).await;
    with_cookie(visitor, Redirect::to("/search"))
}

/// GET /search/candidates/:index/profile.pdf
pub async fn handle_download_pdf(
    State(state): State<AppState>,
    visitor: VisitorSession,
    Path(index): Path<usize>,
) -> Result<Response, AppError> {
    let export = export_candidate(&state, visitor, index).await?;
    Ok(pdf_response(export, "attachment"))
}

/// GET /search/candidates/:index/preview.pdf
pub async fn handle_preview_pdf(
    State(state): State<AppState>,
    visitor: VisitorSession,
    Path(index): Path<usize>,
) -> Result<Response, AppError> {
    let export = export_candidate(&state, visitor, index).await?;
    Ok(pdf_response(export, "inline"))
}

async fn export_candidate(
    state: &AppState,
    visitor: VisitorSession,
    index: usize,
) -> Result<ProfileExport, AppError> {
    let session = state.sessions.snapshot(visitor.id).await;
    let candidate = session.candidate(index).ok_or_else(|| no_candidate(index))?;
    let export = render_profile(candidate)?;
    debug!(session = %visitor.id, index, pages = export.page_count, "Serving profile PDF");
    Ok(export)
}

fn pdf_response(export: ProfileExport, disposition: &str) -> Response {
    let content_disposition = content_disposition(disposition, &export.file_name);
    let mut response = Response::new(Body::from(Bytes::from(export.bytes)));
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(
        CONTENT_DISPOSITION,
        HeaderValue::from_str(&content_disposition)
            .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"profile.pdf\"")),
    );
    response
}

/// RFC 5987 `attr-char` minus the punctuation that never shows up in file names.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// `filename` carries an ASCII-only fallback; non-ASCII names also get an
/// RFC 5987 `filename*`.
fn content_disposition(disposition: &str, file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c == ' ' || c.is_ascii_graphic() => c,
            _ => '_',
        })
        .collect();

    if fallback == file_name {
        return format!(r#"{disposition}; filename="{fallback}""#);
    }

    let encoded = utf8_percent_encode(file_name, ATTR_CHAR);
    format!(r#"{disposition}; filename="{fallback}"; filename*=UTF-8''{encoded}"#)
}
