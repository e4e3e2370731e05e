//! Per-visitor view state for the candidate search page.
//!
//! A session is what the search page renders: the last query, the loading
//! flag, the error banner, the result list and the open modal. Sessions live in
//! memory only and are keyed by a cookie.
//!
//! Ordering: every search takes a [`SearchTicket`]; only the ticket issued
//! last may write results back, so a slow early response never overwrites a
//! later one.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts, HeaderMap},
};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::Candidate;
use crate::search::client::{SearchError, SearchQuery};

pub const SESSION_COOKIE: &str = "ta_session";

/// Sessions kept before the least recently touched one is evicted.
const MAX_SESSIONS: usize = 1024;

// ────────────────────────────────────────────────────────────────────────────
// Session state
// ────────────────────────────────────────────────────────────────────────────

/// Identifies one search submission within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalMode {
    Detail,
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalState {
    pub index: usize,
    pub mode: ModalMode,
}

#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    pub job_title: String,
    pub job_description: String,
    pub is_loading: bool,
    pub error: Option<String>,
    pub candidates: Vec<Candidate>,
    /// True once at least one search has settled.
    pub has_searched: bool,
    pub modal: Option<ModalState>,
    latest_token: u64,
}

impl SearchSession {
    /// Starts a search: clears the previous outcome and issues a new ticket.
    pub fn begin(&mut self, query: &SearchQuery) -> SearchTicket {
        self.latest_token += 1;
        self.job_title = query.job_title.clone();
        self.job_description = query.job_description.clone();
        self.is_loading = true;
        self.error = None;
        self.candidates.clear();
        self.modal = None;
        SearchTicket(self.latest_token)
    }

    /// Applies a search outcome. Returns `false` (and changes nothing) when a
    /// newer search has started since `ticket` was issued.
    pub fn complete(
        &mut self,
        ticket: SearchTicket,
        outcome: Result<Vec<Candidate>, SearchError>,
    ) -> bool {
        if self.is_stale(ticket) {
            debug!(
                ticket = ticket.0,
                latest = self.latest_token,
                "Discarding stale search result"
            );
            return false;
        }

        self.is_loading = false;
        self.has_searched = true;
        match outcome {
            Ok(candidates) => self.candidates = candidates,
            Err(e) => self.error = Some(e.user_message()),
        }
        true
    }

    pub fn is_stale(&self, ticket: SearchTicket) -> bool {
        ticket.0 != self.latest_token
    }

    pub fn candidate(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    /// Opens the modal on `index` in detail mode.
    pub fn open(&mut self, index: usize) -> Option<&Candidate> {
        self.set_modal(index, ModalMode::Detail)
    }

    /// Switches the modal on `index` to document preview.
    pub fn show_preview(&mut self, index: usize) -> Option<&Candidate> {
        self.set_modal(index, ModalMode::Preview)
    }

    pub fn close(&mut self) {
        self.modal = None;
    }

    fn set_modal(&mut self, index: usize, mode: ModalMode) -> Option<&Candidate> {
        if index >= self.candidates.len() {
            return None;
        }
        self.modal = Some(ModalState { index, mode });
        self.candidates.get(index)
    }

    /// "No candidates found" is shown only after a search settled cleanly.
    pub fn show_empty_notice(&self) -> bool {
        self.has_searched && !self.is_loading && self.error.is_none() && self.candidates.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Store
// ────────────────────────────────────────────────────────────────────────────

struct Entry {
    session: SearchSession,
    touched: u64,
}

#[derive(Default)]
struct Sessions {
    entries: HashMap<Uuid, Entry>,
    clock: u64,
}

/// In-memory session map shared by all handlers.
///
/// The lock is only held for synchronous state changes, never across the
/// outbound search request.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Sessions>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the session for rendering; unknown ids read as a fresh session.
    pub async fn snapshot(&self, id: Uuid) -> SearchSession {
        self.inner
            .read()
            .await
            .entries
            .get(&id)
            .map(|e| e.session.clone())
            .unwrap_or_default()
    }

    /// Runs `f` against the session, creating it if needed.
    pub async fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut SearchSession) -> R) -> R {
        let mut sessions = self.inner.write().await;
        sessions.clock += 1;
        let now = sessions.clock;

        if !sessions.entries.contains_key(&id) && sessions.entries.len() >= MAX_SESSIONS {
            let oldest = sessions
                .entries
                .iter()
                .min_by_key(|(_, e)| e.touched)
                .map(|(k, _)| *k);
            if let Some(oldest) = oldest {
                sessions.entries.remove(&oldest);
                debug!(session = %oldest, "Evicted least recently used session");
            }
        }

        let entry = sessions.entries.entry(id).or_insert_with(|| Entry {
            session: SearchSession::default(),
            touched: now,
        });
        entry.touched = now;
        f(&mut entry.session)
    }

    /// Runs `f` against an existing session. Unknown ids are left unstored.
    pub async fn modify<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut SearchSession) -> R,
    ) -> Option<R> {
        let mut sessions = self.inner.write().await;
        sessions.clock += 1;
        let now = sessions.clock;
        let entry = sessions.entries.get_mut(&id)?;
        entry.touched = now;
        Some(f(&mut entry.session))
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cookie extractor
// ────────────────────────────────────────────────────────────────────────────

/// The visitor's session id, read from the cookie or freshly minted.
#[derive(Debug, Clone, Copy)]
pub struct VisitorSession {
    pub id: Uuid,
    pub is_new: bool,
}

impl VisitorSession {
    /// `Set-Cookie` value to send back when the id was minted for this request.
    pub fn set_cookie(&self) -> Option<String> {
        self.is_new
            .then(|| format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.id))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for VisitorSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(match session_id_from_headers(&parts.headers) {
            Some(id) => VisitorSession { id, is_new: false },
            None => VisitorSession {
                id: Uuid::new_v4(),
                is_new: true,
            },
        })
    }
}

fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}
