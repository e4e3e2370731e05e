pub mod health;

use axum::{response::Html, routing::get, Router};

use crate::search::handlers;
use crate::state::AppState;
use crate::view::pages;

async fn home() -> Html<String> {
    Html(pages::home())
}

async fn talent_pool() -> Html<String> {
    Html(pages::talent_pool())
}

async fn reports() -> Html<String> {
    Html(pages::reports())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Static views
        .route("/", get(home))
        .route("/pool", get(talent_pool))
        .route("/reports", get(reports))
        // Candidate search
        .route(
            "/search",
            get(handlers::handle_search_page).post(handlers::handle_search_submit),
        )
        .route(
            "/search/candidates/:index",
            get(handlers::handle_open_candidate),
        )
        .route(
            "/search/candidates/:index/preview",
            get(handlers::handle_preview_candidate),
        )
        .route(
            "/search/candidates/:index/close",
            get(handlers::handle_close_candidate),
        )
        .route(
            "/search/candidates/:index/profile.pdf",
            get(handlers::handle_download_pdf),
        )
        .route(
            "/search/candidates/:index/preview.pdf",
            get(handlers::handle_preview_pdf),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tokio::sync::Notify;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::config::Config;
    use crate::models::candidate::normalize_all;
    use crate::models::Candidate;
    use crate::search::client::{CandidateMatcher, HttpMatcher, SearchError, SearchQuery};
    use crate::search::session::{SessionStore, SESSION_COOKIE};

    // ── test doubles ─────────────────────────────────────────────────────────

    /// Replies with a fixed outcome and counts calls.
    struct StubMatcher {
        reply: fn() -> Result<Vec<Candidate>, SearchError>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CandidateMatcher for StubMatcher {
        async fn find_candidates(&self, _query: &SearchQuery) -> Result<Vec<Candidate>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.reply)()
        }
    }

    /// Holds the first query until released; later queries answer immediately.
    struct GatedMatcher {
        gate: Notify,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CandidateMatcher for GatedMatcher {
        async fn find_candidates(&self, query: &SearchQuery) -> Result<Vec<Candidate>, SearchError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                self.gate.notified().await;
            }
            Ok(normalize_all(&[json!({ "Full Name": query.job_title.clone(), "Score": 50 })]))
        }
    }

    fn jane() -> Result<Vec<Candidate>, SearchError> {
        Ok(normalize_all(&[json!({
            "Full Name": "Jane Doe",
            "Job Title": "Senior React Developer",
            "Skills": "React, TypeScript",
            "Score": 92,
            "FitIndicator": "Excellent Fit"
        })]))
    }

    fn server_error() -> Result<Vec<Candidate>, SearchError> {
        Err(SearchError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR))
    }

    fn config(url: Option<&str>) -> Config {
        Config {
            search_api_url: url.map(str::to_string),
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    fn app_with(matcher: Arc<dyn CandidateMatcher>) -> (Router, SessionStore) {
        let sessions = SessionStore::new();
        let state = AppState {
            config: config(Some("http://matcher.test/search")),
            matcher,
            sessions: sessions.clone(),
        };
        (build_router(state), sessions)
    }

    fn stub(reply: fn() -> Result<Vec<Candidate>, SearchError>) -> Arc<StubMatcher> {
        Arc::new(StubMatcher {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    // ── request helpers ──────────────────────────────────────────────────────

    fn cookie(id: Uuid) -> String {
        format!("{SESSION_COOKIE}={id}")
    }

    async fn get(app: &Router, uri: &str, id: Uuid) -> Response {
        app.clone()
            .oneshot(
                Request::get(uri)
                    .header(header::COOKIE, cookie(id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn submit(app: &Router, id: Uuid, title: &str, description: &str) -> Response {
        let body = format!(
            "job_title={}&job_description={}",
            title.replace(' ', "+"),
            description.replace(' ', "+")
        );
        app.clone()
            .oneshot(
                Request::post("/search")
                    .header(header::COOKIE, cookie(id))
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// Waits for the background search of `id` to settle.
    async fn settle(sessions: &SessionStore, id: Uuid) {
        for _ in 0..200 {
            if !sessions.snapshot(id).await.is_loading {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("search did not settle");
    }

    async fn search(app: &Router, sessions: &SessionStore, id: Uuid) -> String {
        let response = submit(app, id, "Senior React Developer", "5 years React experience").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/search");
        settle(sessions, id).await;
        text(get(app, "/search", id).await).await
    }

    // ── static pages ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app_with(stub(jane));
        let response = get(&app, "/health", Uuid::new_v4()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&text(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["search_api_configured"], true);
    }

    #[tokio::test]
    async fn test_static_pages_render() {
        let (app, _) = app_with(stub(jane));
        for (uri, marker) in [
            ("/", "Recruitment Overview"),
            ("/pool", "Under Construction"),
            ("/reports", "Analytics &amp; Reports"),
        ] {
            let response = get(&app, uri, Uuid::new_v4()).await;
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
            assert!(text(response).await.contains(marker), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_first_visit_sets_session_cookie() {
        let (app, _) = app_with(stub(jane));
        let response = app
            .clone()
            .oneshot(Request::get("/search").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with(&format!("{SESSION_COOKIE}=")));

        let returning = get(&app, "/search", Uuid::new_v4()).await;
        assert!(returning.headers().get(header::SET_COOKIE).is_none());
    }

    // ── search flow ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_successful_search_renders_green_card() {
        let matcher = stub(jane);
        let (app, sessions) = app_with(matcher.clone());
        let id = Uuid::new_v4();

        let html = search(&app, &sessions, id).await;

        assert_eq!(matcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(html.matches(r#"<article class="card">"#).count(), 1);
        assert!(html.contains(r#"<span class="badge badge-green">Score: 92%</span>"#));
        assert!(!html.contains(r#"role="alert""#));
    }

    #[tokio::test]
    async fn test_server_error_shows_banner_and_no_cards() {
        let (app, sessions) = app_with(stub(server_error));
        let id = Uuid::new_v4();

        let html = search(&app, &sessions, id).await;

        assert!(html.contains("Search failed: Server error: 500 Internal Server Error"));
        assert!(!html.contains("<article"));
    }

    #[tokio::test]
    async fn test_unconfigured_endpoint_reports_without_request() {
        let sessions = SessionStore::new();
        let state = AppState {
            config: config(None),
            matcher: Arc::new(HttpMatcher::new(None).unwrap()),
            sessions: sessions.clone(),
        };
        let app = build_router(state);
        let id = Uuid::new_v4();

        let html = search(&app, &sessions, id).await;

        assert!(html.contains("API URL is not configured. Please check your environment variables."));
        assert!(!html.contains("No candidates found"));
    }

    #[tokio::test]
    async fn test_blank_fields_are_rejected_without_request() {
        let matcher = stub(jane);
        let (app, _) = app_with(matcher.clone());

        let response = submit(&app, Uuid::new_v4(), "", "5 years").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(matcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_latest_search_wins_over_slow_first() {
        let matcher = Arc::new(GatedMatcher {
            gate: Notify::new(),
            calls: AtomicUsize::new(0),
        });
        let (app, sessions) = app_with(matcher.clone());
        let id = Uuid::new_v4();

        submit(&app, id, "First", "slow").await;
        // Let the first task reach the gate.
        while matcher.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        submit(&app, id, "Second", "fast").await;
        settle(&sessions, id).await;

        // Release the first, slow search; its result must be discarded.
        matcher.gate.notify_one();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let session = sessions.snapshot(id).await;
        assert_eq!(session.candidates.len(), 1);
        assert_eq!(session.candidates[0].full_name, "Second");
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let (app, sessions) = app_with(stub(jane));
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        search(&app, &sessions, alice).await;
        let html = text(get(&app, "/search", bob).await).await;

        assert!(!html.contains("<article"));
    }

    // ── modal and export ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_modal_open_preview_close() {
        let (app, sessions) = app_with(stub(jane));
        let id = Uuid::new_v4();
        search(&app, &sessions, id).await;

        let html = text(get(&app, "/search/candidates/0", id).await).await;
        assert!(html.contains("Candidate Profile"));

        let html = text(get(&app, "/search/candidates/0/preview", id).await).await;
        assert!(html.contains(r#"src="/search/candidates/0/preview.pdf""#));

        let response = get(&app, "/search/candidates/0/close", id).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(sessions.snapshot(id).await.modal.is_none());
    }

    #[tokio::test]
    async fn test_out_of_range_candidate_is_not_found() {
        let (app, sessions) = app_with(stub(jane));
        let id = Uuid::new_v4();
        search(&app, &sessions, id).await;

        for uri in [
            "/search/candidates/5",
            "/search/candidates/5/preview",
            "/search/candidates/5/profile.pdf",
        ] {
            assert_eq!(get(&app, uri, id).await.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_modal_links_without_session_store_nothing() {
        let (app, sessions) = app_with(stub(jane));

        for _ in 0..5 {
            let response = app
                .clone()
                .oneshot(Request::get("/search/candidates/0/close").body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
        }
        for uri in [
            "/search/candidates/0",
            "/search/candidates/0/preview",
            "/search/candidates/0/profile.pdf",
        ] {
            let response = app
                .clone()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }
        let stranger = Uuid::new_v4();
        assert_eq!(get(&app, "/search/candidates/0", stranger).await.status(), StatusCode::NOT_FOUND);

        assert_eq!(sessions.len().await, 0);
    }

    #[tokio::test]
    async fn test_pdf_download_and_preview_headers() {
        let (app, sessions) = app_with(stub(jane));
        let id = Uuid::new_v4();
        search(&app, &sessions, id).await;

        let download = get(&app, "/search/candidates/0/profile.pdf", id).await;
        assert_eq!(download.status(), StatusCode::OK);
        assert_eq!(download.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            download.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Jane_Doe_profile.pdf\""
        );
        let bytes = axum::body::to_bytes(download.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));

        let preview = get(&app, "/search/candidates/0/preview.pdf", id).await;
        assert_eq!(
            preview.headers()[header::CONTENT_DISPOSITION],
            "inline; filename=\"Jane_Doe_profile.pdf\""
        );
    }
}
