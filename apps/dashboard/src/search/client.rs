//! Matching client: the single outbound call the dashboard makes.
//!
//! `CandidateMatcher` is the seam handlers depend on. `HttpMatcher` is the real
//! implementation; tests swap in in-process doubles through `AppState`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::candidate::{normalize_all, Candidate};

/// Every way a search can fail. Each variant maps to a distinct message.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("API URL is not configured. Please check your environment variables.")]
    NotConfigured,

    #[error("Server error: {status_line}")]
    Status { code: u16, status_line: String },

    #[error("Server returned empty response")]
    EmptyBody,

    #[error("Invalid JSON response from server")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Server returned invalid data format")]
    InvalidShape,

    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl SearchError {
    pub fn from_status(status: StatusCode) -> Self {
        let status_line = format!("{} {}", status.as_u16(), status.canonical_reason().unwrap_or(""))
            .trim_end()
            .to_string();
        SearchError::Status {
            code: status.as_u16(),
            status_line,
        }
    }

    /// The single string shown in the error banner.
    pub fn user_message(&self) -> String {
        match self {
            SearchError::NotConfigured => self.to_string(),
            other => format!("Search failed: {other}"),
        }
    }
}

/// Request body sent to the matching service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub job_title: String,
    pub job_description: String,
}

/// Source of matched candidates for a job query.
#[async_trait]
pub trait CandidateMatcher: Send + Sync {
    async fn find_candidates(&self, query: &SearchQuery) -> Result<Vec<Candidate>, SearchError>;
}

/// Posts the query as JSON to the configured endpoint.
///
/// No retry and no timeout: one attempt, awaited to completion.
#[derive(Clone)]
pub struct HttpMatcher {
    client: Client,
    endpoint: Option<String>,
}

impl HttpMatcher {
    pub fn new(endpoint: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, endpoint })
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }
}

#[async_trait]
impl CandidateMatcher for HttpMatcher {
    async fn find_candidates(&self, query: &SearchQuery) -> Result<Vec<Candidate>, SearchError> {
        let endpoint = self.endpoint.as_deref().ok_or(SearchError::NotConfigured)?;

        info!(endpoint, job_title = %query.job_title, "Calling matching service");

        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Matching service returned an error status");
            return Err(SearchError::from_status(status));
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Matching service responded");

        parse_candidates(&body)
    }
}

/// Validates a response body: non-empty, JSON, and a top-level array.
pub fn parse_candidates(body: &str) -> Result<Vec<Candidate>, SearchError> {
    if body.is_empty() {
        return Err(SearchError::EmptyBody);
    }

    let value: Value = serde_json::from_str(body).map_err(SearchError::InvalidJson)?;

    match value {
        Value::Array(items) => Ok(normalize_all(&items)),
        _ => Err(SearchError::InvalidShape),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode as AxumStatus, routing::post, Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn query() -> SearchQuery {
        SearchQuery {
            job_title: "Senior React Developer".to_string(),
            job_description: "5 years React experience".to_string(),
        }
    }

    /// Serves `router` on an ephemeral port and returns the `/match` URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/match")
    }

    async fn serve_fixed(status: AxumStatus, body: &'static str) -> String {
        serve(Router::new().route("/match", post(move || async move { (status, body) }))).await
    }

    // ── parse_candidates ─────────────────────────────────────────────────────

    #[test]
    fn test_empty_body_is_empty_body_error() {
        assert!(matches!(parse_candidates(""), Err(SearchError::EmptyBody)));
    }

    #[test]
    fn test_whitespace_body_is_invalid_json() {
        assert!(matches!(parse_candidates("  "), Err(SearchError::InvalidJson(_))));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            parse_candidates("[{\"Full Name\": "),
            Err(SearchError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_non_array_shapes_are_shape_errors() {
        for body in ["{}", "{\"results\": []}", "\"text\"", "42", "null", "true"] {
            assert!(
                matches!(parse_candidates(body), Err(SearchError::InvalidShape)),
                "body {body} should be a shape error"
            );
        }
    }

    #[test]
    fn test_array_length_is_preserved() {
        for body in ["[]", "[{}]", "[1, \"two\", null, {\"Score\": 40}]"] {
            let expected = serde_json::from_str::<Vec<Value>>(body).unwrap().len();
            assert_eq!(parse_candidates(body).unwrap().len(), expected);
        }
    }

    // ── user messages ────────────────────────────────────────────────────────

    #[test]
    fn test_user_messages_are_distinct() {
        let messages = [
            SearchError::NotConfigured.user_message(),
            SearchError::from_status(StatusCode::INTERNAL_SERVER_ERROR).user_message(),
            SearchError::EmptyBody.user_message(),
            parse_candidates("{").unwrap_err().user_message(),
            SearchError::InvalidShape.user_message(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(messages[0].starts_with("API URL is not configured"));
        assert_eq!(
            messages[1],
            "Search failed: Server error: 500 Internal Server Error"
        );
        assert_eq!(messages[2], "Search failed: Server returned empty response");
        assert_eq!(messages[3], "Search failed: Invalid JSON response from server");
        assert_eq!(messages[4], "Search failed: Server returned invalid data format");
    }

    #[test]
    fn test_query_serializes_camel_case() {
        let body = serde_json::to_value(query()).unwrap();
        assert_eq!(
            body,
            json!({
                "jobTitle": "Senior React Developer",
                "jobDescription": "5 years React experience"
            })
        );
    }

    // ── HttpMatcher ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_unconfigured_matcher_makes_no_request() {
        let matcher = HttpMatcher::new(None).unwrap();
        assert!(!matcher.is_configured());
        let err = matcher.find_candidates(&query()).await.unwrap_err();
        assert!(matches!(err, SearchError::NotConfigured));
    }

    #[tokio::test]
    async fn test_posts_json_body_and_parses_array() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/match",
            post(move |headers: axum::http::HeaderMap, Json(body): Json<Value>| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let content_type = headers
                        .get("content-type")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    Json(json!([{
                        "Full Name": "Jane Doe",
                        "Job Title": body["jobTitle"],
                        "Experience(Skills/Tools Used)": body["jobDescription"],
                        "FitIndicator": content_type,
                        "Score": 92
                    }]))
                }
            }),
        );
        let url = serve(router).await;

        let matcher = HttpMatcher::new(Some(url)).unwrap();
        let candidates = matcher.find_candidates(&query()).await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(candidates.len(), 1);
        let jane = &candidates[0];
        assert_eq!(jane.full_name, "Jane Doe");
        assert_eq!(jane.job_title.as_deref(), Some("Senior React Developer"));
        assert_eq!(jane.experience.as_deref(), Some("5 years React experience"));
        assert_eq!(jane.fit_indicator.as_deref(), Some("application/json"));
        assert_eq!(jane.score, 92.0);
    }

    #[tokio::test]
    async fn test_server_error_status_is_reported() {
        let url = serve_fixed(AxumStatus::INTERNAL_SERVER_ERROR, "boom").await;
        let matcher = HttpMatcher::new(Some(url)).unwrap();
        let err = matcher.find_candidates(&query()).await.unwrap_err();
        assert_eq!(
            err.user_message(),
            "Search failed: Server error: 500 Internal Server Error"
        );
        assert!(matches!(err, SearchError::Status { code: 500, .. }));
    }

    #[tokio::test]
    async fn test_empty_success_body_is_reported() {
        let url = serve_fixed(AxumStatus::OK, "").await;
        let matcher = HttpMatcher::new(Some(url)).unwrap();
        let err = matcher.find_candidates(&query()).await.unwrap_err();
        assert!(matches!(err, SearchError::EmptyBody));
    }

    #[tokio::test]
    async fn test_object_body_is_shape_error() {
        let url = serve_fixed(AxumStatus::OK, "{\"candidates\": []}").await;
        let matcher = HttpMatcher::new(Some(url)).unwrap();
        let err = matcher.find_candidates(&query()).await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidShape));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let matcher = HttpMatcher::new(Some(format!("http://{addr}/match"))).unwrap();
        let err = matcher.find_candidates(&query()).await.unwrap_err();
        assert!(matches!(err, SearchError::Transport(_)));
        assert!(err.user_message().starts_with("Search failed: "));
    }
}
