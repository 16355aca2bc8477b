use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    routing::get,
    Json, Router,
};
use http::StatusCode;

use crate::notion::{fetch_projects, ConfigSource, ProxyError};
use crate::projects::{ProjectQuery, ProjectsEnvelope, PROJECTS_ENDPOINT};

#[derive(Clone)]
pub struct ProxyState {
    source: Arc<dyn ConfigSource>,
}

/// Routes for the Notion projects proxy, mergeable into any app router.
pub fn router<S>(source: Arc<dyn ConfigSource>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route(PROJECTS_ENDPOINT, get(get_projects).post(post_projects))
        .with_state(ProxyState { source })
}

async fn get_projects(State(state): State<ProxyState>) -> (StatusCode, Json<ProjectsEnvelope>) {
    respond(&state, ProjectQuery::default()).await
}

async fn post_projects(
    State(state): State<ProxyState>,
    body: Bytes,
) -> (StatusCode, Json<ProjectsEnvelope>) {
    match parse_query(&body) {
        Ok(query) => respond(&state, query).await,
        Err(e) => failure(e),
    }
}

fn parse_query(body: &[u8]) -> Result<ProjectQuery, ProxyError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ProjectQuery::default());
    }
    serde_json::from_slice(body).map_err(|e| ProxyError::BadRequest(e.to_string()))
}

async fn respond(state: &ProxyState, query: ProjectQuery) -> (StatusCode, Json<ProjectsEnvelope>) {
    match fetch_projects(state.source.as_ref(), &query).await {
        Ok(pages) => (StatusCode::OK, Json(ProjectsEnvelope::success(pages))),
        Err(e) => failure(e),
    }
}

fn failure(err: ProxyError) -> (StatusCode, Json<ProjectsEnvelope>) {
    tracing::error!(error = %err, "projects proxy failed");
    (err.status(), Json(ProjectsEnvelope::failure(err.to_string())))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{body::Body, routing::post};
    use http::{header, Request};
    use tower::ServiceExt;

    use super::*;
    use crate::notion::{API_BASE_VAR, API_KEY_VAR, DATABASE_ID_VAR};
    use crate::projects::{fixtures, group_by_category};

    fn no_config() -> Router {
        router(Arc::new(HashMap::<String, String>::new()))
    }

    fn mock_config(base: &str, database: &str) -> Router {
        let source: HashMap<String, String> = [
            (API_KEY_VAR, "secret"),
            (DATABASE_ID_VAR, database),
            (API_BASE_VAR, base),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        router(Arc::new(source))
    }

    /// Serves `body` with `status` for every database query and counts hits.
    async fn spawn_notion(status: StatusCode, body: serde_json::Value) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/v1/databases/{id}/query",
            post(move |headers: http::HeaderMap| {
                let counter = counter.clone();
                let body = body.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    assert_eq!(
                        headers.get(header::AUTHORIZATION).and_then(|h| h.to_str().ok()),
                        Some("Bearer secret")
                    );
                    (status, Json(body))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/v1"), hits)
    }

    async fn call(app: Router, method: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method(method)
            .uri(PROJECTS_ENDPOINT)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn sample_results() -> serde_json::Value {
        let mut archived = fixtures::page("gone", Some("Web"), Some("https://i/gone"), &["x"]);
        archived.archived = true;
        let pages = vec![
            fixtures::with_link(
                fixtures::page("p1", Some("Web"), Some("https://i/1"), &["TS"]),
                "https://p1.dev",
            ),
            fixtures::page("p2", Some("Web"), Some("https://i/2"), &["Rust"]),
            fixtures::page("no-cover", Some("Web"), None, &["Rust"]),
            archived,
            fixtures::page("p3", Some("Mobile"), Some("https://i/3"), &["Kotlin"]),
        ];
        serde_json::json!({ "object": "list", "results": pages, "has_more": false })
    }

    #[tokio::test]
    async fn test_missing_credential_returns_500() {
        let (status, body) = call(no_config(), "GET", "").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));

        // the client treats this as no results
        let envelope: ProjectsEnvelope = serde_json::from_value(body).unwrap();
        assert!(matches!(envelope, ProjectsEnvelope::Failure { .. }));
    }

    #[tokio::test]
    async fn test_empty_post_matches_get() {
        let get = call(no_config(), "GET", "").await;
        let post = call(no_config(), "POST", "  \n").await;
        assert_eq!(get, post);
    }

    #[tokio::test]
    async fn test_malformed_post_body_is_rejected() {
        let (status, body) = call(no_config(), "POST", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let (status, _) = call(
            no_config(),
            "POST",
            r#"{"sorts": [{"property": "Name", "direction": "sideways"}]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_filters_incomplete_records() {
        let (base, _) = spawn_notion(StatusCode::OK, sample_results()).await;
        let (status, body) = call(mock_config(&base, "filter-db"), "GET", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["total"], 3);

        let envelope: ProjectsEnvelope = serde_json::from_value(body).unwrap();
        let ProjectsEnvelope::Success { results, .. } = envelope else {
            panic!("expected success envelope");
        };
        let groups = group_by_category(&results);
        let summary: Vec<(&str, Vec<&str>)> = groups
            .iter()
            .map(|g| (g.name.as_str(), g.projects.iter().map(|p| p.id.as_str()).collect()))
            .collect();
        assert_eq!(summary, vec![("Web", vec!["p1", "p2"]), ("Mobile", vec!["p3"])]);
    }

    #[tokio::test]
    async fn test_upstream_status_is_surfaced() {
        let (base, _) = spawn_notion(
            StatusCode::UNAUTHORIZED,
            serde_json::json!({"object": "error", "status": 401, "message": "API token is invalid."}),
        )
        .await;
        let (status, body) = call(mock_config(&base, "denied-db"), "GET", "").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("API token is invalid."));
    }

    #[tokio::test]
    async fn test_malformed_upstream_payload() {
        let (base, _) = spawn_notion(StatusCode::OK, serde_json::json!({"object": "list"})).await;
        let (status, body) = call(mock_config(&base, "broken-db"), "GET", "").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_upstream_response_is_cached() {
        let (base, hits) = spawn_notion(StatusCode::OK, sample_results()).await;
        let first = call(mock_config(&base, "cached-db"), "GET", "").await;
        let second = call(mock_config(&base, "cached-db"), "POST", "").await;
        assert_eq!(first, second);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // a different query is a different cache entry
        call(
            mock_config(&base, "cached-db"),
            "POST",
            r#"{"sorts": [{"property": "Name", "direction": "ascending"}]}"#,
        )
        .await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
