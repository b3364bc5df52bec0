//! Mock GitLab API server.
//!
//! Provides an axum-based HTTP server that simulates the external status
//! check endpoints of the GitLab API.

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// Path prefix the API is served under.
const API_PREFIX: &str = "/api/v4";

/// A mock GitLab API server for testing.
///
/// The server runs in the background and can be used to test the client
/// against a realistic, stateful API implementation.
pub struct MockServer {
    /// The API root URL (including `/api/v4`).
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's API root.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}{}", addr, API_PREFIX),
            handle,
            state: shared_state,
        }
    }

    /// Get the API root URL of the mock server.
    ///
    /// Use this URL when creating a `GitLabClient` for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    /// Create state from a scenario.
    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new();

        for (id, path) in scenario.projects {
            state = state.with_project(id, &path);
        }

        for branch in scenario.protected_branches {
            state = state.with_protected_branch(branch);
        }

        for check in scenario.status_checks {
            state = state.with_status_check(check);
        }

        for mr in scenario.merge_requests {
            state = state.with_merge_request(mr);
        }

        state
    }

    /// Create the axum router with all routes.
    pub(crate) fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        let api = Router::new()
            // Project-level checks
            .route(
                "/projects/:project/external_status_checks",
                get(handlers::list_status_checks).post(handlers::create_status_check),
            )
            .route(
                "/projects/:project/external_status_checks/:check_id",
                put(handlers::update_status_check).delete(handlers::delete_status_check),
            )
            // Merge request checks
            .route(
                "/projects/:project/merge_requests/:iid/status_checks",
                get(handlers::list_merge_status_checks),
            )
            .route(
                "/projects/:project/merge_requests/:iid/status_check_responses",
                post(handlers::set_status_check_status),
            )
            // Health check
            .route("/health", get(health_check))
            .with_state(state);

        Router::new().nest(API_PREFIX, api)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GitLabClient, List, ProjectId, ProjectStatusCheck};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_router_serves_health_without_network() {
        let app = MockServer::create_router(MockState::new().shared());

        let response = app
            .oneshot(Request::builder().uri("/api/v4/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_router_decodes_escaped_project_path() {
        let app = MockServer::create_router(MockServer::default_state().shared());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v4/projects/acme%2Fwidgets/external_status_checks")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("x-total").unwrap(), "2");
    }

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/health", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_list_checks_with_client() {
        let server = MockServer::start().await;
        let client = GitLabClient::new("test-token", server.url()).unwrap();

        let page = ProjectStatusCheck::list_page(&client, &ProjectId::Numeric(1), &Default::default())
            .await
            .expect("Failed to list status checks");

        assert_eq!(page.len(), 2);
        assert_eq!(page.items[0].name, "Compliance");
        assert_eq!(page.total, Some(2));

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_server() {
        let server = MockServer::start_empty().await;
        let client = GitLabClient::new("test-token", server.url()).unwrap();

        let result = client
            .external_status_checks()
            .list_project_status_checks(1u64, None)
            .await;

        assert!(result.unwrap_err().is_not_found());

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_required_token() {
        let state = MockState::new()
            .with_project(5, "team/app")
            .with_required_token("secret");
        let server = MockServer::with_state(state).await;

        let wrong = GitLabClient::new("wrong", server.url()).unwrap();
        let err = wrong
            .external_status_checks()
            .list_project_status_checks("team/app", None)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(401));

        let right = GitLabClient::new("secret", server.url()).unwrap();
        let (checks, meta) = right
            .external_status_checks()
            .list_project_status_checks("team/app", None)
            .await
            .unwrap();
        assert!(checks.is_empty());
        assert_eq!(meta.status, 200);

        server.shutdown().await;
    }
}
