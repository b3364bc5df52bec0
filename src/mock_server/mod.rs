//! Mock GitLab API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the GitLab
//! external status check endpoints for integration and end-to-end testing.
//! Unlike wiremock which mocks at the HTTP level per-test, this server
//! maintains state across requests, enabling realistic workflow testing.
//!
//! # Example
//!
//! ```ignore
//! use glstatus::mock_server::MockServer;
//! use glstatus::{GitLabClient, List, ProjectId, ProjectStatusCheck};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = GitLabClient::new("test-token", server.url()).unwrap();
//!
//!     // Server comes with default fixtures
//!     let checks = ProjectStatusCheck::list_all(&client, &ProjectId::from("acme/widgets")).await.unwrap();
//!     assert_eq!(checks[0].name, "Compliance");
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::{MockError, MockMergeRequest, MockProject, MockState, StatusCheckResponse};
