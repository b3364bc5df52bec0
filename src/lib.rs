//! GitLab external status checks API client library.
//!
//! External status checks let third-party services gate merge request
//! approval. This crate exposes typed operations for defining checks on a
//! project and for reporting their outcome on merge requests.
//!
//! # Quick Start
//!
//! ```no_run
//! use glstatus::{CreateExternalStatusCheckOptions, GitLabClient, List, ProjectId, ProjectStatusCheck};
//!
//! #[tokio::main]
//! async fn main() -> glstatus::Result<()> {
//!     // Create client from environment variables
//!     let client = GitLabClient::from_env()?;
//!     let checks = client.external_status_checks();
//!
//!     // Define a check on a project
//!     let opts = CreateExternalStatusCheckOptions::new("Compliance", "https://compliance.example.com/hook");
//!     checks.create_external_status_check("my-group/my-project", &opts).await?;
//!
//!     // List every check defined on the project
//!     let project = ProjectId::from("my-group/my-project");
//!     let all = ProjectStatusCheck::list_all(&client, &project).await?;
//!     println!("Found {} status checks", all.len());
//!
//!     // Check their status on merge request !7
//!     let (statuses, response) = checks.list_merge_status_checks(&project, 7, None).await?;
//!     println!("HTTP {}: {} checks", response.status, statuses.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`GitLabClient`] - authenticated transport: builds requests, executes
//!   them, decodes bodies and captures [`ResponseMeta`]
//! - [`ExternalStatusChecksService`] - the six status check operations
//! - [`ProjectId`] - a project addressed by numeric ID or namespaced path
//! - [`List`] - paginated listing, implemented by [`MergeStatusCheck`] and
//!   [`ProjectStatusCheck`]
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `GITLAB_TOKEN` (required) - A personal, project or group access token
//! - `GITLAB_API_URL` (optional) - API root (defaults to `https://gitlab.com/api/v4`)

pub mod cli;
mod client;
mod error;
pub mod mcp;
#[cfg(feature = "test-server")]
pub mod mock_server;
mod models;
pub mod output;
mod pagination;
mod project_id;
mod response;
mod service;
mod traits;

// Re-export core types
pub use client::GitLabClient;
pub use error::{GitLabError, Result};
pub use pagination::{ListOptions, Page};
pub use project_id::ProjectId;
pub use response::{PageInfo, RateLimit, ResponseMeta};
pub use service::ExternalStatusChecksService;

// Re-export traits
pub use traits::{List, MergeRequestRef, DEFAULT_PAGE_SIZE};

// Re-export models
pub use models::{
    CreateExternalStatusCheckOptions, MergeStatusCheck, ProjectStatusCheck,
    SetExternalStatusCheckStatusOptions, StatusCheckProtectedBranch,
    UpdateExternalStatusCheckOptions, STATUS_FAILED, STATUS_PASSED, STATUS_PENDING,
};
