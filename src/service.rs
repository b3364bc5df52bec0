//! External status check operations.
//!
//! Each method resolves the project reference, builds the endpoint path,
//! and delegates to the client's transport. Nothing is cached or retried.

use reqwest::Method;

use crate::client::GitLabClient;
use crate::error::Result;
use crate::models::{
    CreateExternalStatusCheckOptions, MergeStatusCheck, ProjectStatusCheck,
    SetExternalStatusCheckStatusOptions, UpdateExternalStatusCheckOptions,
};
use crate::pagination::ListOptions;
use crate::project_id::ProjectId;
use crate::response::ResponseMeta;

/// Operations on a project's external status checks.
///
/// Obtained from [`GitLabClient::external_status_checks`]. Holds only a
/// borrowed client, so it is free to copy and to use from concurrent tasks.
///
/// # Example
///
/// ```no_run
/// use glstatus::{GitLabClient, SetExternalStatusCheckStatusOptions};
///
/// # async fn example() -> glstatus::Result<()> {
/// let client = GitLabClient::from_env()?;
/// let checks = client.external_status_checks();
///
/// let (statuses, _) = checks.list_merge_status_checks("group/project", 7, None).await?;
/// for check in &statuses {
///     println!("{}: {}", check.name, check.status);
/// }
///
/// let opts = SetExternalStatusCheckStatusOptions::new("6104942438c14ec7bd21c6cd5bd995272b3faff6", 2)
///     .with_status("passed");
/// checks.set_external_status_check_status("group/project", 7, &opts).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ExternalStatusChecksService<'a> {
    client: &'a GitLabClient,
}

impl<'a> ExternalStatusChecksService<'a> {
    pub fn new(client: &'a GitLabClient) -> Self {
        Self { client }
    }

    /// List the external status checks that apply to a merge request, with
    /// their status.
    ///
    /// `merge_request_iid` is the project-scoped merge request number.
    #[tracing::instrument(skip(self, project, options), fields(project))]
    pub async fn list_merge_status_checks(
        &self,
        project: impl Into<ProjectId>,
        merge_request_iid: u64,
        options: Option<&ListOptions>,
    ) -> Result<(Vec<MergeStatusCheck>, ResponseMeta)> {
        let project = resolve(project)?;
        let path = format!("projects/{project}/merge_requests/{merge_request_iid}/status_checks");

        let request = self.client.build_request(Method::GET, &path, options)?;
        self.client.execute_json(request).await
    }

    /// List the external status checks defined on a project.
    #[tracing::instrument(skip(self, project, options), fields(project))]
    pub async fn list_project_status_checks(
        &self,
        project: impl Into<ProjectId>,
        options: Option<&ListOptions>,
    ) -> Result<(Vec<ProjectStatusCheck>, ResponseMeta)> {
        let project = resolve(project)?;
        let path = format!("projects/{project}/external_status_checks");

        let request = self.client.build_request(Method::GET, &path, options)?;
        self.client.execute_json(request).await
    }

    /// Record a status for one check against one commit of a merge request.
    ///
    /// # Errors
    ///
    /// Fails without sending anything if `sha` or
    /// `external_status_check_id` is missing.
    #[tracing::instrument(skip(self, project, options), fields(project))]
    pub async fn set_external_status_check_status(
        &self,
        project: impl Into<ProjectId>,
        merge_request_iid: u64,
        options: &SetExternalStatusCheckStatusOptions,
    ) -> Result<ResponseMeta> {
        let project = resolve(project)?;
        options.validate()?;
        let path =
            format!("projects/{project}/merge_requests/{merge_request_iid}/status_check_responses");

        let request = self.client.build_request(Method::POST, &path, Some(options))?;
        self.client.execute(request).await
    }

    /// Create an external status check on a project.
    ///
    /// # Errors
    ///
    /// Fails without sending anything if `name` or `external_url` is missing.
    #[tracing::instrument(skip(self, project, options), fields(project))]
    pub async fn create_external_status_check(
        &self,
        project: impl Into<ProjectId>,
        options: &CreateExternalStatusCheckOptions,
    ) -> Result<ResponseMeta> {
        let project = resolve(project)?;
        options.validate()?;
        let path = format!("projects/{project}/external_status_checks");

        let request = self.client.build_request(Method::POST, &path, Some(options))?;
        self.client.execute(request).await
    }

    /// Delete an external status check.
    #[tracing::instrument(skip(self, project), fields(project))]
    pub async fn delete_external_status_check(
        &self,
        project: impl Into<ProjectId>,
        check_id: u64,
    ) -> Result<ResponseMeta> {
        let project = resolve(project)?;
        let path = format!("projects/{project}/external_status_checks/{check_id}");

        let request = self.client.build_request::<()>(Method::DELETE, &path, None)?;
        self.client.execute(request).await
    }

    /// Update an external status check; only the fields set in `options`
    /// are sent.
    #[tracing::instrument(skip(self, project, options), fields(project))]
    pub async fn update_external_status_check(
        &self,
        project: impl Into<ProjectId>,
        check_id: u64,
        options: &UpdateExternalStatusCheckOptions,
    ) -> Result<ResponseMeta> {
        let project = resolve(project)?;
        let path = format!("projects/{project}/external_status_checks/{check_id}");

        let request = self.client.build_request(Method::PUT, &path, Some(options))?;
        self.client.execute(request).await
    }
}

/// Resolve a project reference to its escaped path segment and record it on
/// the current span. Unusable references fail before a request is built.
fn resolve(project: impl Into<ProjectId>) -> Result<String> {
    let project = project.into();
    tracing::Span::current().record("project", tracing::field::display(&project));
    project.validate()?;
    Ok(project.path_segment())
}
