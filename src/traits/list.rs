//! List trait for fetching collections of entities.

use async_trait::async_trait;

use crate::client::GitLabClient;
use crate::error::Result;
use crate::models::{MergeStatusCheck, ProjectStatusCheck};
use crate::pagination::{ListOptions, Page};
use crate::project_id::ProjectId;

/// Default page size for list operations (GitLab's maximum).
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Maximum pages to fetch (safety limit).
const MAX_PAGES: u32 = 1000;

/// List entities with pagination support.
///
/// # Example
///
/// ```ignore
/// use glstatus::{GitLabClient, List, ProjectId, ProjectStatusCheck};
///
/// let client = GitLabClient::from_env()?;
/// let project = ProjectId::from("group/project");
///
/// // Fetch a single page
/// let page = ProjectStatusCheck::list_page(&client, &project, &ListOptions::for_page(1, 20)).await?;
///
/// // Fetch all pages
/// let all_checks = ProjectStatusCheck::list_all(&client, &project).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// What the collection is scoped to.
    type Query: Send + Sync;

    /// List entities for the query (single page).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_page(
        client: &GitLabClient,
        query: &Self::Query,
        options: &ListOptions,
    ) -> Result<Page<Self>>;

    /// List all entities for the query (fetches all pages).
    ///
    /// Follows the server's next-page cursor until it runs out.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn list_all(client: &GitLabClient, query: &Self::Query) -> Result<Vec<Self>> {
        let mut all_items = Vec::new();
        let mut page = 1;

        loop {
            let options = ListOptions::for_page(page, DEFAULT_PAGE_SIZE);
            let result = Self::list_page(client, query, &options).await?;
            let next = result.next_page;
            let has_more = result.has_more && !result.is_empty();
            all_items.extend(result.items);

            if !has_more {
                break;
            }
            page = match next {
                Some(n) if n > page => n,
                _ => page + 1,
            };

            // Safety limit to prevent infinite loops
            if page > MAX_PAGES {
                tracing::warn!("Reached pagination limit of {} pages, stopping", MAX_PAGES);
                break;
            }
        }

        Ok(all_items)
    }
}

/// A merge request addressed by project and project-scoped IID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequestRef {
    pub project: ProjectId,
    pub merge_request_iid: u64,
}

impl MergeRequestRef {
    pub fn new(project: impl Into<ProjectId>, merge_request_iid: u64) -> Self {
        Self {
            project: project.into(),
            merge_request_iid,
        }
    }
}

#[async_trait]
impl List for MergeStatusCheck {
    type Query = MergeRequestRef;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &GitLabClient,
        query: &Self::Query,
        options: &ListOptions,
    ) -> Result<Page<Self>> {
        let (items, meta) = client
            .external_status_checks()
            .list_merge_status_checks(&query.project, query.merge_request_iid, Some(options))
            .await?;
        Ok(Page::new(items, options, meta))
    }
}

#[async_trait]
impl List for ProjectStatusCheck {
    type Query = ProjectId;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &GitLabClient,
        project: &Self::Query,
        options: &ListOptions,
    ) -> Result<Page<Self>> {
        let (items, meta) = client
            .external_status_checks()
            .list_project_status_checks(project, Some(options))
            .await?;
        Ok(Page::new(items, options, meta))
    }
}
