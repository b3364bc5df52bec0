//! Mock server state management.
//!
//! Provides the in-memory data store for the mock GitLab API server.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    MergeStatusCheck, ProjectStatusCheck, StatusCheckProtectedBranch,
    UpdateExternalStatusCheckOptions, STATUS_PASSED, STATUS_PENDING,
};

/// A project known to the mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockProject {
    pub id: u64,
    /// Namespaced path, e.g. `acme/widgets`.
    pub path: String,
}

/// A merge request known to the mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockMergeRequest {
    pub project_id: u64,
    pub iid: u64,
    /// Head commit SHA of the source branch.
    pub sha: String,
    pub target_branch: String,
}

/// A status recorded for one check against one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCheckResponse {
    pub project_id: u64,
    pub merge_request_iid: u64,
    pub external_status_check_id: u64,
    pub sha: String,
    pub status: String,
}

/// Why a mutation was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
}

/// Shared state for the mock server.
///
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Projects indexed by ID.
    pub projects: HashMap<u64, MockProject>,

    /// Protected branches indexed by ID.
    pub protected_branches: HashMap<u64, StatusCheckProtectedBranch>,

    /// External status checks indexed by ID (ordered, like the real listing).
    pub status_checks: BTreeMap<u64, ProjectStatusCheck>,

    /// Merge requests indexed by (project ID, IID).
    pub merge_requests: HashMap<(u64, u64), MockMergeRequest>,

    /// Recorded status check responses, oldest first.
    pub responses: Vec<StatusCheckResponse>,

    /// Optional authentication token. If set, requests must include this token.
    pub required_token: Option<String>,

    last_check_id: u64,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a project to the state.
    pub fn with_project(mut self, id: u64, path: &str) -> Self {
        self.projects.insert(
            id,
            MockProject {
                id,
                path: path.to_string(),
            },
        );
        self
    }

    /// Add a protected branch to the state.
    pub fn with_protected_branch(mut self, branch: StatusCheckProtectedBranch) -> Self {
        self.protected_branches.insert(branch.id, branch);
        self
    }

    /// Add an existing status check to the state.
    pub fn with_status_check(mut self, check: ProjectStatusCheck) -> Self {
        self.last_check_id = self.last_check_id.max(check.id);
        self.status_checks.insert(check.id, check);
        self
    }

    /// Add a merge request to the state.
    pub fn with_merge_request(mut self, mr: MockMergeRequest) -> Self {
        self.merge_requests.insert((mr.project_id, mr.iid), mr);
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// Resolve a decoded path parameter (numeric ID or namespaced path).
    pub fn resolve_project(&self, reference: &str) -> Option<u64> {
        if let Ok(id) = reference.parse::<u64>() {
            if self.projects.contains_key(&id) {
                return Some(id);
            }
        }
        self.projects
            .values()
            .find(|p| p.path == reference)
            .map(|p| p.id)
    }

    /// List a project's status checks in ID order.
    pub fn list_status_checks(&self, project_id: u64) -> Vec<&ProjectStatusCheck> {
        self.status_checks
            .values()
            .filter(|c| c.project_id == project_id)
            .collect()
    }

    /// Get a project's status check by ID.
    pub fn get_status_check(&self, project_id: u64, id: u64) -> Option<&ProjectStatusCheck> {
        self.status_checks
            .get(&id)
            .filter(|c| c.project_id == project_id)
    }

    /// Create a status check and return it.
    pub fn create_status_check(
        &mut self,
        project_id: u64,
        name: String,
        external_url: String,
        protected_branch_ids: &[u64],
    ) -> Result<ProjectStatusCheck, MockError> {
        if self
            .status_checks
            .values()
            .any(|c| c.project_id == project_id && c.name == name)
        {
            return Err(MockError::BadRequest(format!(
                "Name has already been taken: {name}"
            )));
        }

        let protected_branches = self.branches_for(project_id, protected_branch_ids)?;
        self.last_check_id += 1;
        let check = ProjectStatusCheck {
            id: self.last_check_id,
            name,
            project_id,
            external_url,
            protected_branches,
        };
        self.status_checks.insert(check.id, check.clone());
        Ok(check)
    }

    /// Apply a partial update and return the updated check.
    pub fn update_status_check(
        &mut self,
        project_id: u64,
        id: u64,
        changes: UpdateExternalStatusCheckOptions,
    ) -> Result<ProjectStatusCheck, MockError> {
        if self.get_status_check(project_id, id).is_none() {
            return Err(MockError::NotFound("404 Not found".to_string()));
        }

        let branches = match &changes.protected_branch_ids {
            Some(ids) => Some(self.branches_for(project_id, ids)?),
            None => None,
        };

        let check = self
            .status_checks
            .get_mut(&id)
            .ok_or_else(|| MockError::NotFound("404 Not found".to_string()))?;
        if let Some(name) = changes.name {
            check.name = name;
        }
        if let Some(url) = changes.external_url {
            check.external_url = url;
        }
        if let Some(branches) = branches {
            check.protected_branches = branches;
        }
        Ok(check.clone())
    }

    /// Delete a status check. Returns false if it did not exist.
    pub fn delete_status_check(&mut self, project_id: u64, id: u64) -> bool {
        if self.get_status_check(project_id, id).is_none() {
            return false;
        }
        self.status_checks.remove(&id);
        self.responses.retain(|r| r.external_status_check_id != id);
        true
    }

    /// The checks that apply to a merge request, with their status for its
    /// head commit.
    pub fn merge_status_checks(&self, project_id: u64, iid: u64) -> Option<Vec<MergeStatusCheck>> {
        let mr = self.merge_requests.get(&(project_id, iid))?;

        let checks = self
            .list_status_checks(project_id)
            .into_iter()
            .filter(|c| {
                c.applies_to_all_branches()
                    || c.protected_branches.iter().any(|b| b.name == mr.target_branch)
            })
            .map(|c| MergeStatusCheck {
                id: c.id,
                name: c.name.clone(),
                external_url: c.external_url.clone(),
                status: self
                    .latest_status(project_id, iid, c.id, &mr.sha)
                    .unwrap_or(STATUS_PENDING)
                    .to_string(),
            })
            .collect();

        Some(checks)
    }

    /// Record a status response for a merge request's head commit.
    pub fn record_response(
        &mut self,
        project_id: u64,
        iid: u64,
        check_id: u64,
        sha: &str,
        status: Option<String>,
    ) -> Result<StatusCheckResponse, MockError> {
        let mr = self
            .merge_requests
            .get(&(project_id, iid))
            .ok_or_else(|| MockError::NotFound("404 Merge Request Not Found".to_string()))?;

        if self.get_status_check(project_id, check_id).is_none() {
            return Err(MockError::NotFound(
                "404 External Status Check Not Found".to_string(),
            ));
        }

        if mr.sha != sha {
            return Err(MockError::Conflict(
                "SHA does not match HEAD of source branch".to_string(),
            ));
        }

        let status = status.unwrap_or_else(|| STATUS_PASSED.to_string());
        if status != STATUS_PASSED && status != crate::STATUS_FAILED {
            return Err(MockError::BadRequest(format!(
                "status does not have a valid value: {status}"
            )));
        }

        let response = StatusCheckResponse {
            project_id,
            merge_request_iid: iid,
            external_status_check_id: check_id,
            sha: sha.to_string(),
            status,
        };
        self.responses.push(response.clone());
        Ok(response)
    }

    fn latest_status(&self, project_id: u64, iid: u64, check_id: u64, sha: &str) -> Option<&str> {
        self.responses
            .iter()
            .rev()
            .find(|r| {
                r.project_id == project_id
                    && r.merge_request_iid == iid
                    && r.external_status_check_id == check_id
                    && r.sha == sha
            })
            .map(|r| r.status.as_str())
    }

    fn branches_for(
        &self,
        project_id: u64,
        ids: &[u64],
    ) -> Result<Vec<StatusCheckProtectedBranch>, MockError> {
        ids.iter()
            .map(|id| {
                self.protected_branches
                    .get(id)
                    .filter(|b| b.project_id == project_id)
                    .cloned()
                    .ok_or_else(|| {
                        MockError::BadRequest(format!("protected_branch_ids {id} is invalid"))
                    })
            })
            .collect()
    }
}
