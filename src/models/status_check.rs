//! External status check models and request options.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GitLabError, Result};

/// Status value GitLab reports for a passing check.
pub const STATUS_PASSED: &str = "passed";
/// Status value GitLab reports for a failing check.
pub const STATUS_FAILED: &str = "failed";
/// Status value GitLab reports while no response has been recorded.
pub const STATUS_PENDING: &str = "pending";

/// One external status check as it applies to a merge request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStatusCheck {
    pub id: u64,
    pub name: String,
    pub external_url: String,
    /// Status as reported by the server (e.g. `pending`, `passed`, `failed`).
    pub status: String,
}

impl MergeStatusCheck {
    pub fn is_passed(&self) -> bool {
        self.status == STATUS_PASSED
    }

    pub fn is_failed(&self) -> bool {
        self.status == STATUS_FAILED
    }

    pub fn is_pending(&self) -> bool {
        self.status == STATUS_PENDING
    }
}

/// An external status check defined on a project.
///
/// A check with no protected branches applies to every merge request in the
/// project; otherwise only to merge requests targeting one of the listed
/// branches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStatusCheck {
    pub id: u64,
    pub name: String,
    pub project_id: u64,
    pub external_url: String,
    #[serde(default)]
    pub protected_branches: Vec<StatusCheckProtectedBranch>,
}

impl ProjectStatusCheck {
    /// Names of the protected branches this check is scoped to.
    pub fn protected_branch_names(&self) -> Vec<&str> {
        self.protected_branches
            .iter()
            .map(|b| b.name.as_str())
            .collect()
    }

    /// Returns true if the check is not scoped to particular branches.
    pub fn applies_to_all_branches(&self) -> bool {
        self.protected_branches.is_empty()
    }
}

/// A protected branch a status check is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCheckProtectedBranch {
    pub id: u64,
    pub project_id: u64,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub code_owner_approval_required: bool,
}

/// Options for recording a status check response on a merge request.
///
/// `sha` and `external_status_check_id` must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetExternalStatusCheckStatusOptions {
    /// Head commit SHA of the merge request's source branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_status_check_id: Option<u64>,
    /// `passed` or `failed`; the server defaults to `passed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl SetExternalStatusCheckStatusOptions {
    pub fn new(sha: impl Into<String>, external_status_check_id: u64) -> Self {
        Self {
            sha: Some(sha.into()),
            external_status_check_id: Some(external_status_check_id),
            status: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Check that the required fields are present.
    pub fn validate(&self) -> Result<()> {
        const OPERATION: &str = "set_external_status_check_status";
        if self.sha.is_none() {
            return Err(GitLabError::MissingField {
                operation: OPERATION,
                field: "sha",
            });
        }
        if self.external_status_check_id.is_none() {
            return Err(GitLabError::MissingField {
                operation: OPERATION,
                field: "external_status_check_id",
            });
        }
        Ok(())
    }
}

/// Options for creating an external status check.
///
/// `name` and `external_url` must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateExternalStatusCheckOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected_branch_ids: Option<Vec<u64>>,
}

impl CreateExternalStatusCheckOptions {
    pub fn new(name: impl Into<String>, external_url: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            external_url: Some(external_url.into()),
            protected_branch_ids: None,
        }
    }

    #[must_use]
    pub fn with_protected_branch_ids(mut self, ids: Vec<u64>) -> Self {
        self.protected_branch_ids = Some(ids);
        self
    }

    /// Check that the required fields are present.
    pub fn validate(&self) -> Result<()> {
        const OPERATION: &str = "create_external_status_check";
        if self.name.is_none() {
            return Err(GitLabError::MissingField {
                operation: OPERATION,
                field: "name",
            });
        }
        if self.external_url.is_none() {
            return Err(GitLabError::MissingField {
                operation: OPERATION,
                field: "external_url",
            });
        }
        Ok(())
    }
}

/// Options for a partial update of an external status check.
///
/// Absent fields are left unchanged. `Some(vec![])` for
/// `protected_branch_ids` clears the branch scoping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateExternalStatusCheckOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected_branch_ids: Option<Vec<u64>>,
}

impl UpdateExternalStatusCheckOptions {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn external_url(mut self, url: impl Into<String>) -> Self {
        self.external_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn protected_branch_ids(mut self, ids: Vec<u64>) -> Self {
        self.protected_branch_ids = Some(ids);
        self
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.external_url.is_none() && self.protected_branch_ids.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_status_check_deserializes() {
        let check: ProjectStatusCheck = serde_json::from_value(json!({
            "id": 1,
            "name": "Compliance Tool",
            "project_id": 6,
            "external_url": "https://gitlab.com/example/compliance-tool",
            "protected_branches": [
                {
                    "id": 14,
                    "project_id": 6,
                    "name": "main",
                    "created_at": "2020-10-12T14:04:50.787Z",
                    "updated_at": "2020-10-12T14:04:50.787Z",
                    "code_owner_approval_required": false
                }
            ]
        }))
        .unwrap();

        assert_eq!(check.id, 1);
        assert_eq!(check.project_id, 6);
        assert_eq!(check.protected_branch_names(), vec!["main"]);
        assert!(!check.applies_to_all_branches());
        let branch = &check.protected_branches[0];
        assert!(branch.created_at.is_some());
        assert!(!branch.code_owner_approval_required);
    }

    #[test]
    fn test_protected_branch_optional_fields() {
        let branch: StatusCheckProtectedBranch = serde_json::from_value(json!({
            "id": 2,
            "project_id": 6,
            "name": "release",
            "created_at": null
        }))
        .unwrap();
        assert!(branch.created_at.is_none());
        assert!(branch.updated_at.is_none());
        assert!(!branch.code_owner_approval_required);
    }

    #[test]
    fn test_merge_status_check_status_helpers() {
        let check: MergeStatusCheck = serde_json::from_value(json!({
            "id": 2,
            "name": "Service 2",
            "external_url": "https://gitlab.example.com/test-endpoint-2",
            "status": "pending"
        }))
        .unwrap();
        assert!(check.is_pending());
        assert!(!check.is_passed());
        assert!(!check.is_failed());
    }

    #[test]
    fn test_update_options_serialize_only_present_fields() {
        let opts = UpdateExternalStatusCheckOptions::default().name("renamed");
        assert_eq!(serde_json::to_value(&opts).unwrap(), json!({"name": "renamed"}));

        let empty = UpdateExternalStatusCheckOptions::default();
        assert!(empty.is_empty());
        assert_eq!(serde_json::to_value(&empty).unwrap(), json!({}));
    }

    #[test]
    fn test_present_but_empty_list_is_sent() {
        let opts = UpdateExternalStatusCheckOptions::default().protected_branch_ids(vec![]);
        assert_eq!(
            serde_json::to_value(&opts).unwrap(),
            json!({"protected_branch_ids": []})
        );
    }

    #[test]
    fn test_set_status_validation() {
        let opts = SetExternalStatusCheckStatusOptions::new("abc123", 5).with_status("failed");
        assert!(opts.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&opts).unwrap(),
            json!({"sha": "abc123", "external_status_check_id": 5, "status": "failed"})
        );

        let missing_sha = SetExternalStatusCheckStatusOptions {
            external_status_check_id: Some(5),
            ..Default::default()
        };
        assert!(matches!(
            missing_sha.validate(),
            Err(GitLabError::MissingField { field: "sha", .. })
        ));

        let missing_id = SetExternalStatusCheckStatusOptions {
            sha: Some("abc123".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            missing_id.validate(),
            Err(GitLabError::MissingField {
                field: "external_status_check_id",
                ..
            })
        ));
    }

    #[test]
    fn test_create_validation() {
        let opts = CreateExternalStatusCheckOptions::new("Compliance", "https://example.com/hook")
            .with_protected_branch_ids(vec![14]);
        assert!(opts.validate().is_ok());

        let opts = CreateExternalStatusCheckOptions {
            name: Some("Compliance".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            opts.validate(),
            Err(GitLabError::MissingField {
                field: "external_url",
                ..
            })
        ));
    }
}
