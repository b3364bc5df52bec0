//! MCP tool parameter types with JSON Schema support.
//!
//! `project` is taken as a raw JSON value so integer IDs and namespaced
//! paths are both accepted; anything else is rejected when the tool runs.

use schemars::JsonSchema;
use serde::Deserialize;

/// Parameters for the `list_status_checks` MCP tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListParams {
    /// Project ID (integer) or namespaced path (string, e.g. "group/project").
    pub project: serde_json::Value,
    /// Merge request IID. When set, lists the checks' status on that merge request.
    #[serde(default)]
    pub merge_request_iid: Option<u64>,
    /// Page number (1-indexed).
    #[serde(default)]
    pub page: Option<u32>,
    /// Number of items per page (max 100).
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// Parameters for the `set_status_check_status` MCP tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SetStatusParams {
    /// Project ID (integer) or namespaced path (string).
    pub project: serde_json::Value,
    /// Merge request IID.
    pub merge_request_iid: u64,
    /// Head commit SHA of the merge request.
    pub sha: String,
    /// ID of the external status check.
    pub external_status_check_id: u64,
    /// Status to record: "passed" or "failed".
    #[serde(default)]
    pub status: Option<String>,
}

/// Parameters for the `create_status_check` MCP tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateParams {
    /// Project ID (integer) or namespaced path (string).
    pub project: serde_json::Value,
    /// Display name of the check.
    pub name: String,
    /// URL GitLab notifies when a merge request changes.
    pub external_url: String,
    /// Protected branch IDs to scope the check to.
    #[serde(default)]
    pub protected_branch_ids: Option<Vec<u64>>,
}

/// Parameters for the `update_status_check` MCP tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateParams {
    /// Project ID (integer) or namespaced path (string).
    pub project: serde_json::Value,
    /// ID of the external status check.
    pub check_id: u64,
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New external URL.
    #[serde(default)]
    pub external_url: Option<String>,
    /// Replacement protected branch IDs; an empty list removes the scoping.
    #[serde(default)]
    pub protected_branch_ids: Option<Vec<u64>>,
}

/// Parameters for the `delete_status_check` MCP tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteParams {
    /// Project ID (integer) or namespaced path (string).
    pub project: serde_json::Value,
    /// ID of the external status check.
    pub check_id: u64,
}
