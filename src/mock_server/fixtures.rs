//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use chrono::{TimeZone, Utc};

use super::state::MockMergeRequest;
use crate::{ProjectStatusCheck, StatusCheckProtectedBranch};

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// The default set of fixtures loaded by [`MockServer::start`](super::MockServer::start).
#[derive(Debug, Clone)]
pub struct DefaultScenario {
    /// `(id, path)` pairs.
    pub projects: Vec<(u64, String)>,
    pub protected_branches: Vec<StatusCheckProtectedBranch>,
    pub status_checks: Vec<ProjectStatusCheck>,
    pub merge_requests: Vec<MockMergeRequest>,
}

impl Fixtures {
    /// Head SHA of merge request !7 in the default scenario.
    pub const MR_7_SHA: &'static str = "6104942438c14ec7bd21c6cd5bd995272b3faff6";
    /// Head SHA of merge request !8 in the default scenario.
    pub const MR_8_SHA: &'static str = "e83c5163316f89bfbde7d9ab23ca2e25604af290";

    /// Create a protected branch.
    pub fn protected_branch(id: u64, project_id: u64, name: &str) -> StatusCheckProtectedBranch {
        let created = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).single();
        StatusCheckProtectedBranch {
            id,
            project_id,
            name: name.to_string(),
            created_at: created,
            updated_at: created,
            code_owner_approval_required: false,
        }
    }

    /// Create a status check scoped to the given branches (empty = all branches).
    pub fn status_check(
        id: u64,
        project_id: u64,
        name: &str,
        external_url: &str,
        protected_branches: Vec<StatusCheckProtectedBranch>,
    ) -> ProjectStatusCheck {
        ProjectStatusCheck {
            id,
            name: name.to_string(),
            project_id,
            external_url: external_url.to_string(),
            protected_branches,
        }
    }

    /// Create a merge request.
    pub fn merge_request(project_id: u64, iid: u64, sha: &str, target_branch: &str) -> MockMergeRequest {
        MockMergeRequest {
            project_id,
            iid,
            sha: sha.to_string(),
            target_branch: target_branch.to_string(),
        }
    }

    /// A project `acme/widgets` (ID 1) with two protected branches, two
    /// checks and two open merge requests, plus an empty project `acme/empty` (ID 2).
    pub fn default_scenario() -> DefaultScenario {
        let main = Self::protected_branch(10, 1, "main");
        let release = Self::protected_branch(11, 1, "release");

        DefaultScenario {
            projects: vec![(1, "acme/widgets".to_string()), (2, "acme/empty".to_string())],
            protected_branches: vec![main.clone(), release],
            status_checks: vec![
                Self::status_check(1, 1, "Compliance", "https://compliance.example.com/hook", vec![]),
                Self::status_check(2, 1, "Security scan", "https://security.example.com/hook", vec![main]),
            ],
            merge_requests: vec![
                Self::merge_request(1, 7, Self::MR_7_SHA, "main"),
                Self::merge_request(1, 8, Self::MR_8_SHA, "develop"),
            ],
        }
    }
}
