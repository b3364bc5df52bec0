//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the glstatus binary.

use std::str::FromStr;

use clap::{ArgAction, Parser, Subcommand};

use crate::{GitLabError, ProjectId, UpdateExternalStatusCheckOptions};

/// GitLab external status checks command-line interface.
#[derive(Parser, Debug)]
#[command(name = "glstatus", about = "GitLab external status checks CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// GitLab API root, e.g. https://gitlab.example.com/api/v4.
    #[arg(long, global = true, env = "GITLAB_API_URL")]
    pub api_url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List a project's status checks, or their status on a merge request.
    List {
        /// Project ID or namespaced path (e.g. my-group/my-project).
        #[arg(value_parser = ProjectId::from_str)]
        project: ProjectId,

        /// Merge request IID; lists per-merge-request statuses when given.
        #[arg(long = "mr")]
        merge_request_iid: Option<u64>,

        /// Page number (1-indexed).
        #[arg(long)]
        page: Option<u32>,

        /// Number of items per page.
        #[arg(long)]
        per_page: Option<u32>,

        /// Fetch every page.
        #[arg(long, conflicts_with = "page")]
        all: bool,
    },

    /// Record the status of a check against a merge request commit.
    SetStatus {
        /// Project ID or namespaced path.
        #[arg(value_parser = ProjectId::from_str)]
        project: ProjectId,

        /// Merge request IID.
        merge_request_iid: u64,

        /// Head commit SHA of the merge request.
        #[arg(long)]
        sha: String,

        /// ID of the external status check.
        #[arg(long)]
        check_id: u64,

        /// Status to record (passed or failed).
        #[arg(long)]
        status: Option<String>,
    },

    /// Create an external status check.
    Create {
        /// Project ID or namespaced path.
        #[arg(value_parser = ProjectId::from_str)]
        project: ProjectId,

        /// Display name of the check.
        #[arg(long)]
        name: String,

        /// URL GitLab notifies when a merge request changes.
        #[arg(long)]
        url: String,

        /// Protected branch ID to scope the check to (repeatable).
        #[arg(long = "branch-id")]
        branch_ids: Vec<u64>,
    },

    /// Update an external status check.
    Update {
        /// Project ID or namespaced path.
        #[arg(value_parser = ProjectId::from_str)]
        project: ProjectId,

        /// ID of the external status check.
        check_id: u64,

        /// New display name.
        #[arg(long)]
        name: Option<String>,

        /// New external URL.
        #[arg(long)]
        url: Option<String>,

        /// Replace the protected branch scoping (repeatable).
        #[arg(long = "branch-id", conflicts_with = "clear_branches")]
        branch_ids: Vec<u64>,

        /// Remove all protected branch scoping.
        #[arg(long)]
        clear_branches: bool,
    },

    /// Delete an external status check.
    Delete {
        /// Project ID or namespaced path.
        #[arg(value_parser = ProjectId::from_str)]
        project: ProjectId,

        /// ID of the external status check.
        check_id: u64,
    },
}

/// Build update options from the `update` subcommand's flags.
///
/// `--clear-branches` sends an explicit empty branch list.
///
/// # Errors
///
/// Returns `InvalidArgument` when no field would change.
pub fn update_options(
    name: Option<String>,
    url: Option<String>,
    branch_ids: Vec<u64>,
    clear_branches: bool,
) -> crate::Result<UpdateExternalStatusCheckOptions> {
    let protected_branch_ids = if clear_branches {
        Some(Vec::new())
    } else if branch_ids.is_empty() {
        None
    } else {
        Some(branch_ids)
    };

    let options = UpdateExternalStatusCheckOptions {
        name,
        external_url: url,
        protected_branch_ids,
    };
    if options.is_empty() {
        return Err(GitLabError::InvalidArgument(
            "nothing to update; pass --name, --url, --branch-id or --clear-branches".to_string(),
        ));
    }
    Ok(options)
}
