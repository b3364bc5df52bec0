//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{MergeStatusCheck, ProjectStatusCheck, ResponseMeta};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for ProjectStatusCheck {
    fn pretty_print(&self) -> String {
        let header = format!("Status check #{}: {}", self.id, self.name);
        let divider = "─".repeat(header.chars().count().max(30));

        let mut lines = vec![
            header,
            divider,
            format!("Project:        {}", self.project_id),
            format!("External URL:   {}", self.external_url),
        ];

        if self.applies_to_all_branches() {
            lines.push("Branches:       all".to_string());
        } else {
            lines.push(format!(
                "Branches:       {}",
                self.protected_branch_names().join(", ")
            ));
            for branch in &self.protected_branches {
                if branch.code_owner_approval_required {
                    lines.push(format!("                {} requires code owner approval", branch.name));
                }
            }
        }

        lines.join("\n")
    }
}

impl PrettyPrint for MergeStatusCheck {
    fn pretty_print(&self) -> String {
        let header = format!("Status check #{}: {}", self.id, self.name);
        let divider = "─".repeat(header.chars().count().max(30));

        [
            header,
            divider,
            format!("Status:         {}", self.status),
            format!("External URL:   {}", self.external_url),
        ]
        .join("\n")
    }
}

impl PrettyPrint for ResponseMeta {
    fn pretty_print(&self) -> String {
        let mut lines = vec![format!("HTTP {}", self.status)];

        if let Some(ref id) = self.request_id {
            lines.push(format!("Request ID:     {}", id));
        }

        if let (Some(remaining), Some(limit)) = (self.rate_limit.remaining, self.rate_limit.limit) {
            lines.push(format!("Rate limit:     {}/{} remaining", remaining, limit));
        }

        lines.join("\n")
    }
}
