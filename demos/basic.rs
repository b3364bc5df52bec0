//! Basic example demonstrating the GitLab external status checks client.
//!
//! Run with:
//! ```
//! GITLAB_TOKEN=your-token cargo run --example basic -- group/project 7
//! ```

use glstatus::{GitLabClient, List, MergeRequestRef, ProjectId, ProjectStatusCheck};

#[tokio::main]
async fn main() -> glstatus::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let project: ProjectId = args
        .next()
        .unwrap_or_else(|| "gitlab-org/gitlab".to_string())
        .parse()?;
    let merge_request_iid: Option<u64> = args.next().and_then(|a| a.parse().ok());

    // Create client from environment variables
    println!("Creating GitLab client...");
    let client = GitLabClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    // List every check defined on the project
    println!("\n--- Status checks on {project} ---");
    let checks = ProjectStatusCheck::list_all(&client, &project).await?;
    println!("Found {} checks", checks.len());

    for check in &checks {
        let scope = if check.applies_to_all_branches() {
            "all branches".to_string()
        } else {
            check.protected_branch_names().join(", ")
        };
        println!("  #{} {} -> {} ({})", check.id, check.name, check.external_url, scope);
    }

    // Show their status on a merge request
    if let Some(iid) = merge_request_iid {
        println!("\n--- Status on !{iid} ---");
        let query = MergeRequestRef::new(project, iid);
        let statuses = glstatus::MergeStatusCheck::list_all(&client, &query).await?;

        for status in &statuses {
            println!("  {:<30} {}", status.name, status.status);
        }

        let pending = statuses.iter().filter(|s| s.is_pending()).count();
        println!("{pending} of {} checks still pending", statuses.len());
    }

    println!("\nDone!");
    Ok(())
}
