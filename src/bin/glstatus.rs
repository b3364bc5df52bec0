//! GitLab external status checks CLI binary.
//!
//! A command-line interface for managing external status checks.

use clap::Parser;
use glstatus::cli::{update_options, Cli, Command};
use glstatus::output::PrettyPrint;
use glstatus::{
    CreateExternalStatusCheckOptions, GitLabClient, GitLabError, List, ListOptions,
    MergeRequestRef, MergeStatusCheck, Page, ProjectStatusCheck,
    SetExternalStatusCheckStatusOptions,
};
use serde::Serialize;
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let client = match build_client(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set GITLAB_TOKEN environment variable");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build_client(cli: &Cli) -> glstatus::Result<GitLabClient> {
    match cli.api_url.as_deref() {
        Some(url) => {
            let token = std::env::var("GITLAB_TOKEN").map_err(|_| {
                GitLabError::ConfigMissing("GITLAB_TOKEN environment variable not set".to_string())
            })?;
            GitLabClient::new(&token, url)
        }
        None => GitLabClient::from_env(),
    }
}

async fn run(client: &GitLabClient, cli: Cli) -> glstatus::Result<()> {
    let checks = client.external_status_checks();

    match cli.command {
        Command::List {
            project,
            merge_request_iid,
            page,
            per_page,
            all,
        } => {
            let options = ListOptions { page, per_page };
            match merge_request_iid {
                Some(iid) => {
                    let query = MergeRequestRef::new(project, iid);
                    if all {
                        let items = MergeStatusCheck::list_all(client, &query).await?;
                        output_items(&items, cli.json, |c| MergeStatusCheckRow::from(c))?;
                    } else {
                        let page = MergeStatusCheck::list_page(client, &query, &options).await?;
                        output_page(&page, cli.json, |c| MergeStatusCheckRow::from(c))?;
                    }
                }
                None => {
                    if all {
                        let items = ProjectStatusCheck::list_all(client, &project).await?;
                        output_items(&items, cli.json, |c| ProjectStatusCheckRow::from(c))?;
                    } else {
                        let page = ProjectStatusCheck::list_page(client, &project, &options).await?;
                        output_page(&page, cli.json, |c| ProjectStatusCheckRow::from(c))?;
                    }
                }
            }
        }
        Command::SetStatus {
            project,
            merge_request_iid,
            sha,
            check_id,
            status,
        } => {
            let mut options = SetExternalStatusCheckStatusOptions::new(sha, check_id);
            options.status = status;
            let meta = checks
                .set_external_status_check_status(project, merge_request_iid, &options)
                .await?;
            output_single(&meta, cli.json)?;
        }
        Command::Create {
            project,
            name,
            url,
            branch_ids,
        } => {
            let mut options = CreateExternalStatusCheckOptions::new(name, url);
            if !branch_ids.is_empty() {
                options.protected_branch_ids = Some(branch_ids);
            }
            let meta = checks.create_external_status_check(project, &options).await?;
            output_single(&meta, cli.json)?;
        }
        Command::Update {
            project,
            check_id,
            name,
            url,
            branch_ids,
            clear_branches,
        } => {
            let options = update_options(name, url, branch_ids, clear_branches)?;
            let meta = checks
                .update_external_status_check(project, check_id, &options)
                .await?;
            output_single(&meta, cli.json)?;
        }
        Command::Delete { project, check_id } => {
            let meta = checks.delete_external_status_check(project, check_id).await?;
            output_single(&meta, cli.json)?;
        }
    }
    Ok(())
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> glstatus::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_items<T, R, F>(items: &[T], json: bool, to_row: F) -> glstatus::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\n{} total", items.len());
    }
    Ok(())
}

fn output_page<T, R, F>(page: &Page<T>, json: bool, to_row: F) -> glstatus::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(&page.items)?);
    } else {
        let rows: Vec<R> = page.items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        match (page.total_pages, page.total) {
            (Some(pages), Some(total)) => {
                println!("\nPage {}/{} ({} total items)", page.page, pages, total)
            }
            _ if page.has_more => println!("\nPage {} (more available)", page.page),
            _ => println!("\nPage {} (end)", page.page),
        }
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct ProjectStatusCheckRow {
    id: u64,
    name: String,
    external_url: String,
    branches: String,
}

impl From<&ProjectStatusCheck> for ProjectStatusCheckRow {
    fn from(c: &ProjectStatusCheck) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            external_url: c.external_url.clone(),
            branches: if c.applies_to_all_branches() {
                "all".to_string()
            } else {
                c.protected_branch_names().join(", ")
            },
        }
    }
}

#[derive(Tabled)]
struct MergeStatusCheckRow {
    id: u64,
    name: String,
    status: String,
    external_url: String,
}

impl From<&MergeStatusCheck> for MergeStatusCheckRow {
    fn from(c: &MergeStatusCheck) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            status: c.status.clone(),
            external_url: c.external_url.clone(),
        }
    }
}
