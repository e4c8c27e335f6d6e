//! Command-line front end for data project lifecycle operations.
//!
//! # Responsibility
//! - Resolve configuration and the calling principal from flags/env.
//! - Wire SQLite store and GitLab client into the lifecycle manager.
//! - Print results as JSON DTOs; print failures with their HTTP status.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dataproject_core::db::open_db;
use dataproject_core::{
    default_log_level, init_logging, AppConfig, DataProjectDto, ErrorDto, GitlabConfig,
    GitlabRestClient, LifecycleError, Principal, ProjectLifecycleManager, RemoteCounterpart,
    SqliteDataProjectStore,
};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

/// Manage data projects backed by GitLab repositories
#[derive(Parser, Debug)]
#[command(name = "dataproject")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "DATAPROJECT_DB", default_value = "dataproject.sqlite3", global = true)]
    db: PathBuf,

    /// GitLab instance root URL
    #[arg(
        long,
        env = "GITLAB_URL",
        default_value = "http://localhost:10080",
        global = true
    )]
    gitlab_url: String,

    /// GitLab request timeout in seconds
    #[arg(long, env = "GITLAB_TIMEOUT_SECS", default_value_t = 30, global = true)]
    gitlab_timeout: u64,

    /// Personal access token of the calling person
    #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Id of the calling person
    #[arg(long, env = "DATAPROJECT_PERSON_ID", global = true)]
    person_id: Option<Uuid>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "DATAPROJECT_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files (stderr when unset)
    #[arg(long, env = "DATAPROJECT_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a data project and its GitLab repository
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List own data projects
    List,
    /// Show one data project
    Get { id: Uuid },
    /// Change name and description of a data project
    Update {
        id: Uuid,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete a data project and its GitLab repository
    Delete { id: Uuid },
    /// Check whether the GitLab repository of a data project still exists
    Verify { id: Uuid },
    /// Print the core version
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(lifecycle) = err.downcast_ref::<LifecycleError>() {
                let body = ErrorDto::from(lifecycle);
                match serde_json::to_string_pretty(&body) {
                    Ok(json) => eprintln!("{json}"),
                    Err(_) => eprintln!("error ({}): {lifecycle}", body.status),
                }
            } else {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if matches!(cli.command, Command::Version) {
        println!("dataproject_core version={}", dataproject_core::core_version());
        return Ok(());
    }

    let mut config = AppConfig {
        db_path: cli.db,
        gitlab: GitlabConfig {
            timeout_secs: cli.gitlab_timeout,
            ..GitlabConfig::new(cli.gitlab_url)
        },
        log_level: cli
            .log_level
            .unwrap_or_else(|| default_log_level().to_string()),
        log_dir: cli.log_dir,
    };
    config.validate().context("invalid configuration")?;
    init_logging(&config.log_level, config.log_dir.as_deref())
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;

    let principal = Principal::new(
        cli.person_id
            .context("--person-id (or DATAPROJECT_PERSON_ID) is required")?,
        cli.token
            .context("--token (or GITLAB_TOKEN) is required")?,
    );

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    let store = SqliteDataProjectStore::new(&conn);
    let remote = GitlabRestClient::new(config.gitlab.clone())?;
    let manager = ProjectLifecycleManager::new(store, remote);
    info!(
        "event=cli_start module=cli status=ok principal_id={}",
        principal.person_id
    );

    match cli.command {
        Command::Create { name, description } => {
            let project = manager.create(&principal, &name, &description)?;
            print_json(&DataProjectDto::from(project))
        }
        Command::List => {
            let projects = manager
                .list(&principal)?
                .into_iter()
                .map(DataProjectDto::from)
                .collect::<Vec<_>>();
            print_json(&projects)
        }
        Command::Get { id } => print_json(&DataProjectDto::from(manager.get(&principal, id)?)),
        Command::Update {
            id,
            name,
            description,
        } => {
            let project = manager.update(&principal, id, &name, &description)?;
            print_json(&DataProjectDto::from(project))
        }
        Command::Delete { id } => {
            manager.delete(&principal, id)?;
            println!("deleted {id}");
            Ok(())
        }
        Command::Verify { id } => match manager.verify_remote(&principal, id)? {
            RemoteCounterpart::Present(remote) => print_json(&remote),
            RemoteCounterpart::Missing => {
                println!("remote repository missing for {id}");
                Ok(())
            }
        },
        Command::Version => Ok(()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
