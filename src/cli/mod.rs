//! Command-line interface for `traq`.
//!
//! A thin exerciser over the store: every subcommand maps onto one store
//! operation. Output is plain text by default, JSON with `--json`.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use crate::config::StoreConfig;
use crate::error::Result;
use crate::model::{
    CreateIssueParams, CreateIssueTypeParams, CreateStatusParams, Issue, ListIssuesParams,
    MoveIssueParams, Priority, StatusCategory, UpdateIssueParams,
};
use crate::storage::SqliteStore;

#[derive(Parser)]
#[command(name = "traq", about = "Work-tracking backend core", version)]
pub struct Cli {
    /// Path to the SQLite database (default: ./traq.db, or $TRAQ_DB)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Emit JSON instead of plain text
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose diagnostics on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a project
    Init {
        name: String,
        /// Short uppercase project key, e.g. OPS
        key: String,
    },
    /// Add a status column to a project
    StatusAdd {
        project: String,
        name: String,
        #[arg(value_parser = parse_category)]
        category: StatusCategory,
    },
    /// List the status columns of a project
    Statuses { project: String },
    /// Add an issue type to a project
    TypeAdd {
        project: String,
        name: String,
        #[arg(long, default_value_t = 0)]
        level: i64,
    },
    /// Create an issue
    Create {
        project: String,
        title: String,
        #[arg(long = "type")]
        issue_type: String,
        #[arg(long)]
        status: String,
        #[arg(long)]
        reporter: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_parser = parse_priority)]
        priority: Option<Priority>,
        #[arg(long)]
        parent: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long, value_parser = parse_due_date)]
        due: Option<DateTime<Utc>>,
    },
    /// List active issues, board-ordered
    List {
        project: String,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
    },
    /// Show one issue (archived included)
    Show { project: String, issue: String },
    /// Update an issue's attributes
    Update {
        project: String,
        issue: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_parser = parse_priority, default_value = "medium")]
        priority: Priority,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long, value_parser = parse_due_date)]
        due: Option<DateTime<Utc>>,
    },
    /// Move an issue to a status column position
    Move {
        project: String,
        issue: String,
        /// Target position within the column (clamped)
        position: i64,
        /// Target status; omitted means "stay in the current status"
        #[arg(long)]
        status: Option<String>,
    },
    /// Archive an issue
    Archive { project: String, issue: String },
}

fn parse_category(s: &str) -> std::result::Result<StatusCategory, String> {
    s.parse().map_err(|e| format!("{e}"))
}

fn parse_priority(s: &str) -> std::result::Result<Priority, String> {
    s.parse().map_err(|e| format!("{e}"))
}

fn parse_due_date(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp: {e}"))
}

/// Execute a parsed command against the configured store.
///
/// # Errors
///
/// Surfaces store errors; the caller maps them to exit codes.
pub fn run(cli: Cli) -> Result<()> {
    let config = StoreConfig::resolve(cli.db.clone());
    let mut store = SqliteStore::open_with_timeout(&config.database, config.lock_timeout_ms)?;
    let json = cli.json;

    match cli.command {
        Commands::Init { name, key } => {
            let project = store.create_project(&name, &key)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&project)?);
            } else {
                println!("{}  {}  ({})", project.id, project.key, project.name);
            }
        }
        Commands::StatusAdd {
            project,
            name,
            category,
        } => {
            let status = store.create_status(&CreateStatusParams {
                project_id: project,
                name,
                category,
            })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("{}  {}  [{}] @{}", status.id, status.name, status.category, status.position);
            }
        }
        Commands::Statuses { project } => {
            let statuses = store.list_statuses(&project)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&statuses)?);
            } else {
                for s in statuses {
                    println!("{}  {}  [{}] @{}", s.id, s.name, s.category, s.position);
                }
            }
        }
        Commands::TypeAdd {
            project,
            name,
            level,
        } => {
            let issue_type = store.create_issue_type(&CreateIssueTypeParams {
                project_id: project,
                name,
                level,
            })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&issue_type)?);
            } else {
                println!("{}  {}  level {}", issue_type.id, issue_type.name, issue_type.level);
            }
        }
        Commands::Create {
            project,
            title,
            issue_type,
            status,
            reporter,
            description,
            priority,
            parent,
            assignee,
            due,
        } => {
            let issue = store.create_issue(&CreateIssueParams {
                project_id: project,
                issue_type_id: issue_type,
                status_id: status,
                title,
                reporter_id: reporter,
                description,
                priority,
                parent_issue_id: parent,
                assignee_id: assignee,
                due_date: due,
            })?;
            print_issue(&issue, json)?;
        }
        Commands::List {
            project,
            status,
            assignee,
        } => {
            let issues = store.list_issues(&ListIssuesParams {
                project_id: project,
                status_id: status,
                assignee_id: assignee,
            })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&issues)?);
            } else {
                for issue in issues {
                    println!(
                        "#{:<5} {:<10} @{:<3} {}",
                        issue.number, short(&issue.status_id), issue.status_position, issue.title
                    );
                }
            }
        }
        Commands::Show { project, issue } => {
            let issue = store.get_issue(&project, &issue)?;
            print_issue(&issue, json)?;
        }
        Commands::Update {
            project,
            issue,
            title,
            description,
            priority,
            assignee,
            due,
        } => {
            let issue = store.update_issue(&UpdateIssueParams {
                issue_id: issue,
                project_id: project,
                title,
                description,
                priority,
                assignee_id: assignee,
                due_date: due,
            })?;
            print_issue(&issue, json)?;
        }
        Commands::Move {
            project,
            issue,
            position,
            status,
        } => {
            store.move_issue(&MoveIssueParams {
                project_id: project,
                issue_id: issue,
                target_status_id: status,
                target_position: position,
            })?;
            if !json {
                println!("moved");
            }
        }
        Commands::Archive { project, issue } => {
            store.archive_issue(&project, &issue)?;
            if !json {
                println!("archived");
            }
        }
    }

    Ok(())
}

fn print_issue(issue: &Issue, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(issue)?);
    } else {
        println!(
            "#{} {} [{}] status {} @{}",
            issue.number,
            issue.title,
            issue.priority,
            short(&issue.status_id),
            issue.status_position
        );
    }
    Ok(())
}

fn short(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
