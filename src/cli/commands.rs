use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "td", about = concat!("taskdeck v", env!("CARGO_PKG_VERSION"), " - tasks and projects, synced"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the config file (default: platform config dir)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch tasks and projects from the remote
    Sync,
    /// List tasks from the local snapshot
    List(ListArgs),
    /// Show one task
    Show(ShowArgs),
    /// Add a task
    Add(AddArgs),
    /// Edit task fields
    Edit(EditArgs),
    /// Mark a task done (shortcut for edit <ID> --status done)
    Done(IdArg),
    /// Delete a task
    Rm(IdArg),
    /// Move a task to a new position and persist the order
    Mv(MvArgs),
    /// Project management
    Projects(ProjectsCmd),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Filter by status (todo, in_progress, done, archived; repeatable)
    #[arg(long)]
    pub status: Vec<String>,
    /// Filter by priority (low, medium, high, urgent; repeatable)
    #[arg(long)]
    pub priority: Vec<String>,
    /// Filter by project ID
    #[arg(long)]
    pub project: Option<String>,
    /// Filter by goal ID
    #[arg(long)]
    pub goal: Option<String>,
    /// Filter by assignee ID
    #[arg(long)]
    pub assignee: Option<String>,
    /// Due on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub due_from: Option<String>,
    /// Due on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub due_to: Option<String>,
    /// Search titles and descriptions
    #[arg(long)]
    pub search: Option<String>,
    /// Sort key (order, created, due_date, priority, title)
    #[arg(long)]
    pub sort: Option<String>,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Task ID to show
    pub id: String,
    /// Re-fetch this task from the remote first
    #[arg(long)]
    pub refresh: bool,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Description
    #[arg(long)]
    pub description: Option<String>,
    /// Priority (low, medium, high, urgent)
    #[arg(long)]
    pub priority: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
    /// Project ID
    #[arg(long)]
    pub project: Option<String>,
    /// Tag(s) to attach (repeatable)
    #[arg(long)]
    pub tag: Vec<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New description
    #[arg(long)]
    pub description: Option<String>,
    /// New status (todo, in_progress, done, archived)
    #[arg(long)]
    pub status: Option<String>,
    /// New priority (low, medium, high, urgent)
    #[arg(long)]
    pub priority: Option<String>,
    /// New due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
    /// New assignee ID
    #[arg(long)]
    pub assignee: Option<String>,
}

#[derive(Args)]
pub struct IdArg {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Current position (0-indexed, in the unfiltered list)
    pub from: usize,
    /// Target position (0-indexed)
    pub to: usize,
}

// ---------------------------------------------------------------------------
// Project management
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ProjectsCmd {
    #[command(subcommand)]
    pub action: Option<ProjectsAction>,
}

#[derive(Subcommand)]
pub enum ProjectsAction {
    /// List projects (default)
    List,
    /// Create a project
    Add(ProjectAddArgs),
    /// Edit a project
    Edit(ProjectEditArgs),
    /// Delete a project
    Rm(IdArg),
}

#[derive(Args)]
pub struct ProjectAddArgs {
    /// Project name
    pub name: String,
    /// Description
    #[arg(long)]
    pub description: Option<String>,
    /// Priority (low, medium, high, urgent)
    #[arg(long)]
    pub priority: Option<String>,
    /// Member ID(s) (repeatable)
    #[arg(long)]
    pub member: Vec<String>,
}

#[derive(Args)]
pub struct ProjectEditArgs {
    /// Project ID
    pub id: String,
    /// New name
    #[arg(long)]
    pub name: Option<String>,
    /// New status (planning, active, on_hold, done, archived)
    #[arg(long)]
    pub status: Option<String>,
    /// Replace the member list (repeatable)
    #[arg(long)]
    pub member: Vec<String>,
}
