use std::error::Error;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::cli::commands::{
    AddArgs, Cli, Commands, EditArgs, IdArg, ListArgs, MvArgs, ProjectAddArgs, ProjectEditArgs,
    ProjectsAction, ProjectsCmd, ShowArgs,
};
use crate::cli::output;
use crate::io::config_io::{self, Config};
use crate::io::snapshot::{read_snapshot, write_snapshot};
use crate::model::entity::Priority;
use crate::model::filter::{FilterSpec, SortKey, SortOrder};
use crate::model::project::{Project, ProjectDraft, ProjectPatch, ProjectStatus};
use crate::model::task::{Task, TaskDraft, TaskPatch, TaskStatus};
use crate::remote::http::HttpRemote;
use crate::store::{EntityStore, ProjectStore, TaskStore};

type CliResult = Result<(), Box<dyn Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CliResult {
    let config = load_config(cli.config.as_deref())?;
    let json = cli.json;

    match cli.command {
        Commands::Sync => cmd_sync(&config),
        Commands::List(args) => cmd_list(&config, args, json),
        Commands::Show(args) => cmd_show(&config, args, json),
        Commands::Add(args) => cmd_add(&config, args),
        Commands::Edit(args) => cmd_edit(&config, args),
        Commands::Done(args) => cmd_done(&config, args),
        Commands::Rm(args) => cmd_rm(&config, args),
        Commands::Mv(args) => cmd_mv(&config, args),
        Commands::Projects(args) => cmd_projects(&config, args, json),
    }
}

fn load_config(override_path: Option<&str>) -> Result<Config, Box<dyn Error>> {
    let path = match override_path {
        Some(p) => PathBuf::from(p),
        None => config_io::default_config_path()
            .ok_or("could not determine the platform config directory")?,
    };
    Ok(config_io::read_config(&path)?)
}

// ---------------------------------------------------------------------------
// Store lifecycle
// ---------------------------------------------------------------------------

fn open_task_store(config: &Config) -> TaskStore<HttpRemote<Task>> {
    let remote = HttpRemote::new(config.remote.base_url.clone());
    match read_snapshot(&config.tasks_path()) {
        Some(snapshot) => EntityStore::from_snapshot(remote, snapshot),
        None => EntityStore::new(remote),
    }
}

fn open_project_store(config: &Config) -> ProjectStore<HttpRemote<Project>> {
    let remote = HttpRemote::new(config.remote.base_url.clone());
    match read_snapshot(&config.projects_path()) {
        Some(snapshot) => EntityStore::from_snapshot(remote, snapshot),
        None => EntityStore::new(remote),
    }
}

fn save_tasks(config: &Config, store: &TaskStore<HttpRemote<Task>>) -> CliResult {
    write_snapshot(&config.tasks_path(), &store.snapshot())?;
    Ok(())
}

fn save_projects(config: &Config, store: &ProjectStore<HttpRemote<Project>>) -> CliResult {
    write_snapshot(&config.projects_path(), &store.snapshot())?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_sync(config: &Config) -> CliResult {
    let mut tasks = open_task_store(config);
    tasks.fetch_all();
    if let Some(err) = tasks.error() {
        return Err(err.to_string().into());
    }
    save_tasks(config, &tasks)?;

    let mut projects = open_project_store(config);
    projects.fetch_all();
    if let Some(err) = projects.error() {
        return Err(err.to_string().into());
    }
    save_projects(config, &projects)?;

    println!(
        "synced {} tasks, {} projects",
        tasks.entities().len(),
        projects.entities().len()
    );
    Ok(())
}

fn cmd_list(config: &Config, args: ListArgs, json: bool) -> CliResult {
    let mut store = open_task_store(config);

    let filter = FilterSpec::<Task> {
        statuses: args
            .status
            .iter()
            .map(|s| parse_task_status(s))
            .collect::<Result<_, _>>()?,
        priorities: args
            .priority
            .iter()
            .map(|s| parse_priority(s))
            .collect::<Result<_, _>>()?,
        project_id: args.project,
        goal_id: args.goal,
        assignee_id: args.assignee,
        due_from: args.due_from.as_deref().map(parse_date).transpose()?,
        due_to: args.due_to.as_deref().map(parse_date).transpose()?,
    };
    store.set_filter(filter);
    store.set_search_query(args.search.unwrap_or_default());
    if let Some(sort) = args.sort.as_deref() {
        store.set_sort_key(parse_sort_key(sort)?);
    }
    store.set_sort_order(if args.desc {
        SortOrder::Desc
    } else {
        SortOrder::Asc
    });

    output::print_tasks(store.filtered(), json)?;
    // filter/sort preferences are part of the persisted state
    save_tasks(config, &store)
}

fn cmd_show(config: &Config, args: ShowArgs, json: bool) -> CliResult {
    let mut store = open_task_store(config);
    if args.refresh {
        store.fetch_one(&args.id);
        if let Some(err) = store.error() {
            return Err(err.to_string().into());
        }
        let task = store.current().ok_or("task not found")?;
        return Ok(output::print_task_detail(task, json)?);
    }
    let task = store
        .entities()
        .iter()
        .find(|t| t.id == args.id)
        .ok_or_else(|| format!("task not found: {} (try `td sync`)", args.id))?;
    output::print_task_detail(task, json)?;
    Ok(())
}

fn cmd_add(config: &Config, args: AddArgs) -> CliResult {
    let mut store = open_task_store(config);
    let draft = TaskDraft {
        title: args.title,
        description: args.description,
        priority: args.priority.as_deref().map(parse_priority).transpose()?,
        due_date: args.due.as_deref().map(parse_date).transpose()?,
        tags: args.tag,
        project_id: args.project,
        ..Default::default()
    };
    let created = store.create(draft)?;
    save_tasks(config, &store)?;
    println!("added {}", created.id);
    Ok(())
}

fn cmd_edit(config: &Config, args: EditArgs) -> CliResult {
    let mut store = open_task_store(config);
    let patch = TaskPatch {
        title: args.title,
        description: args.description,
        status: args.status.as_deref().map(parse_task_status).transpose()?,
        priority: args.priority.as_deref().map(parse_priority).transpose()?,
        due_date: args.due.as_deref().map(parse_date).transpose()?,
        assignee_id: args.assignee,
        ..Default::default()
    };
    store.update(&args.id, patch)?;
    save_tasks(config, &store)?;
    println!("updated {}", args.id);
    Ok(())
}

fn cmd_done(config: &Config, args: IdArg) -> CliResult {
    let mut store = open_task_store(config);
    store.update(
        &args.id,
        TaskPatch {
            status: Some(TaskStatus::Done),
            ..Default::default()
        },
    )?;
    save_tasks(config, &store)?;
    println!("done {}", args.id);
    Ok(())
}

fn cmd_rm(config: &Config, args: IdArg) -> CliResult {
    let mut store = open_task_store(config);
    store.delete(&args.id)?;
    save_tasks(config, &store)?;
    println!("deleted {}", args.id);
    Ok(())
}

fn cmd_mv(config: &Config, args: MvArgs) -> CliResult {
    let mut store = open_task_store(config);
    if args.from >= store.entities().len() || args.to >= store.entities().len() {
        return Err(format!(
            "position out of range (have {} tasks)",
            store.entities().len()
        )
        .into());
    }
    store.reorder(args.from, args.to);
    let ordered = store.entities().to_vec();
    store.persist_order(ordered)?;
    save_tasks(config, &store)?;
    println!("moved {} -> {}", args.from, args.to);
    Ok(())
}

fn cmd_projects(config: &Config, cmd: ProjectsCmd, json: bool) -> CliResult {
    match cmd.action {
        None | Some(ProjectsAction::List) => {
            let store = open_project_store(config);
            output::print_projects(store.filtered(), json)?;
            Ok(())
        }
        Some(ProjectsAction::Add(args)) => cmd_project_add(config, args),
        Some(ProjectsAction::Edit(args)) => cmd_project_edit(config, args),
        Some(ProjectsAction::Rm(args)) => {
            let mut store = open_project_store(config);
            store.delete(&args.id)?;
            save_projects(config, &store)?;
            println!("deleted {}", args.id);
            Ok(())
        }
    }
}

fn cmd_project_add(config: &Config, args: ProjectAddArgs) -> CliResult {
    let mut store = open_project_store(config);
    let draft = ProjectDraft {
        name: args.name,
        description: args.description,
        priority: args.priority.as_deref().map(parse_priority).transpose()?,
        member_ids: args.member,
        ..Default::default()
    };
    let created = store.create(draft)?;
    save_projects(config, &store)?;
    println!("added {}", created.id);
    Ok(())
}

fn cmd_project_edit(config: &Config, args: ProjectEditArgs) -> CliResult {
    let mut store = open_project_store(config);
    let patch = ProjectPatch {
        name: args.name,
        status: args
            .status
            .as_deref()
            .map(parse_project_status)
            .transpose()?,
        member_ids: if args.member.is_empty() {
            None
        } else {
            Some(args.member)
        },
        ..Default::default()
    };
    store.update(&args.id, patch)?;
    save_projects(config, &store)?;
    println!("updated {}", args.id);
    Ok(())
}

// ---------------------------------------------------------------------------
// Arg parsing
// ---------------------------------------------------------------------------

fn parse_task_status(s: &str) -> Result<TaskStatus, String> {
    match s {
        "todo" => Ok(TaskStatus::Todo),
        "in_progress" => Ok(TaskStatus::InProgress),
        "done" => Ok(TaskStatus::Done),
        "archived" => Ok(TaskStatus::Archived),
        other => Err(format!(
            "unknown status '{}' (todo, in_progress, done, archived)",
            other
        )),
    }
}

fn parse_project_status(s: &str) -> Result<ProjectStatus, String> {
    match s {
        "planning" => Ok(ProjectStatus::Planning),
        "active" => Ok(ProjectStatus::Active),
        "on_hold" => Ok(ProjectStatus::OnHold),
        "done" => Ok(ProjectStatus::Done),
        "archived" => Ok(ProjectStatus::Archived),
        other => Err(format!(
            "unknown status '{}' (planning, active, on_hold, done, archived)",
            other
        )),
    }
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    match s {
        "low" => Ok(Priority::Low),
        "medium" => Ok(Priority::Medium),
        "high" => Ok(Priority::High),
        "urgent" => Ok(Priority::Urgent),
        other => Err(format!(
            "unknown priority '{}' (low, medium, high, urgent)",
            other
        )),
    }
}

fn parse_sort_key(s: &str) -> Result<SortKey, String> {
    match s {
        "order" => Ok(SortKey::Order),
        "created" => Ok(SortKey::Created),
        "due_date" | "due" => Ok(SortKey::DueDate),
        "priority" => Ok(SortKey::Priority),
        "title" => Ok(SortKey::Title),
        other => Err(format!(
            "unknown sort key '{}' (order, created, due_date, priority, title)",
            other
        )),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}' (expected YYYY-MM-DD)", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_statuses() {
        assert_eq!(parse_task_status("todo").unwrap(), TaskStatus::Todo);
        assert_eq!(
            parse_task_status("in_progress").unwrap(),
            TaskStatus::InProgress
        );
        assert!(parse_task_status("bogus").is_err());
    }

    #[test]
    fn parses_priorities() {
        assert_eq!(parse_priority("urgent").unwrap(), Priority::Urgent);
        assert!(parse_priority("critical").is_err());
    }

    #[test]
    fn parses_sort_keys_with_due_alias() {
        assert_eq!(parse_sort_key("due").unwrap(), SortKey::DueDate);
        assert_eq!(parse_sort_key("due_date").unwrap(), SortKey::DueDate);
        assert!(parse_sort_key("random").is_err());
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_date("2025-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
        assert!(parse_date("06/01/2025").is_err());
    }
}
