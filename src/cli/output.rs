use crate::model::entity::Priority;
use crate::model::project::{Project, ProjectStatus};
use crate::model::task::{Task, TaskStatus};

/// The character shown inside the status checkbox `[ ]`
fn task_status_char(status: TaskStatus) -> char {
    match status {
        TaskStatus::Todo => ' ',
        TaskStatus::InProgress => '>',
        TaskStatus::Done => 'x',
        TaskStatus::Archived => '~',
    }
}

fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "low",
        Priority::Medium => "med",
        Priority::High => "high",
        Priority::Urgent => "URG!",
    }
}

fn project_status_label(status: ProjectStatus) -> &'static str {
    match status {
        ProjectStatus::Planning => "planning",
        ProjectStatus::Active => "active",
        ProjectStatus::OnHold => "on hold",
        ProjectStatus::Done => "done",
        ProjectStatus::Archived => "archived",
    }
}

pub fn print_tasks(tasks: &[Task], json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(tasks)?);
        return Ok(());
    }
    for task in tasks {
        let due = task
            .due_date
            .map(|d| format!("  due {}", d))
            .unwrap_or_default();
        println!(
            "[{}] {}  ({}) {}{}",
            task_status_char(task.status),
            task.id,
            priority_label(task.priority),
            task.title,
            due
        );
    }
    Ok(())
}

pub fn print_task_detail(task: &Task, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(task)?);
        return Ok(());
    }
    println!("[{}] {}  {}", task_status_char(task.status), task.id, task.title);
    println!("  priority: {}", priority_label(task.priority));
    if let Some(desc) = &task.description {
        println!("  description: {}", desc);
    }
    if let Some(due) = task.due_date {
        println!("  due: {}", due);
    }
    if !task.tags.is_empty() {
        println!("  tags: {}", task.tags.join(", "));
    }
    if let Some(project_id) = &task.project_id {
        println!("  project: {}", project_id);
    }
    if let Some(assignee_id) = &task.assignee_id {
        println!("  assignee: {}", assignee_id);
    }
    println!("  created: {}", task.created_at.format("%Y-%m-%d %H:%M"));
    Ok(())
}

pub fn print_projects(projects: &[Project], json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(projects)?);
        return Ok(());
    }
    for project in projects {
        println!(
            "{}  [{}] ({}) {}  ({} members)",
            project.id,
            project_status_label(project.status),
            priority_label(project.priority),
            project.name,
            project.member_ids.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_chars_are_distinct() {
        let chars = [
            task_status_char(TaskStatus::Todo),
            task_status_char(TaskStatus::InProgress),
            task_status_char(TaskStatus::Done),
            task_status_char(TaskStatus::Archived),
        ];
        for (i, a) in chars.iter().enumerate() {
            for b in &chars[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
