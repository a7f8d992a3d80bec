//! The pure filter/sort pipeline behind the store's derived view.
//!
//! `apply` is a pure function of (entities, filter, search query, sort key,
//! sort order); the store recomputes the view through it after every
//! mutation, so the derived list can never drift from its inputs.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::model::entity::Entity;
use crate::model::filter::{FilterSpec, SortKey, SortOrder};

/// Compute the filtered, sorted view of `entities`.
pub fn apply<E: Entity>(
    entities: &[E],
    filter: &FilterSpec<E>,
    query: &str,
    sort_key: SortKey,
    sort_order: SortOrder,
) -> Vec<E> {
    let mut view: Vec<E> = entities
        .iter()
        .filter(|e| matches_query(*e, query) && matches_filter(*e, filter))
        .cloned()
        .collect();
    sort(&mut view, sort_key, sort_order);
    view
}

/// Case-insensitive substring match over title OR description.
/// An empty query matches everything.
fn matches_query<E: Entity>(entity: &E, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    if entity.title().to_lowercase().contains(&needle) {
        return true;
    }
    entity
        .description()
        .is_some_and(|d| d.to_lowercase().contains(&needle))
}

/// Every populated criterion is an independent AND.
fn matches_filter<E: Entity>(entity: &E, filter: &FilterSpec<E>) -> bool {
    if !filter.statuses.is_empty() && !filter.statuses.contains(&entity.status()) {
        return false;
    }
    if !filter.priorities.is_empty() && !filter.priorities.contains(&entity.priority()) {
        return false;
    }
    if let Some(project_id) = filter.project_id.as_deref() {
        if entity.project_id() != Some(project_id) {
            return false;
        }
    }
    if let Some(goal_id) = filter.goal_id.as_deref() {
        if entity.goal_id() != Some(goal_id) {
            return false;
        }
    }
    if let Some(assignee_id) = filter.assignee_id.as_deref() {
        if entity.assignee_id() != Some(assignee_id) {
            return false;
        }
    }
    if filter.has_due_window() {
        // entities without a due date never match an active window
        let Some(due) = entity.due_date() else {
            return false;
        };
        if filter.due_from.is_some_and(|from| due < from) {
            return false;
        }
        if filter.due_to.is_some_and(|to| due > to) {
            return false;
        }
    }
    true
}

fn sort<E: Entity>(view: &mut [E], key: SortKey, order: SortOrder) {
    match key {
        // Manual order: stable ascending, direction not applied
        SortKey::Order => view.sort_by_key(|e| e.order()),
        SortKey::Created => directed(view, order, |a, b| a.created_at().cmp(&b.created_at())),
        SortKey::DueDate => directed(view, order, |a, b| due_key(a).cmp(&due_key(b))),
        SortKey::Priority => directed(view, order, |a, b| {
            a.priority().rank().cmp(&b.priority().rank())
        }),
        SortKey::Title => directed(view, order, |a, b| {
            a.title().to_lowercase().cmp(&b.title().to_lowercase())
        }),
    }
}

fn directed<E>(view: &mut [E], order: SortOrder, cmp: impl Fn(&E, &E) -> Ordering) {
    match order {
        SortOrder::Asc => view.sort_by(|a, b| cmp(a, b)),
        SortOrder::Desc => view.sort_by(|a, b| cmp(b, a)),
    }
}

/// Missing due dates sort as infinitely late.
fn due_key<E: Entity>(entity: &E) -> NaiveDate {
    entity.due_date().unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entity::Priority;
    use crate::model::task::{Task, TaskStatus};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn task(id: &str, title: &str) -> Task {
        Task {
            id: id.into(),
            title: title.into(),
            description: None,
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            due_date: None,
            tags: Vec::new(),
            project_id: None,
            goal_id: None,
            assignee_id: None,
            order: 0,
            created_at: Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap(),
        }
    }

    fn ids(view: &[Task]) -> Vec<&str> {
        view.iter().map(|t| t.id.as_str()).collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_tasks() -> Vec<Task> {
        let mut a = task("t-1", "Write report");
        a.description = Some("Quarterly numbers".into());
        a.priority = Priority::Low;
        a.status = TaskStatus::Todo;
        a.project_id = Some("p-1".into());
        a.due_date = Some(date(2025, 6, 10));
        a.order = 0;

        let mut b = task("t-2", "Review budget");
        b.priority = Priority::Urgent;
        b.status = TaskStatus::InProgress;
        b.project_id = Some("p-1".into());
        b.assignee_id = Some("u-1".into());
        b.due_date = Some(date(2025, 6, 1));
        b.order = 1;

        let mut c = task("t-3", "Plan offsite");
        c.priority = Priority::High;
        c.status = TaskStatus::Done;
        c.project_id = Some("p-2".into());
        c.goal_id = Some("g-1".into());
        c.order = 2;

        vec![a, b, c]
    }

    fn no_filter() -> FilterSpec<Task> {
        FilterSpec::default()
    }

    // --- Search ---

    #[test]
    fn empty_query_matches_everything() {
        let tasks = sample_tasks();
        let view = apply(&tasks, &no_filter(), "", SortKey::Order, SortOrder::Asc);
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn query_is_case_insensitive_over_title() {
        let tasks = sample_tasks();
        let view = apply(&tasks, &no_filter(), "REVIEW", SortKey::Order, SortOrder::Asc);
        assert_eq!(ids(&view), vec!["t-2"]);
    }

    #[test]
    fn query_also_matches_description() {
        let tasks = sample_tasks();
        let view = apply(
            &tasks,
            &no_filter(),
            "quarterly",
            SortKey::Order,
            SortOrder::Asc,
        );
        assert_eq!(ids(&view), vec!["t-1"]);
    }

    // --- Filter conjunction: one criterion at a time ---

    #[test]
    fn filters_by_status_set() {
        let tasks = sample_tasks();
        let filter = FilterSpec::<Task> {
            statuses: vec![TaskStatus::Todo, TaskStatus::InProgress],
            ..Default::default()
        };
        let view = apply(&tasks, &filter, "", SortKey::Order, SortOrder::Asc);
        assert_eq!(ids(&view), vec!["t-1", "t-2"]);
    }

    #[test]
    fn filters_by_priority_set() {
        let tasks = sample_tasks();
        let filter = FilterSpec::<Task> {
            priorities: vec![Priority::Urgent],
            ..Default::default()
        };
        let view = apply(&tasks, &filter, "", SortKey::Order, SortOrder::Asc);
        assert_eq!(ids(&view), vec!["t-2"]);
    }

    #[test]
    fn filters_by_project_id() {
        let tasks = sample_tasks();
        let filter = FilterSpec::<Task> {
            project_id: Some("p-1".into()),
            ..Default::default()
        };
        let view = apply(&tasks, &filter, "", SortKey::Order, SortOrder::Asc);
        assert_eq!(ids(&view), vec!["t-1", "t-2"]);
    }

    #[test]
    fn filters_by_goal_id() {
        let tasks = sample_tasks();
        let filter = FilterSpec::<Task> {
            goal_id: Some("g-1".into()),
            ..Default::default()
        };
        let view = apply(&tasks, &filter, "", SortKey::Order, SortOrder::Asc);
        assert_eq!(ids(&view), vec!["t-3"]);
    }

    #[test]
    fn filters_by_assignee_id() {
        let tasks = sample_tasks();
        let filter = FilterSpec::<Task> {
            assignee_id: Some("u-1".into()),
            ..Default::default()
        };
        let view = apply(&tasks, &filter, "", SortKey::Order, SortOrder::Asc);
        assert_eq!(ids(&view), vec!["t-2"]);
    }

    #[test]
    fn due_window_is_inclusive() {
        let tasks = sample_tasks();
        let filter = FilterSpec::<Task> {
            due_from: Some(date(2025, 6, 1)),
            due_to: Some(date(2025, 6, 10)),
            ..Default::default()
        };
        let view = apply(&tasks, &filter, "", SortKey::Order, SortOrder::Asc);
        // t-3 has no due date and is excluded while the window is active
        assert_eq!(ids(&view), vec!["t-1", "t-2"]);
    }

    #[test]
    fn due_window_excludes_dates_outside_bounds() {
        let tasks = sample_tasks();
        let filter = FilterSpec::<Task> {
            due_from: Some(date(2025, 6, 5)),
            ..Default::default()
        };
        let view = apply(&tasks, &filter, "", SortKey::Order, SortOrder::Asc);
        assert_eq!(ids(&view), vec!["t-1"]);
    }

    #[test]
    fn criteria_combine_as_and() {
        let tasks = sample_tasks();
        let filter = FilterSpec::<Task> {
            statuses: vec![TaskStatus::Todo, TaskStatus::InProgress],
            project_id: Some("p-1".into()),
            priorities: vec![Priority::Urgent],
            ..Default::default()
        };
        let view = apply(&tasks, &filter, "", SortKey::Order, SortOrder::Asc);
        assert_eq!(ids(&view), vec!["t-2"]);
    }

    #[test]
    fn search_and_filter_combine() {
        let tasks = sample_tasks();
        let filter = FilterSpec::<Task> {
            project_id: Some("p-1".into()),
            ..Default::default()
        };
        let view = apply(&tasks, &filter, "report", SortKey::Order, SortOrder::Asc);
        assert_eq!(ids(&view), vec!["t-1"]);
    }

    // --- Sorting ---

    #[test]
    fn order_sort_restores_manual_positions() {
        // entities arrive with order [2, 0, 1]
        let mut tasks = sample_tasks();
        tasks[0].order = 2;
        tasks[1].order = 0;
        tasks[2].order = 1;
        let view = apply(&tasks, &no_filter(), "", SortKey::Order, SortOrder::Asc);
        assert_eq!(ids(&view), vec!["t-2", "t-3", "t-1"]);
        assert_eq!(
            view.iter().map(|t| t.order).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn order_sort_is_stable_on_ties() {
        let mut tasks = sample_tasks();
        for t in &mut tasks {
            t.order = 0;
        }
        let view = apply(&tasks, &no_filter(), "", SortKey::Order, SortOrder::Asc);
        // ties keep original relative position
        assert_eq!(ids(&view), vec!["t-1", "t-2", "t-3"]);
    }

    #[test]
    fn priority_desc_is_totally_ordered() {
        let tasks = sample_tasks();
        let view = apply(&tasks, &no_filter(), "", SortKey::Priority, SortOrder::Desc);
        assert_eq!(ids(&view), vec!["t-2", "t-3", "t-1"]);
        for pair in view.windows(2) {
            assert!(pair[0].priority.rank() >= pair[1].priority.rank());
        }
    }

    #[test]
    fn priority_asc_flips_direction() {
        let tasks = sample_tasks();
        let view = apply(&tasks, &no_filter(), "", SortKey::Priority, SortOrder::Asc);
        assert_eq!(ids(&view), vec!["t-1", "t-3", "t-2"]);
    }

    #[test]
    fn due_date_sort_puts_missing_dates_last() {
        let tasks = sample_tasks();
        let view = apply(&tasks, &no_filter(), "", SortKey::DueDate, SortOrder::Asc);
        assert_eq!(ids(&view), vec!["t-2", "t-1", "t-3"]);
    }

    #[test]
    fn title_sort_is_case_folded() {
        let mut tasks = sample_tasks();
        tasks[0].title = "apple".into();
        tasks[1].title = "Banana".into();
        tasks[2].title = "cherry".into();
        let view = apply(&tasks, &no_filter(), "", SortKey::Title, SortOrder::Asc);
        assert_eq!(ids(&view), vec!["t-1", "t-2", "t-3"]);
    }

    #[test]
    fn created_sort_uses_timestamp() {
        let mut tasks = sample_tasks();
        tasks[0].created_at = Utc.with_ymd_and_hms(2025, 5, 3, 9, 0, 0).unwrap();
        tasks[1].created_at = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
        tasks[2].created_at = Utc.with_ymd_and_hms(2025, 5, 2, 9, 0, 0).unwrap();
        let view = apply(&tasks, &no_filter(), "", SortKey::Created, SortOrder::Desc);
        assert_eq!(ids(&view), vec!["t-1", "t-3", "t-2"]);
    }

    // --- Idempotence ---

    #[test]
    fn apply_is_idempotent_with_unchanged_inputs() {
        let tasks = sample_tasks();
        let filter = FilterSpec::<Task> {
            statuses: vec![TaskStatus::Todo, TaskStatus::InProgress],
            ..Default::default()
        };
        let first = apply(&tasks, &filter, "e", SortKey::Priority, SortOrder::Desc);
        let second = apply(&tasks, &filter, "e", SortKey::Priority, SortOrder::Desc);
        assert_eq!(first, second);

        // applying to its own output changes nothing further
        let third = apply(&first, &filter, "e", SortKey::Priority, SortOrder::Desc);
        assert_eq!(first, third);
    }

    // --- The concrete two-task scenario ---

    #[test]
    fn priority_then_search_scenario() {
        let mut a = task("1", "A");
        a.priority = Priority::Low;
        a.order = 0;
        let mut b = task("2", "B");
        b.priority = Priority::Urgent;
        b.order = 1;
        let tasks = vec![a, b];

        let view = apply(&tasks, &no_filter(), "", SortKey::Priority, SortOrder::Desc);
        assert_eq!(ids(&view), vec!["2", "1"]);

        let view = apply(&tasks, &no_filter(), "A", SortKey::Priority, SortOrder::Desc);
        assert_eq!(ids(&view), vec!["1"]);
    }
}
