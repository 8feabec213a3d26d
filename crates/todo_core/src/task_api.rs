use crate::error::AppError;
use crate::graph::{unfinished_dependencies, would_create_cycle};
use crate::model::{InboxItem, Priority, Task, TaskStatus};
use crate::schedule::{
    ScheduleOptions, ScheduleResult, auto_schedule, format_day, smart_schedule, validate_config,
};
use crate::storage::json_store::{self, TaskState};
use std::collections::HashSet;
use std::path::Path;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::info;

pub fn add_task(title: &str, priority: Priority) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    add_task_with_path(&path, title, priority)
}

pub fn capture_inbox(title: &str) -> Result<InboxItem, AppError> {
    let path = json_store::store_path()?;
    capture_inbox_with_path(&path, title)
}

pub fn list_tasks(include_archived: bool) -> Result<Vec<Task>, AppError> {
    let path = json_store::store_path()?;
    list_tasks_with_path(&path, include_archived)
}

pub fn list_inbox() -> Result<Vec<InboxItem>, AppError> {
    let path = json_store::store_path()?;
    Ok(json_store::load_state(&path)?.inbox)
}

pub fn get_task_by_id(id: &str) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    get_task_by_id_with_path(&path, id)
}

pub fn add_dependency(id: &str, dependency_id: &str) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    add_dependency_with_path(&path, id, dependency_id)
}

pub fn start_task(id: &str) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    start_task_with_path(&path, id)
}

pub fn complete_task(id: &str) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    complete_task_with_path(&path, id)
}

pub fn archive_task(id: &str) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    archive_task_with_path(&path, id)
}

pub fn plan(options: &ScheduleOptions, dry_run: bool) -> Result<ScheduleResult, AppError> {
    let path = json_store::store_path()?;
    plan_with_path(&path, options, dry_run)
}

pub fn place_task(
    id: &str,
    options: &ScheduleOptions,
    dry_run: bool,
) -> Result<Option<Task>, AppError> {
    let path = json_store::store_path()?;
    place_task_with_path(&path, id, options, dry_run)
}

pub fn check_config(daily_capacity: i64) -> Result<Vec<String>, AppError> {
    let path = json_store::store_path()?;
    check_config_with_path(&path, daily_capacity)
}

fn now_rfc3339() -> Result<String, AppError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", OffsetDateTime::now_utc().unix_timestamp_nanos())
}

fn required<'a>(value: &'a str, name: &str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input(format!("{name} is required")));
    }
    Ok(trimmed)
}

fn task_not_found() -> AppError {
    AppError::invalid_input("task not found")
}

fn add_task_with_path(path: &Path, title: &str, priority: Priority) -> Result<Task, AppError> {
    let title = required(title, "title")?;

    let mut task = Task::new(new_id("task"), title).with_priority(priority);
    task.created_at = now_rfc3339()?;

    let mut state = json_store::load_state(path)?;
    state.tasks.push(task.clone());
    json_store::save_state(path, &state)?;

    Ok(task)
}

fn capture_inbox_with_path(path: &Path, title: &str) -> Result<InboxItem, AppError> {
    let title = required(title, "title")?;

    let mut item = InboxItem::new(new_id("inbox"), title);
    item.created_at = now_rfc3339()?;

    let mut state = json_store::load_state(path)?;
    state.inbox.push(item.clone());
    json_store::save_state(path, &state)?;

    Ok(item)
}

fn list_tasks_with_path(path: &Path, include_archived: bool) -> Result<Vec<Task>, AppError> {
    let tasks = json_store::load_state(path)?.tasks;
    Ok(tasks
        .into_iter()
        .filter(|task| include_archived || !task.archived)
        .collect())
}

fn get_task_by_id_with_path(path: &Path, id: &str) -> Result<Task, AppError> {
    let id = required(id, "id")?;
    json_store::load_state(path)?
        .find_task(id)
        .cloned()
        .ok_or_else(task_not_found)
}

fn add_dependency_with_path(
    path: &Path,
    id: &str,
    dependency_id: &str,
) -> Result<Task, AppError> {
    let id = required(id, "id")?;
    let dependency_id = required(dependency_id, "dependency id")?;

    let mut state = json_store::load_state(path)?;
    if state.find_task(dependency_id).is_none() {
        return Err(AppError::invalid_input("dependency task not found"));
    }
    let task = state.find_task(id).ok_or_else(task_not_found)?;
    if task.dependencies.iter().any(|dep| dep == dependency_id) {
        return Ok(task.clone());
    }
    if would_create_cycle(id, dependency_id, &state.tasks) {
        return Err(AppError::rejected("dependency would create a cycle"));
    }

    let task = state.find_task_mut(id).ok_or_else(task_not_found)?;
    task.dependencies.push(dependency_id.to_string());
    let updated = task.clone();
    json_store::save_state(path, &state)?;

    Ok(updated)
}

fn start_task_with_path(path: &Path, id: &str) -> Result<Task, AppError> {
    let id = required(id, "id")?;

    let mut state = json_store::load_state(path)?;
    let task = state.find_task(id).ok_or_else(task_not_found)?;
    if task.status == TaskStatus::Done {
        return Err(AppError::invalid_input("task already completed"));
    }
    let blocked_by = unfinished_dependencies(task, &state.tasks);
    if !blocked_by.is_empty() {
        return Err(AppError::rejected(format!(
            "task is blocked by: {}",
            blocked_by.join(", ")
        )));
    }

    let task = state.find_task_mut(id).ok_or_else(task_not_found)?;
    task.status = TaskStatus::InProgress;
    let updated = task.clone();
    json_store::save_state(path, &state)?;

    Ok(updated)
}

fn complete_task_with_path(path: &Path, id: &str) -> Result<Task, AppError> {
    let id = required(id, "id")?;
    let completed_at = now_rfc3339()?;

    let mut state = json_store::load_state(path)?;
    let task = state.find_task_mut(id).ok_or_else(task_not_found)?;
    if task.status == TaskStatus::Done {
        return Err(AppError::invalid_input("task already completed"));
    }
    task.status = TaskStatus::Done;
    task.completed_at = Some(completed_at);
    let updated = task.clone();
    json_store::save_state(path, &state)?;

    Ok(updated)
}

fn archive_task_with_path(path: &Path, id: &str) -> Result<Task, AppError> {
    let id = required(id, "id")?;

    let mut state = json_store::load_state(path)?;
    let task = state.find_task_mut(id).ok_or_else(task_not_found)?;
    task.archived = true;
    let updated = task.clone();
    json_store::save_state(path, &state)?;

    Ok(updated)
}

fn plan_with_path(
    path: &Path,
    options: &ScheduleOptions,
    dry_run: bool,
) -> Result<ScheduleResult, AppError> {
    let mut state = json_store::load_state(path)?;
    let result = auto_schedule(&state.tasks, &state.inbox, options);

    if !dry_run {
        apply_schedule(&mut state, &result);
        json_store::save_state(path, &state)?;
        info!(
            placed = result.placed,
            unplaced = result.unplaced.len(),
            "saved auto-schedule"
        );
    }

    Ok(result)
}

/// Write placed days back. Placed inbox items become tasks and leave the
/// inbox; anything unplaced keeps its previous state.
fn apply_schedule(state: &mut TaskState, result: &ScheduleResult) {
    let inbox_ids: HashSet<String> = state.inbox.iter().map(|item| item.id.clone()).collect();
    let mut promoted = HashSet::new();
    let mut new_tasks = Vec::new();

    for placed in &result.scheduled {
        if inbox_ids.contains(&placed.id) {
            promoted.insert(placed.id.clone());
            new_tasks.push(placed.clone());
        } else if let Some(task) = state.find_task_mut(&placed.id) {
            task.scheduled_date = placed.scheduled_date.clone();
        }
    }

    state.inbox.retain(|item| !promoted.contains(&item.id));
    state.tasks.extend(new_tasks);
}

fn place_task_with_path(
    path: &Path,
    id: &str,
    options: &ScheduleOptions,
    dry_run: bool,
) -> Result<Option<Task>, AppError> {
    let id = required(id, "id")?;

    let mut state = json_store::load_state(path)?;
    let task = state.find_task(id).ok_or_else(task_not_found)?;
    if !task.is_schedulable() {
        return Err(AppError::invalid_input("only open, unarchived tasks can be placed"));
    }

    let Some(day) = smart_schedule(task, &state.tasks, options) else {
        return Ok(None);
    };

    let task = state.find_task_mut(id).ok_or_else(task_not_found)?;
    task.scheduled_date = Some(format_day(day));
    let updated = task.clone();
    if !dry_run {
        json_store::save_state(path, &state)?;
    }

    Ok(Some(updated))
}

fn check_config_with_path(path: &Path, daily_capacity: i64) -> Result<Vec<String>, AppError> {
    let state = json_store::load_state(path)?;
    let backlog = state
        .tasks
        .iter()
        .filter(|task| task.is_schedulable())
        .count()
        + state.inbox.len();
    Ok(validate_config(daily_capacity, backlog))
}
