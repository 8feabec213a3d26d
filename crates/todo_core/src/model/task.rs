use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    pub created_at: String,
    /// Calendar day (`YYYY-MM-DD`) the task is planned for.
    #[serde(default)]
    pub scheduled_date: Option<String>,
    /// Ids of tasks that must be done before this one may start.
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub completed_at: Option<String>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            priority: Priority::default(),
            status: TaskStatus::default(),
            created_at: String::new(),
            scheduled_date: None,
            dependencies: Vec::new(),
            archived: false,
            completed_at: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_scheduled_date(mut self, day: impl Into<String>) -> Self {
        self.scheduled_date = Some(day.into());
        self
    }

    pub fn with_dependency(mut self, id: impl Into<String>) -> Self {
        self.dependencies.push(id.into());
        self
    }

    pub fn archived(mut self) -> Self {
        self.archived = true;
        self
    }

    /// Eligible for a scheduling run: not archived and not yet done.
    pub fn is_schedulable(&self) -> bool {
        !self.archived && matches!(self.status, TaskStatus::Todo | TaskStatus::InProgress)
    }
}

/// Untriaged backlog entry, captured with nothing but a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboxItem {
    pub id: String,
    pub title: String,
    pub created_at: String,
}

impl InboxItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            created_at: String::new(),
        }
    }

    /// Promote to a full task. Inbox items are untriaged, so they always
    /// enter the schedule as low-priority todo work.
    pub fn materialize(&self) -> Task {
        Task {
            id: self.id.clone(),
            title: self.title.clone(),
            priority: Priority::Low,
            status: TaskStatus::Todo,
            created_at: self.created_at.clone(),
            scheduled_date: None,
            dependencies: Vec::new(),
            archived: false,
            completed_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Ordinal used for ordering and scoring: high=3, medium=2, low=1.
    pub fn weight(self) -> i64 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(AppError::invalid_input(format!(
                "unknown priority '{other}' (expected high, medium or low)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(AppError::invalid_input(format!(
                "unknown status '{other}' (expected todo, in_progress or done)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{InboxItem, Priority, Task, TaskStatus};

    #[test]
    fn priority_weights_are_ordinal() {
        assert!(Priority::High.weight() > Priority::Medium.weight());
        assert!(Priority::Medium.weight() > Priority::Low.weight());
        assert_eq!(Priority::Low.weight(), 1);
    }

    #[test]
    fn priority_parse_rejects_unknown_values() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        let err = "urgent".parse::<Priority>().unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn status_parse_accepts_dashed_form() {
        assert_eq!(
            "in-progress".parse::<TaskStatus>().unwrap(),
            TaskStatus::InProgress
        );
        assert!("blocked".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn unknown_priority_in_json_is_invalid() {
        let raw = r#"{"id":"t","title":"x","priority":"critical","created_at":""}"#;
        assert!(serde_json::from_str::<Task>(raw).is_err());
    }

    #[test]
    fn materialized_inbox_item_is_low_priority_todo() {
        let mut item = InboxItem::new("inbox-1", "call dentist");
        item.created_at = "2025-12-20T00:00:00Z".to_string();

        let task = item.materialize();
        assert_eq!(task.id, "inbox-1");
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.created_at, "2025-12-20T00:00:00Z");
        assert!(task.scheduled_date.is_none());
        assert!(task.is_schedulable());
    }

    #[test]
    fn done_and_archived_tasks_are_not_schedulable() {
        assert!(!Task::new("a", "a").with_status(TaskStatus::Done).is_schedulable());
        assert!(!Task::new("b", "b").archived().is_schedulable());
        assert!(
            Task::new("c", "c")
                .with_status(TaskStatus::InProgress)
                .is_schedulable()
        );
    }
}
