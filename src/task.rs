use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub i64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    Ongoing,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::NotStarted,
        TaskStatus::Ongoing,
        TaskStatus::Completed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not Started",
            TaskStatus::Ongoing => "Ongoing",
            TaskStatus::Completed => "Completed",
        }
    }

    pub fn next(self) -> Self {
        match self {
            TaskStatus::NotStarted => TaskStatus::Ongoing,
            TaskStatus::Ongoing => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::NotStarted,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            TaskStatus::NotStarted => TaskStatus::Completed,
            TaskStatus::Ongoing => TaskStatus::NotStarted,
            TaskStatus::Completed => TaskStatus::Ongoing,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub desc: String,
    pub status: TaskStatus,
    pub tags: Vec<String>,
}

/// Everything a task carries except its id, which the board assigns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTask {
    pub title: String,
    pub desc: String,
    pub status: TaskStatus,
    pub tags: Vec<String>,
}

impl NewTask {
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            desc: self.desc,
            status: self.status,
            tags: self.tags,
        }
    }
}

/// Partial update: `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub status: Option<TaskStatus>,
    pub tags: Option<Vec<String>>,
}

impl TaskPatch {
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(desc) = self.desc {
            task.desc = desc;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(tags) = self.tags {
            task.tags = tags;
        }
    }
}

/// Splits comma-separated input into trimmed, non-empty tags in entry order.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// Rejects blank titles. The title is kept exactly as typed.
pub fn validate_title(raw: &str) -> Result<String, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(raw.to_string())
}

/// Hands out ids seeded from the wall clock (milliseconds) that never repeat,
/// even when two tasks are created within the same tick.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: Option<i64>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { last: None }
    }

    #[cfg(test)]
    pub fn starting_at(last: i64) -> Self {
        Self { last: Some(last) }
    }

    pub fn next_id(&mut self) -> TaskId {
        let now = Utc::now().timestamp_millis();
        let id = match self.last {
            Some(last) if now <= last => last + 1,
            _ => now,
        };
        self.last = Some(id);
        TaskId(id)
    }
}
