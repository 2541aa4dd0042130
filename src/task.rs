// Data models for the task list

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category assigned when the caller does not supply one
pub const DEFAULT_CATEGORY: &str = "General";

/// Stable, session-unique task identifier
///
/// Unlike [`Task::id`], a key never changes and is never reused, so it keeps
/// pointing at the same task while other tasks are removed around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskKey(pub u64);

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "k{}", self.0)
    }
}

/// Task priority
///
/// Anything other than the three known levels is kept verbatim in `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
    Other(String),
}

impl Priority {
    /// Sort rank: High < Medium < Low < anything else
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
            Priority::Other(_) => 4,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Other(s) => s.as_str(),
        }
    }

    /// Like `From<&str>` but ignores case and surrounding whitespace
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            "low" => Priority::Low,
            _ => Priority::Other(s.to_string()),
        }
    }
}

/// Only the exact labels are recognized; anything else is kept verbatim
impl From<&str> for Priority {
    fn from(s: &str) -> Self {
        match s {
            "High" => Priority::High,
            "Medium" => Priority::Medium,
            "Low" => Priority::Low,
            _ => Priority::Other(s.to_string()),
        }
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        Priority::from(s.as_str())
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        p.label().to_string()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single to-do entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// 1-based position in the list; recomputed when earlier tasks go away
    pub id: usize,
    pub key: TaskKey,
    pub description: String,
    pub category: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub created_at: NaiveDateTime,
}

impl Task {
    pub fn new(
        id: usize,
        key: TaskKey,
        description: impl Into<String>,
        category: impl Into<String>,
        priority: Priority,
        due_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id,
            key,
            description: description.into(),
            category: category.into(),
            priority,
            due_date,
            completed: false,
            created_at: now_local(),
        }
    }

    /// Copy every user-visible field from `snapshot`, keeping this task's id and key
    pub fn restore_from(&mut self, snapshot: &Task) {
        self.description = snapshot.description.clone();
        self.category = snapshot.category.clone();
        self.priority = snapshot.priority.clone();
        self.due_date = snapshot.due_date;
        self.completed = snapshot.completed;
        self.created_at = snapshot.created_at;
    }
}

/// Partial set of editable fields; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
}

impl TaskUpdate {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn priority(mut self, priority: impl Into<Priority>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub(crate) fn apply_to(&self, task: &mut Task) {
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(category) = &self.category {
            task.category = category.clone();
        }
        if let Some(priority) = &self.priority {
            task.priority = priority.clone();
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
    }
}

/// Current local wall-clock time
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Task {
        Task::new(1, TaskKey(1), "Buy milk", DEFAULT_CATEGORY, Priority::High, None)
    }

    #[test]
    fn test_priority_from_matches_exact_labels() {
        assert_eq!(Priority::from("High"), Priority::High);
        assert_eq!(Priority::from("Low"), Priority::Low);
        assert_eq!(Priority::from("Urgent"), Priority::Other("Urgent".to_string()));

        let lower = Priority::from("high");
        assert_eq!(lower, Priority::Other("high".to_string()));
        assert_eq!(lower.rank(), 4);
        assert_eq!(lower.label(), "high");
    }

    #[test]
    fn test_priority_parse_lenient() {
        assert_eq!(Priority::parse_lenient("high"), Priority::High);
        assert_eq!(Priority::parse_lenient(" MEDIUM "), Priority::Medium);
        assert_eq!(Priority::parse_lenient("Urgent"), Priority::Other("Urgent".to_string()));
    }

    #[test]
    fn test_priority_rank() {
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
        assert!(Priority::Low.rank() < Priority::Other("Someday".to_string()).rank());
    }

    #[test]
    fn test_priority_serialization() {
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "\"High\"");

        let json = serde_json::to_string(&Priority::Other("Whenever".to_string())).unwrap();
        assert_eq!(json, "\"Whenever\"");

        let p: Priority = serde_json::from_str("\"Low\"").unwrap();
        assert_eq!(p, Priority::Low);
    }

    #[test]
    fn test_new_task_defaults() {
        let task = sample();
        assert_eq!(task.id, 1);
        assert!(!task.completed);
        assert_eq!(task.category, "General");
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_update_applies_only_set_fields() {
        let mut task = sample();
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let update = TaskUpdate::default().category("Home").due_date(date);

        update.apply_to(&mut task);
        assert_eq!(task.description, "Buy milk");
        assert_eq!(task.category, "Home");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_date, Some(date));
    }

    #[test]
    fn test_restore_keeps_id_and_key() {
        let mut task = sample();
        let mut snapshot = task.clone();
        snapshot.id = 7;
        snapshot.key = TaskKey(99);
        snapshot.description = "Old".to_string();
        snapshot.completed = true;

        task.restore_from(&snapshot);
        assert_eq!(task.id, 1);
        assert_eq!(task.key, TaskKey(1));
        assert_eq!(task.description, "Old");
        assert!(task.completed);
    }
}
