// Filtering and sorting for task listings

use crate::task::Task;
use chrono::{NaiveDate, NaiveDateTime};
use std::cmp::Ordering;
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";
// Whole seconds only; fractional seconds are not part of the filter text
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A task field addressable by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Id,
    Description,
    Category,
    Priority,
    DueDate,
    Completed,
    CreatedAt,
    /// Anything else; reads as empty text
    Unknown(String),
}

impl Field {
    /// Parse a field name, ignoring case
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "id" => Field::Id,
            "description" => Field::Description,
            "category" => Field::Category,
            "priority" => Field::Priority,
            "due_date" => Field::DueDate,
            "completed" => Field::Completed,
            "created_at" => Field::CreatedAt,
            other => Field::Unknown(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Field::Id => "id",
            Field::Description => "description",
            Field::Category => "category",
            Field::Priority => "priority",
            Field::DueDate => "due_date",
            Field::Completed => "completed",
            Field::CreatedAt => "created_at",
            Field::Unknown(name) => name,
        }
    }

    /// Text form of this field on `task`, as used for filtering
    pub fn text_of(&self, task: &Task) -> String {
        match self {
            Field::Id => task.id.to_string(),
            Field::Description => task.description.clone(),
            Field::Category => task.category.clone(),
            Field::Priority => task.priority.label().to_string(),
            Field::DueDate => task.due_date.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default(),
            Field::Completed => task.completed.to_string(),
            Field::CreatedAt => task.created_at.format(TIMESTAMP_FORMAT).to_string(),
            Field::Unknown(_) => String::new(),
        }
    }

    /// Typed value of this field on `task`, as used for sorting
    pub fn sort_value(&self, task: &Task) -> SortValue {
        match self {
            Field::Id => SortValue::Int(task.id as u64),
            Field::Description => SortValue::Text(task.description.clone()),
            Field::Category => SortValue::Text(task.category.clone()),
            Field::Priority => SortValue::Int(task.priority.rank() as u64),
            Field::DueDate => SortValue::Date(task.due_date.unwrap_or(NaiveDate::MAX)),
            Field::Completed => SortValue::Bool(task.completed),
            Field::CreatedAt => SortValue::Time(task.created_at),
            Field::Unknown(_) => SortValue::Text(String::new()),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Comparable field value
///
/// Within one sort every task yields the same variant, so the derived
/// ordering only ever compares like with like.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Int(u64),
    Bool(bool),
    Date(NaiveDate),
    Time(NaiveDateTime),
    Text(String),
}

/// Case-insensitive equality filter on one field
#[derive(Debug, Clone)]
pub struct Filter {
    /// Field name to filter on
    pub field: Field,
    /// Value to compare against
    pub value: String,
}

impl Filter {
    pub fn new(field: &str, value: impl Into<String>) -> Self {
        Self {
            field: Field::parse(field),
            value: value.into(),
        }
    }

    /// An empty field name or value disables the filter
    pub fn is_active(&self) -> bool {
        !self.field.name().is_empty() && !self.value.is_empty()
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.field.text_of(task).to_lowercase() == self.value.to_lowercase()
    }
}

/// Sort order for listings, written `field` or `-field` for descending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: Field,
    pub descending: bool,
}

impl SortKey {
    pub fn parse(spec: &str) -> Self {
        let spec = spec.trim();
        match spec.strip_prefix('-') {
            Some(rest) => Self {
                field: Field::parse(rest),
                descending: true,
            },
            None => Self {
                field: Field::parse(spec),
                descending: false,
            },
        }
    }

    pub fn ascending(field: Field) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    pub fn descending(field: Field) -> Self {
        Self {
            field,
            descending: true,
        }
    }

    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        let ord = self.field.sort_value(a).cmp(&self.field.sort_value(b));
        if self.descending { ord.reverse() } else { ord }
    }

    /// Stable sort; ties keep their relative order in both directions
    pub fn sort(&self, tasks: &mut [Task]) {
        tasks.sort_by(|a, b| self.compare(a, b));
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-{}", self.field)
        } else {
            write!(f, "{}", self.field)
        }
    }
}
