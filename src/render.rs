// Text and JSON rendering of task listings

use crate::task::{Priority, Task};
use colored::{Color, Colorize};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

pub const EMPTY_MESSAGE: &str = "No tasks in the list!";

const TITLE: &str = "--- TO-DO LIST ---";
const HEADER: &str = "ID  Description        Category    Priority   Due Date       Status";
const NO_DATE: &str = "No date";

/// How the shell prints task listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListFormat {
    #[default]
    Table,
    Json,
}

/// Renders tasks as a fixed-width table, optionally colored
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    /// Full listing with title and header; empty input yields the empty-state message
    pub fn table(&self, tasks: &[Task]) -> String {
        if tasks.is_empty() {
            return self.paint(EMPTY_MESSAGE, Color::Yellow);
        }

        let mut out = String::new();
        out.push_str(&self.title(TITLE));
        out.push('\n');
        out.push_str(&self.paint(HEADER, Color::Cyan));
        out.push('\n');
        out.push_str(&"-".repeat(70));
        out.push('\n');
        for task in tasks {
            out.push_str(&self.row(task));
            out.push('\n');
        }
        out
    }

    pub fn row(&self, task: &Task) -> String {
        let due = task
            .due_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| NO_DATE.to_string());
        let priority = format!("{:7}", clip(task.priority.label(), 7));
        let status = if task.completed {
            self.paint("✓", Color::Green)
        } else {
            " ".to_string()
        };

        format!(
            "{:2} {:18} {:10} {} {:13} [{}]",
            task.id,
            clip(&task.description, 18),
            clip(&task.category, 10),
            self.paint_priority(&priority, &task.priority),
            due,
            status,
        )
    }

    pub fn success(&self, message: &str) -> String {
        self.paint(message, Color::Green)
    }

    pub fn warning(&self, message: &str) -> String {
        self.paint(message, Color::Yellow)
    }

    pub fn error(&self, message: &str) -> String {
        self.paint(message, Color::Red)
    }

    pub fn title(&self, text: &str) -> String {
        if self.color {
            text.white().on_blue().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn prompt(&self, text: &str) -> String {
        self.paint(text, Color::Yellow)
    }

    pub fn menu(&self, text: &str) -> String {
        self.paint(text, Color::Cyan)
    }

    fn paint_priority(&self, text: &str, priority: &Priority) -> String {
        if !self.color {
            return text.to_string();
        }
        match priority {
            Priority::High => text.bright_red().bold().to_string(),
            Priority::Medium => text.yellow().to_string(),
            Priority::Low => text.green().to_string(),
            Priority::Other(_) => text.white().to_string(),
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Pretty-printed JSON array of tasks
pub fn to_json(tasks: &[Task]) -> Result<String> {
    serde_json::to_string_pretty(tasks).context("Failed to serialize tasks")
}

/// First `width` characters of `text`
fn clip(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}
