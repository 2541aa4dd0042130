// Interactive menu loop driving the task store

use crate::config::Config;
use crate::error::StoreError;
use crate::query::{Filter, SortKey};
use crate::render::{self, ListFormat, Renderer};
use crate::store::TaskStore;
use crate::task::{Priority, TaskUpdate};
use chrono::NaiveDate;
use eyre::{Context, Result};
use std::io::{BufRead, Write};
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

const MENU: [&str; 10] = [
    "1. Add Task",
    "2. View All Tasks",
    "3. View Tasks by Category",
    "4. View Tasks by Priority",
    "5. Mark Task as Complete",
    "6. Edit Task",
    "7. Delete Task",
    "8. Sort Tasks",
    "9. Undo Last Action",
    "10. Exit",
];

const SORT_MENU: [(&str, &str); 7] = [
    ("Priority (High to Low)", "-priority"),
    ("Priority (Low to High)", "priority"),
    ("Due Date (Earliest first)", "due_date"),
    ("Due Date (Latest first)", "-due_date"),
    ("Category", "category"),
    ("Creation Date (Newest first)", "-created_at"),
    ("Creation Date (Oldest first)", "created_at"),
];

/// Parse a `YYYY-MM-DD` date; blank input means no date
pub fn parse_date(input: &str) -> std::result::Result<Option<NaiveDate>, chrono::ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).map(Some)
}

/// Uppercase the first character and lowercase the rest
pub fn capitalize(input: &str) -> String {
    let mut chars = input.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}

enum Flow {
    Continue,
    Exit,
}

/// Blocking read-eval-render loop over any line source and sink
pub struct Shell<R, W> {
    store: TaskStore,
    config: Config,
    renderer: Renderer,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(config: Config, input: R, output: W) -> Self {
        Self {
            store: config.build_store(),
            renderer: Renderer::new(config.color),
            config,
            input,
            output,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the user exits or input ends
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.print_menu()?;
            let prompt = self.renderer.prompt("\nEnter your choice (1-10): ");
            let Some(choice) = self.prompt(&prompt)? else {
                break;
            };

            debug!(choice = %choice, "Menu choice");
            let flow = match choice.as_str() {
                "1" => self.add_task()?,
                "2" => self.show(None, None)?,
                "3" => self.filter_by("category", "Enter category to filter by: ", false)?,
                "4" => self.filter_by("priority", "Enter priority to filter by (High/Medium/Low): ", true)?,
                "5" => self.mark_complete()?,
                "6" => self.edit_task()?,
                "7" => self.delete_task()?,
                "8" => self.sort_tasks()?,
                "9" => self.undo()?,
                "10" => {
                    let msg = self.renderer.success("Goodbye!");
                    self.say(&format!("\n{}", msg))?;
                    Flow::Exit
                }
                _ => {
                    let msg = self.renderer.error("Invalid choice. Please try again.");
                    self.say(&format!("\n{}", msg))?;
                    Flow::Continue
                }
            };

            if let Flow::Exit = flow {
                break;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Commands
    // ========================================================================

    fn add_task(&mut self) -> Result<Flow> {
        let description = loop {
            let Some(line) = self.prompt("Enter task description: ")? else {
                return Ok(Flow::Exit);
            };
            if !line.is_empty() {
                break line;
            }
            let msg = self.renderer.error("Description cannot be empty.");
            self.say(&msg)?;
        };

        let prompt = format!("Enter category (default: {}): ", self.config.default_category);
        let Some(category) = self.prompt(&prompt)? else {
            return Ok(Flow::Exit);
        };
        let category = if category.is_empty() {
            self.config.default_category.clone()
        } else {
            category
        };

        let prompt = format!(
            "Enter priority (High/Medium/Low, default: {}): ",
            self.config.default_priority
        );
        let Some(priority) = self.prompt(&prompt)? else {
            return Ok(Flow::Exit);
        };
        let priority = if priority.is_empty() {
            self.config.default_priority.clone()
        } else {
            Priority::from(capitalize(&priority))
        };

        let Some(due_date) = self.read_date("Enter due date")? else {
            return Ok(Flow::Exit);
        };

        let task = self.store.add(description, category, priority, due_date);
        let msg = self
            .renderer
            .success(&format!("Task '{}' added successfully!", task.description));
        self.say(&format!("\n{}", msg))?;
        Ok(Flow::Continue)
    }

    fn filter_by(&mut self, field: &str, prompt: &str, capitalized: bool) -> Result<Flow> {
        let Some(value) = self.prompt(prompt)? else {
            return Ok(Flow::Exit);
        };
        let value = if capitalized { capitalize(&value) } else { value };
        let filter = Filter::new(field, value);
        self.show(Some(&filter), None)
    }

    fn sort_tasks(&mut self) -> Result<Flow> {
        self.say("\nSort by:")?;
        for (i, (label, _)) in SORT_MENU.iter().enumerate() {
            self.say(&format!("{}. {}", i + 1, label))?;
        }
        let Some(choice) = self.prompt("Enter sort option (1-7): ")? else {
            return Ok(Flow::Exit);
        };

        let sort = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| SORT_MENU.get(i))
            .map(|(_, key)| SortKey::parse(key));
        self.show(None, sort.as_ref())
    }

    fn show(&mut self, filter: Option<&Filter>, sort: Option<&SortKey>) -> Result<Flow> {
        if self.config.list_format == ListFormat::Json {
            let tasks = self.store.list(filter, sort);
            let json = render::to_json(&tasks)?;
            self.say(&json)?;
            return Ok(Flow::Continue);
        }

        if self.store.is_empty() {
            let msg = self.renderer.table(&[]);
            self.say(&format!("\n{}", msg))?;
            return Ok(Flow::Continue);
        }

        let tasks = self.store.list(filter, sort);
        let table = if tasks.is_empty() {
            self.renderer.warning("No matching tasks.")
        } else {
            self.renderer.table(&tasks)
        };
        self.say(&format!("\n{}", table.trim_end()))?;
        Ok(Flow::Continue)
    }

    fn mark_complete(&mut self) -> Result<Flow> {
        let Some(id) = self.read_id("Enter task ID to mark as complete: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(id) = id else {
            return Ok(Flow::Continue);
        };

        match self.store.mark_complete(id) {
            Ok(()) => {
                let description = self.store.get(id).map(|t| t.description.clone()).unwrap_or_default();
                let msg = self
                    .renderer
                    .success(&format!("Task '{}' marked as complete!", description));
                self.say(&format!("\n{}", msg))?;
            }
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn edit_task(&mut self) -> Result<Flow> {
        let Some(id) = self.read_id("Enter task ID to edit: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(id) = id else {
            return Ok(Flow::Continue);
        };
        if self.store.get(id).is_none() {
            self.report(&StoreError::NotFound(id))?;
            return Ok(Flow::Continue);
        }

        let mut update = TaskUpdate::default();
        let Some(description) = self.prompt("Enter new description (leave blank to keep current): ")? else {
            return Ok(Flow::Exit);
        };
        if !description.is_empty() {
            update = update.description(description);
        }
        let Some(category) = self.prompt("Enter new category (leave blank to keep current): ")? else {
            return Ok(Flow::Exit);
        };
        if !category.is_empty() {
            update = update.category(category);
        }
        let Some(priority) = self.prompt("Enter new priority (leave blank to keep current): ")? else {
            return Ok(Flow::Exit);
        };
        if !priority.is_empty() {
            update = update.priority(capitalize(&priority));
        }
        let Some(due_date) = self.read_date("Enter new due date")? else {
            return Ok(Flow::Exit);
        };
        if let Some(due_date) = due_date {
            update = update.due_date(due_date);
        }

        match self.store.edit(id, &update) {
            Ok(()) => {
                let msg = self.renderer.success("Task updated successfully!");
                self.say(&format!("\n{}", msg))?;
            }
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn delete_task(&mut self) -> Result<Flow> {
        let Some(id) = self.read_id("Enter task ID to delete: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(id) = id else {
            return Ok(Flow::Continue);
        };

        match self.store.delete(id) {
            Ok(task) => {
                let msg = self.renderer.success(&format!("Task '{}' deleted!", task.description));
                self.say(&format!("\n{}", msg))?;
            }
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn undo(&mut self) -> Result<Flow> {
        match self.store.undo() {
            Ok(kind) => {
                debug!(%kind, "Undo from shell");
                let msg = self.renderer.success("Last action undone successfully!");
                self.say(&format!("\n{}", msg))?;
            }
            Err(e) => {
                let msg = self.renderer.warning(&format!("{}!", e));
                self.say(&format!("\n{}", msg))?;
            }
        }
        Ok(Flow::Continue)
    }

    // ========================================================================
    // I/O helpers
    // ========================================================================

    fn print_menu(&mut self) -> Result<()> {
        let title = self.renderer.title("===== TO-DO LIST MENU =====");
        self.say(&format!("\n{}", title))?;
        let menu = self.renderer.menu(&MENU.join("\n"));
        self.say(&menu)
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text).context("Failed to write output")
    }

    fn report(&mut self, err: &StoreError) -> Result<()> {
        let msg = self.renderer.error(&err.to_string());
        self.say(&format!("\n{}", msg))
    }

    /// Print `prompt` and read one trimmed line; `None` at end of input
    fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt).context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush output")?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Outer `None` at end of input, inner `None` when the id was rejected
    fn read_id(&mut self, prompt: &str) -> Result<Option<Option<usize>>> {
        let Some(line) = self.prompt(prompt)? else {
            return Ok(None);
        };
        match line.parse::<usize>() {
            Ok(id) => Ok(Some(Some(id))),
            Err(_) => {
                let msg = self.renderer.error("Please enter a valid task ID.");
                self.say(&msg)?;
                Ok(Some(None))
            }
        }
    }

    /// Re-prompts until the answer is blank or a valid date; `None` at end of input
    fn read_date(&mut self, prompt: &str) -> Result<Option<Option<NaiveDate>>> {
        let prompt = format!("{} (YYYY-MM-DD, leave blank if none): ", prompt);
        loop {
            let Some(line) = self.prompt(&prompt)? else {
                return Ok(None);
            };
            match parse_date(&line) {
                Ok(date) => return Ok(Some(date)),
                Err(_) => {
                    let msg = self.renderer.error("Invalid date format. Please use YYYY-MM-DD.");
                    self.say(&msg)?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn plain_config() -> Config {
        Config {
            color: false,
            ..Config::default()
        }
    }

    fn run_script(script: &str) -> (TaskStore, String) {
        let mut shell = Shell::new(plain_config(), Cursor::new(script.as_bytes().to_vec()), Vec::new());
        shell.run().unwrap();
        let store = shell.store().clone();
        let output = String::from_utf8(shell.into_output()).unwrap();
        (store, output)
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("").unwrap(), None);
        assert_eq!(parse_date(" 2025-12-24 ").unwrap(), NaiveDate::from_ymd_opt(2025, 12, 24));
        assert!(parse_date("24/12/2025").is_err());
        assert!(parse_date("2025-02-30").is_err());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("hIGH"), "High");
        assert_eq!(capitalize("low"), "Low");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_exit_immediately() {
        let (store, output) = run_script("10\n");
        assert!(store.is_empty());
        assert!(output.contains("===== TO-DO LIST MENU ====="));
        assert!(output.contains("Goodbye!"));
    }

    #[test]
    fn test_eof_ends_session() {
        let (store, output) = run_script("1\nHalf typed\n");
        assert!(store.is_empty());
        assert!(!output.contains("Goodbye!"));
    }

    #[test]
    fn test_add_uses_defaults() {
        let (store, output) = run_script("1\nBuy milk\n\n\n\n10\n");
        assert_eq!(store.len(), 1);

        let task = store.get(1).unwrap();
        assert_eq!(task.description, "Buy milk");
        assert_eq!(task.category, "General");
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.due_date.is_none());
        assert!(output.contains("Task 'Buy milk' added successfully!"));
    }

    #[test]
    fn test_add_reprompts_on_empty_description_and_bad_date() {
        let (store, output) = run_script("1\n\nPay rent\nHome\nhigh\nsoon\n2025-07-01\n10\n");
        assert!(output.contains("Description cannot be empty."));
        assert!(output.contains("Invalid date format. Please use YYYY-MM-DD."));

        let task = store.get(1).unwrap();
        assert_eq!(task.description, "Pay rent");
        assert_eq!(task.category, "Home");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2025, 7, 1));
    }

    #[test]
    fn test_view_empty_list() {
        let (_, output) = run_script("2\n10\n");
        assert!(output.contains("No tasks in the list!"));
    }

    #[test]
    fn test_complete_and_undo() {
        let (store, output) = run_script("1\nA\n\n\n\n5\n1\n9\n10\n");
        assert!(output.contains("Task 'A' marked as complete!"));
        assert!(output.contains("Last action undone successfully!"));
        assert!(!store.get(1).unwrap().completed);
    }

    #[test]
    fn test_invalid_id_is_rejected() {
        let (store, output) = run_script("1\nA\n\n\n\n5\none\n7\n4\n10\n");
        assert!(output.contains("Please enter a valid task ID."));
        assert!(output.contains("Task #4 not found"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.history_len(), 1);
    }

    #[test]
    fn test_edit_keeps_blank_fields() {
        let (store, output) = run_script("1\nA\nWork\nlow\n\n6\n1\n\n\nhigh\n2026-01-02\n10\n");
        assert!(output.contains("Task updated successfully!"));

        let task = store.get(1).unwrap();
        assert_eq!(task.description, "A");
        assert_eq!(task.category, "Work");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2026, 1, 2));
    }

    #[test]
    fn test_delete_and_filter() {
        let script = "1\nA\nWork\n\n\n1\nB\nHome\n\n\n1\nC\nwork\n\n\n7\n1\n3\nWORK\n10\n";
        let (store, output) = run_script(script);
        assert!(output.contains("Task 'A' deleted!"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(2).unwrap().description, "C");

        let listing = output.rsplit("--- TO-DO LIST ---").next().unwrap();
        assert!(listing.contains(" 2 C "));
        assert!(!listing.contains(" 1 B "));
    }

    #[test]
    fn test_filter_with_no_match() {
        let (_, output) = run_script("1\nA\n\n\n\n4\nlow\n10\n");
        assert!(output.contains("No matching tasks."));
    }

    #[test]
    fn test_sort_menu() {
        let script = "1\nlow\n\nlow\n\n1\nhigh\n\nhigh\n\n8\n1\n10\n";
        let (_, output) = run_script(script);
        let listing = output.rsplit("--- TO-DO LIST ---").next().unwrap();
        let low = listing.find(" low ").unwrap();
        let high = listing.find(" high ").unwrap();
        // -priority puts Low before High
        assert!(low < high);
    }

    #[test]
    fn test_undo_with_empty_history() {
        let (_, output) = run_script("9\n10\n");
        assert!(output.contains("No actions to undo!"));
    }

    #[test]
    fn test_invalid_choice() {
        let (_, output) = run_script("42\n10\n");
        assert!(output.contains("Invalid choice. Please try again."));
    }

    #[test]
    fn test_json_listing() {
        let config = Config {
            color: false,
            list_format: ListFormat::Json,
            ..Config::default()
        };
        let script = b"2\n1\nA\nHome\n\n\n1\nB\nWork\n\n\n3\nwork\n10\n";
        let mut shell = Shell::new(config, Cursor::new(script.to_vec()), Vec::new());
        shell.run().unwrap();
        let output = String::from_utf8(shell.into_output()).unwrap();

        assert!(output.contains("[]"));
        assert!(!output.contains("--- TO-DO LIST ---"));
        let start = output.rfind("[\n").unwrap();
        let end = output[start..].find("\n]").unwrap() + start + 2;
        let value: serde_json::Value = serde_json::from_str(&output[start..end]).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["description"], "B");
        assert_eq!(value[0]["id"], 2);
    }

    #[test]
    fn test_configured_defaults_apply() {
        let config = Config {
            color: false,
            default_category: "Inbox".to_string(),
            default_priority: Priority::Low,
            ..Config::default()
        };
        let mut shell = Shell::new(config, Cursor::new(b"1\nA\n\n\n\n10\n".to_vec()), Vec::new());
        shell.run().unwrap();

        let task = shell.store().get(1).unwrap();
        assert_eq!(task.category, "Inbox");
        assert_eq!(task.priority, Priority::Low);
    }
}
