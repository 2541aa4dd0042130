// In-memory task store with bounded undo history

use crate::error::{Result, StoreError};
use crate::history::{ActionKind, ActionRecord, DEFAULT_HISTORY_LIMIT, History};
use crate::query::{Filter, SortKey};
use crate::task::{Priority, Task, TaskKey, TaskUpdate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How undo locates the task an action record refers to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityMode {
    /// Whatever task currently holds the recorded position
    #[default]
    Positional,
    /// The exact task that was recorded, wherever it is now
    Stable,
}

/// Ordered collection of tasks plus the log used to undo changes to it
///
/// Task ids always run `1..=len()` in list order. Every mutation pushes one
/// record onto the history; failed operations change nothing.
#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    history: History,
    next_key: u64,
    identity: IdentityMode,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::with_options(DEFAULT_HISTORY_LIMIT, IdentityMode::default())
    }

    pub fn with_options(history_limit: usize, identity: IdentityMode) -> Self {
        Self {
            tasks: Vec::new(),
            history: History::new(history_limit),
            next_key: 1,
            identity,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of actions that can currently be undone
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn identity_mode(&self) -> IdentityMode {
        self.identity
    }

    /// Get a task by its current id
    pub fn get(&self, id: usize) -> Option<&Task> {
        self.position(id).map(|i| &self.tasks[i])
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Append a new task and return a copy of it
    pub fn add(
        &mut self,
        description: impl Into<String>,
        category: impl Into<String>,
        priority: impl Into<Priority>,
        due_date: Option<NaiveDate>,
    ) -> Task {
        let key = TaskKey(self.next_key);
        self.next_key += 1;

        let task = Task::new(self.tasks.len() + 1, key, description, category, priority.into(), due_date);
        self.tasks.push(task.clone());
        self.history.push(ActionRecord::Add { task: task.clone() });

        debug!(id = task.id, key = %task.key, description = %task.description, "Added task");
        task
    }

    /// Mark a task complete; completing an already-complete task still counts as an action
    pub fn mark_complete(&mut self, id: usize) -> Result<()> {
        let index = self.position(id).ok_or(StoreError::NotFound(id))?;
        let task = &mut self.tasks[index];

        let was_completed = task.completed;
        task.completed = true;
        let key = task.key;
        self.history.push(ActionRecord::Complete { id, key, was_completed });

        debug!(id, key = %key, was_completed, "Marked task complete");
        Ok(())
    }

    /// Apply the set fields of `update` to a task
    pub fn edit(&mut self, id: usize, update: &TaskUpdate) -> Result<()> {
        let index = self.position(id).ok_or(StoreError::NotFound(id))?;
        let task = &mut self.tasks[index];

        let original = task.clone();
        update.apply_to(task);
        let key = task.key;
        self.history.push(ActionRecord::Edit { id, key, original });

        debug!(id, key = %key, ?update, "Edited task");
        Ok(())
    }

    /// Remove a task, shifting every later task's id down by one
    pub fn delete(&mut self, id: usize) -> Result<Task> {
        let index = self.position(id).ok_or(StoreError::NotFound(id))?;

        let removed = self.tasks.remove(index);
        self.renumber_from(index);
        self.history.push(ActionRecord::Delete { task: removed.clone() });

        debug!(id, key = %removed.key, remaining = self.tasks.len(), "Deleted task");
        Ok(removed)
    }

    /// Reverse the most recent recorded action
    ///
    /// Undo is not recorded itself. If the task a record refers to can no
    /// longer be found, the record is still consumed.
    pub fn undo(&mut self) -> Result<ActionKind> {
        let record = self.history.pop().ok_or(StoreError::NothingToUndo)?;
        let kind = record.kind();

        match &record {
            ActionRecord::Add { .. } => match self.locate(&record) {
                Some(index) => {
                    self.tasks.remove(index);
                    self.renumber_from(index);
                }
                None => self.warn_missing(&record),
            },
            ActionRecord::Delete { task } => {
                let index = task.id.saturating_sub(1).min(self.tasks.len());
                self.tasks.insert(index, task.clone());
                self.renumber_from(0);
            }
            ActionRecord::Edit { original, .. } => match self.locate(&record) {
                Some(index) => self.tasks[index].restore_from(original),
                None => self.warn_missing(&record),
            },
            ActionRecord::Complete { was_completed, .. } => match self.locate(&record) {
                Some(index) => self.tasks[index].completed = *was_completed,
                None => self.warn_missing(&record),
            },
        }

        debug!(%kind, remaining = self.history.len(), "Undid action");
        Ok(kind)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Snapshot of the tasks, optionally filtered then sorted
    ///
    /// An inactive filter (empty field or value) is ignored. Without a sort key the
    /// list order is kept.
    pub fn list(&self, filter: Option<&Filter>, sort: Option<&SortKey>) -> Vec<Task> {
        let mut tasks: Vec<Task> = match filter.filter(|f| f.is_active()) {
            Some(filter) => self.tasks.iter().filter(|t| filter.matches(t)).cloned().collect(),
            None => self.tasks.clone(),
        };

        if let Some(sort) = sort {
            sort.sort(&mut tasks);
        }

        tasks
    }

    /// All tasks in list order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn position(&self, id: usize) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    fn locate(&self, record: &ActionRecord) -> Option<usize> {
        match self.identity {
            IdentityMode::Positional => self.position(record.id()),
            IdentityMode::Stable => {
                let key = record.key();
                self.tasks.iter().position(|t| t.key == key)
            }
        }
    }

    fn renumber_from(&mut self, start: usize) {
        for (i, task) in self.tasks.iter_mut().enumerate().skip(start) {
            task.id = i + 1;
        }
    }

    fn warn_missing(&self, record: &ActionRecord) {
        warn!(
            kind = %record.kind(),
            id = record.id(),
            key = %record.key(),
            mode = ?self.identity,
            "Undo target no longer present, skipping"
        );
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}
