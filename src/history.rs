// Bounded log of reversible actions

use crate::task::{Task, TaskKey};
use std::collections::VecDeque;
use std::fmt;

/// Number of actions kept for undo unless configured otherwise
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Add,
    Delete,
    Edit,
    Complete,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Add => write!(f, "add"),
            ActionKind::Delete => write!(f, "delete"),
            ActionKind::Edit => write!(f, "edit"),
            ActionKind::Complete => write!(f, "complete"),
        }
    }
}

/// One captured mutation, holding value copies of whatever undo needs
#[derive(Debug, Clone, PartialEq)]
pub enum ActionRecord {
    /// Copy of the task as it was added
    Add { task: Task },
    /// Copy of the removed task, including its id at removal time
    Delete { task: Task },
    /// Full task state before the edit
    Edit { id: usize, key: TaskKey, original: Task },
    Complete { id: usize, key: TaskKey, was_completed: bool },
}

impl ActionRecord {
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionRecord::Add { .. } => ActionKind::Add,
            ActionRecord::Delete { .. } => ActionKind::Delete,
            ActionRecord::Edit { .. } => ActionKind::Edit,
            ActionRecord::Complete { .. } => ActionKind::Complete,
        }
    }

    /// Positional id of the affected task when the action happened
    pub fn id(&self) -> usize {
        match self {
            ActionRecord::Add { task } | ActionRecord::Delete { task } => task.id,
            ActionRecord::Edit { id, .. } | ActionRecord::Complete { id, .. } => *id,
        }
    }

    pub fn key(&self) -> TaskKey {
        match self {
            ActionRecord::Add { task } | ActionRecord::Delete { task } => task.key,
            ActionRecord::Edit { key, .. } | ActionRecord::Complete { key, .. } => *key,
        }
    }
}

/// Fixed-capacity FIFO; pushing past the limit silently drops the oldest record
#[derive(Debug, Clone)]
pub struct History {
    records: VecDeque<ActionRecord>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            records: VecDeque::with_capacity(limit),
            limit,
        }
    }

    pub fn push(&mut self, record: ActionRecord) {
        self.records.push_back(record);
        while self.records.len() > self.limit {
            self.records.pop_front();
        }
    }

    /// Most recent record first
    pub fn pop(&mut self) -> Option<ActionRecord> {
        self.records.pop_back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
