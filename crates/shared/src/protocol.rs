use serde::{Deserialize, Serialize};

use crate::{
    domain::{Filter, Task, TaskId},
    error::IgnoreReason,
};

/// Result of a mutating controller operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Change {
    Applied,
    Ignored(IgnoreReason),
}

impl Change {
    pub fn is_applied(self) -> bool {
        matches!(self, Change::Applied)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum AddOutcome {
    Added { task_id: TaskId },
    /// A task with the same title already exists; the view now shows only it.
    Found { task_id: TaskId },
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleAllPolicy {
    /// Sets every task to the negation of a controller-wide flag, then flips
    /// the flag. Ignores the tasks' current state.
    #[default]
    FlipFlop,
    /// Marks everything done when any task is active, otherwise marks
    /// everything active.
    ByCompleteness,
}

/// What a front-end needs to render the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSnapshot {
    pub filter: Filter,
    pub visible: Vec<Task>,
    pub active_count: usize,
    pub total_count: usize,
    /// The view shows an add-or-find match instead of the filter result.
    pub pinned_search: bool,
    pub editing: Option<EditSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSnapshot {
    pub task_id: TaskId,
    pub working_title: String,
}

impl ListSnapshot {
    pub fn items_left_label(&self) -> String {
        format!("{} item(s) left!", self.active_count)
    }
}
