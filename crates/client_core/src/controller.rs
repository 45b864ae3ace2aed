//! The todo list controller: owns the collection, the filter, the new-task
//! draft and the in-place edit, and derives the visible list from them.
//!
//! Every method runs to completion against in-memory state. The only
//! suspension point is [`TodoController::initialize`], which is also the only
//! way to obtain a controller backed by a [`TaskSource`], so no mutation can
//! be dispatched before the initial fetch has settled.

use shared::{
    domain::{count_active, derive_view, normalize_title, Filter, Task, TaskId},
    error::IgnoreReason,
    protocol::{AddOutcome, Change, EditSnapshot, ListSnapshot, ToggleAllPolicy},
};
use tracing::{debug, info, warn};

use crate::source::TaskSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loaded { count: usize },
    /// The initial fetch failed; the collection started empty.
    Unavailable { reason: String },
}

#[derive(Debug, Clone)]
struct EditState {
    task_id: TaskId,
    working_title: String,
}

#[derive(Debug)]
pub struct TodoController {
    tasks: Vec<Task>,
    filter: Filter,
    draft: String,
    editing: Option<EditState>,
    /// Collection index of an add-or-find hit; overrides the filter until
    /// the next mutation or filter change, so the index cannot go stale.
    pinned: Option<usize>,
    all_completed: bool,
    toggle_all: ToggleAllPolicy,
    /// `None` once the id space is used up.
    next_id: Option<i64>,
    load_state: LoadState,
}

impl TodoController {
    /// Fetches the collection once. A failing source is logged and leaves the
    /// controller empty; there is no retry.
    pub async fn initialize(source: &dyn TaskSource, toggle_all: ToggleAllPolicy) -> Self {
        let origin = source.describe();
        match source.fetch_all().await {
            Ok(tasks) => {
                info!(source = %origin, count = tasks.len(), "loaded tasks");
                Self::from_snapshot(tasks, toggle_all)
            }
            Err(err) => {
                warn!(source = %origin, error = %err, "task source unavailable; starting empty");
                let mut controller = Self::from_snapshot(Vec::new(), toggle_all);
                controller.load_state = LoadState::Unavailable {
                    reason: err.to_string(),
                };
                controller
            }
        }
    }

    /// Builds a controller around an already fetched collection.
    pub fn from_snapshot(tasks: Vec<Task>, toggle_all: ToggleAllPolicy) -> Self {
        let highest = tasks.iter().map(|task| task.id.0).max().unwrap_or(0);
        let len = i64::try_from(tasks.len()).unwrap_or(i64::MAX);
        Self {
            next_id: highest.max(len).checked_add(1),
            load_state: LoadState::Loaded { count: tasks.len() },
            tasks,
            filter: Filter::default(),
            draft: String::new(),
            editing: None,
            pinned: None,
            all_completed: false,
            toggle_all,
        }
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn submit_draft(&mut self) -> AddOutcome {
        let draft = self.draft.clone();
        self.add_or_find(&draft)
    }

    /// Adds a task titled `raw` (trimmed), or, if a task with the same title
    /// already exists (case-insensitive), narrows the view to that task.
    /// Clears the draft unless `raw` is blank.
    pub fn add_or_find(&mut self, raw: &str) -> AddOutcome {
        let Some(title) = normalize_title(raw) else {
            debug!("ignoring blank new task");
            return AddOutcome::Ignored(IgnoreReason::EmptyTitle);
        };

        let needle = title.to_lowercase();
        let existing = self
            .tasks
            .iter()
            .position(|task| task.title_matches(&needle));

        let outcome = match existing {
            Some(index) => {
                let task_id = self.tasks[index].id;
                debug!(%task_id, "new task matches an existing one; pinning it");
                self.pinned = Some(index);
                AddOutcome::Found { task_id }
            }
            None => {
                let Some(task_id) = self.allocate_id() else {
                    warn!("task ids exhausted; not adding");
                    return AddOutcome::Ignored(IgnoreReason::IdsExhausted);
                };
                self.tasks.push(Task::new(task_id, title));
                self.reset_view();
                debug!(%task_id, "added task");
                AddOutcome::Added { task_id }
            }
        };
        self.draft.clear();
        outcome
    }

    /// Starts editing `task_id`. Any edit already in progress is dropped.
    pub fn begin_edit(&mut self, task_id: TaskId) -> Change {
        let Some(task) = self.tasks.iter().find(|task| task.id == task_id) else {
            return ignored(IgnoreReason::NotFound(task_id));
        };
        self.editing = Some(EditState {
            task_id,
            working_title: task.title.clone(),
        });
        Change::Applied
    }

    pub fn update_edit(&mut self, text: impl Into<String>) -> Change {
        match self.editing.as_mut() {
            Some(edit) => {
                edit.working_title = text.into();
                Change::Applied
            }
            None => ignored(IgnoreReason::NoActiveEdit),
        }
    }

    pub fn cancel_edit(&mut self) -> Change {
        match self.editing.take() {
            Some(_) => Change::Applied,
            None => ignored(IgnoreReason::NoActiveEdit),
        }
    }

    /// Writes the trimmed working title back. A blank working title abandons
    /// the edit and keeps the stored title.
    pub fn commit_edit(&mut self) -> Change {
        let Some(edit) = self.editing.take() else {
            return ignored(IgnoreReason::NoActiveEdit);
        };
        let Some(title) = normalize_title(&edit.working_title) else {
            return ignored(IgnoreReason::EmptyTitle);
        };

        let mut touched = false;
        for task in self.tasks.iter_mut().filter(|task| task.id == edit.task_id) {
            task.title = title.to_string();
            touched = true;
        }
        self.reset_view();
        if !touched {
            return ignored(IgnoreReason::NotFound(edit.task_id));
        }
        debug!(task_id = %edit.task_id, "renamed task");
        Change::Applied
    }

    pub fn toggle_done(&mut self, task_id: TaskId) -> Change {
        let mut touched = false;
        for task in self.tasks.iter_mut().filter(|task| task.id == task_id) {
            task.is_done = !task.is_done;
            touched = true;
        }
        self.reset_view();
        if !touched {
            return ignored(IgnoreReason::NotFound(task_id));
        }
        Change::Applied
    }

    pub fn delete(&mut self, task_id: TaskId) -> Change {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != task_id);
        self.reset_view();
        if self.tasks.len() == before {
            return ignored(IgnoreReason::NotFound(task_id));
        }
        self.drop_orphaned_edit();
        debug!(%task_id, "deleted task");
        Change::Applied
    }

    /// Marks every task done or active according to the configured
    /// [`ToggleAllPolicy`].
    pub fn toggle_all(&mut self) -> Change {
        let target = match self.toggle_all {
            ToggleAllPolicy::FlipFlop => !self.all_completed,
            ToggleAllPolicy::ByCompleteness => self.tasks.iter().any(|task| !task.is_done),
        };
        for task in &mut self.tasks {
            task.is_done = target;
        }
        self.all_completed = target;
        self.reset_view();
        debug!(done = target, "toggled all tasks");
        Change::Applied
    }

    pub fn set_filter(&mut self, filter: Filter) -> Change {
        self.filter = filter;
        self.reset_view();
        Change::Applied
    }

    pub fn clear_completed(&mut self) -> Change {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.is_done);
        self.drop_orphaned_edit();
        self.reset_view();
        debug!(removed = before - self.tasks.len(), "cleared completed tasks");
        Change::Applied
    }

    pub fn count_active(&self) -> usize {
        count_active(&self.tasks)
    }

    /// The filtered view, or the single pinned add-or-find match.
    pub fn visible(&self) -> Vec<&Task> {
        match self.pinned {
            Some(index) => self.tasks.get(index).into_iter().collect(),
            None => derive_view(&self.tasks, self.filter),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn editing(&self) -> Option<(TaskId, &str)> {
        self.editing
            .as_ref()
            .map(|edit| (edit.task_id, edit.working_title.as_str()))
    }

    pub fn is_search_pinned(&self) -> bool {
        self.pinned.is_some()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn toggle_all_policy(&self) -> ToggleAllPolicy {
        self.toggle_all
    }

    pub fn snapshot(&self) -> ListSnapshot {
        ListSnapshot {
            filter: self.filter,
            visible: self.visible().into_iter().cloned().collect(),
            active_count: self.count_active(),
            total_count: self.tasks.len(),
            pinned_search: self.is_search_pinned(),
            editing: self.editing.as_ref().map(|edit| EditSnapshot {
                task_id: edit.task_id,
                working_title: edit.working_title.clone(),
            }),
        }
    }

    fn allocate_id(&mut self) -> Option<TaskId> {
        let id = self.next_id?;
        self.next_id = id.checked_add(1);
        Some(TaskId(id))
    }

    fn reset_view(&mut self) {
        self.pinned = None;
    }

    fn drop_orphaned_edit(&mut self) {
        if let Some(edit) = &self.editing {
            if !self.tasks.iter().any(|task| task.id == edit.task_id) {
                self.editing = None;
            }
        }
    }
}

fn ignored(reason: IgnoreReason) -> Change {
    debug!(%reason, "operation ignored");
    Change::Ignored(reason)
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
