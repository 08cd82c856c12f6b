use tracing::{debug, info};

use crate::filter::Filter;
use crate::task::{IdGenerator, NewTask, Task, TaskId, TaskPatch};

/// The canonical task collection, newest first, and the active filter.
#[derive(Debug, Default)]
pub struct TaskBoard {
    tasks: Vec<Task>,
    filter: Filter,
    ids: IdGenerator,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            filter: Filter::All,
            ids: IdGenerator::new(),
        }
    }

    #[cfg(test)]
    pub fn with_ids(ids: IdGenerator) -> Self {
        Self {
            ids,
            ..Self::new()
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        debug!(filter = filter.label(), "filter changed");
        self.filter = filter;
    }

    pub fn add_task(&mut self, data: NewTask) -> TaskId {
        let id = self.ids.next_id();
        info!(%id, title = %data.title, "task created");
        self.tasks.insert(0, data.into_task(id));
        id
    }

    /// Returns false when no task has `id`.
    pub fn update_task(&mut self, id: TaskId, patch: TaskPatch) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                patch.apply(task);
                info!(%id, "task updated");
                true
            }
            None => {
                debug!(%id, "update ignored, no such task");
                false
            }
        }
    }

    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;
        if removed {
            info!(%id, "task deleted");
        }
        removed
    }

    /// Tasks passing the active filter, in collection order.
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| self.filter.matches(t)).collect()
    }
}
