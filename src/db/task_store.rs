use std::sync::{Arc, RwLock};

use uuid::Uuid;

use crate::models::task::Task;

/// The toy task list the scopes protect. Insertion order is the display
/// order the CLI numbers tasks by.
#[derive(Clone, Default)]
pub struct TaskStore {
    inner: Arc<RwLock<Vec<Task>>>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, description: String) -> Task {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(8);
        let task = Task {
            id,
            description,
            done: false,
        };
        let mut tasks = self.inner.write().expect("task store lock poisoned");
        tasks.push(task.clone());
        task
    }

    pub fn list(&self) -> Vec<Task> {
        self.inner.read().expect("task store lock poisoned").clone()
    }

    /// Replaces the stored task with the same id. `None` if it never existed.
    pub fn update(&self, task: Task) -> Option<Task> {
        let mut tasks = self.inner.write().expect("task store lock poisoned");
        let slot = tasks.iter_mut().find(|existing| existing.id == task.id)?;
        *slot = task.clone();
        Some(task)
    }
}
