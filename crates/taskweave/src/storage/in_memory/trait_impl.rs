//! Storage trait implementations for in-memory storage.

use super::InMemoryStorage;
use crate::domain::{NewTask, Task, TaskFilter, TaskId, TaskStatus, TaskUpdate};
use crate::error::{Error, Result};
use crate::storage::{GraphStore, TaskStorage};
use async_trait::async_trait;
use chrono::Utc;
use petgraph::Direction;

#[async_trait]
impl GraphStore for InMemoryStorage {
    async fn get_task(&self, id: &TaskId) -> Result<Option<Task>> {
        let inner = self.lock().await;
        Ok(inner.tasks.get(id).cloned())
    }

    async fn dependencies_of(&self, id: &TaskId) -> Result<Vec<TaskId>> {
        let inner = self.lock().await;
        Ok(inner.neighbors(id, Direction::Outgoing))
    }

    async fn dependents_of(&self, id: &TaskId) -> Result<Vec<TaskId>> {
        let inner = self.lock().await;
        Ok(inner.neighbors(id, Direction::Incoming))
    }

    async fn set_status(&mut self, id: &TaskId, status: TaskStatus) -> Result<()> {
        let mut inner = self.lock().await;

        let task = inner.tasks.get_mut(id).ok_or(Error::TaskNotFound(*id))?;
        task.status = status;
        task.updated_at = Utc::now();

        Ok(())
    }

    async fn insert_edge(&mut self, task: &TaskId, depends_on: &TaskId) -> Result<()> {
        let mut inner = self.lock().await;
        inner.add_edge(task, depends_on)
    }
}

#[async_trait]
impl TaskStorage for InMemoryStorage {
    async fn create(&mut self, new_task: NewTask) -> Result<Task> {
        new_task.validate().map_err(Error::InvalidTask)?;

        let mut inner = self.lock().await;
        let id = inner.allocate_id()?;
        let now = Utc::now();

        let task = Task {
            id,
            title: new_task.title.trim().to_string(),
            description: new_task.description,
            status: new_task.status,
            dependencies: vec![],
            created_at: now,
            updated_at: now,
        };

        inner.insert_task(task.clone())?;

        Ok(task)
    }

    async fn update(&mut self, id: &TaskId, updates: TaskUpdate) -> Result<Task> {
        let mut inner = self.lock().await;

        let task = inner.tasks.get_mut(id).ok_or(Error::TaskNotFound(*id))?;

        // Validate before mutating so a bad title leaves the task untouched.
        if let Some(title) = &updates.title {
            crate::domain::validate_title(title).map_err(Error::InvalidTask)?;
        }

        if let Some(title) = updates.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = updates.description {
            task.description = description;
        }
        task.updated_at = Utc::now();

        Ok(task.clone())
    }

    async fn delete(&mut self, id: &TaskId) -> Result<Vec<TaskId>> {
        let mut inner = self.lock().await;
        inner.remove_task(id)
    }

    async fn remove_edge(&mut self, task: &TaskId, depends_on: &TaskId) -> Result<()> {
        let mut inner = self.lock().await;
        inner.remove_edge(task, depends_on)
    }

    async fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let inner = self.lock().await;

        let mut tasks: Vec<Task> = inner
            .sorted_tasks()
            .into_iter()
            .filter(|task| filter.matches(task))
            .collect();

        if let Some(limit) = filter.limit {
            tasks.truncate(limit);
        }

        Ok(tasks)
    }

    async fn export_all(&self) -> Result<Vec<Task>> {
        let inner = self.lock().await;
        Ok(inner.sorted_tasks())
    }

    async fn save(&self) -> Result<()> {
        // No-op: nothing to persist. Use save_to_jsonl() for file persistence.
        Ok(())
    }

    async fn reload(&mut self) -> Result<()> {
        // No-op: there is no persisted state to reload from.
        Ok(())
    }
}
