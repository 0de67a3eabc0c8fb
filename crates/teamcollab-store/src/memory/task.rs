use async_trait::async_trait;
use chrono::Utc;

use teamcollab_core::result::AppResult;
use teamcollab_core::types::TaskId;
use teamcollab_entity::task::{CreateTask, Task, TaskPatch};

use super::MemoryStore;
use crate::traits::TaskStore;

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_tasks(&self) -> AppResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(tasks)
    }

    async fn find_task(&self, id: &TaskId) -> AppResult<Option<Task>> {
        Ok(self.tasks.get(id).map(|entry| entry.value().clone()))
    }

    async fn create_task(&self, input: CreateTask) -> AppResult<Task> {
        let task = Task::create(TaskId::generate(), input, Utc::now());
        self.tasks.insert(task.id.clone(), task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: &TaskId, patch: TaskPatch) -> AppResult<Option<Task>> {
        Ok(self.tasks.get_mut(id).map(|mut entry| {
            entry.apply(patch, Utc::now());
            entry.value().clone()
        }))
    }

    async fn delete_task(&self, id: &TaskId) -> AppResult<Option<Task>> {
        Ok(self.tasks.remove(id).map(|(_, task)| task))
    }
}
