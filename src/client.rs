//! Client-side session state: a local mirror of the caller's task list.
//!
//! The mirror only ever changes in response to a confirmed server result.
//! Nothing is applied optimistically; on any failure the local collection
//! stays exactly as it was and the error is handed back to the caller.

#![allow(dead_code)] // consumed by embedding UIs, not by the server binary

use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::tasks::dto::{CreateTask, UpdateTask};
use crate::routes::tasks::model::Task;
use crate::routes::tasks::service;
use crate::routes::tasks::store::TaskStore;

/// One authenticated session's view of its own tasks. Created at login,
/// dropped at logout; there is no ambient global beyond this object.
pub struct TaskSession<S: TaskStore> {
    store: S,
    caller_id: Uuid,
    tasks: Vec<Task>,
}

impl<S: TaskStore> TaskSession<S> {
    pub fn new(store: S, caller_id: Uuid) -> Self {
        Self {
            store,
            caller_id,
            tasks: Vec::new(),
        }
    }

    /// The current display-ready collection.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Replaces the whole collection with the server's list. Called on
    /// session start and whenever the task view is (re)entered.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.tasks = service::list_tasks(&self.store, self.caller_id).await?;
        Ok(())
    }

    /// Creates a task and appends the server's copy on success.
    pub async fn add(&mut self, request: CreateTask) -> Result<Task, ApiError> {
        let task = service::create_task(&self.store, self.caller_id, request).await?;
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Flips `completed` on the server, then mirrors the confirmed record.
    /// The local flag is never flipped ahead of the server's answer.
    pub async fn toggle(&mut self, id: Uuid) -> Result<(), ApiError> {
        let current = self
            .tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or(ApiError::NotFound)?;

        let request = UpdateTask {
            completed: Some(!current.completed),
            ..Default::default()
        };
        let updated = service::update_task(&self.store, self.caller_id, id, request).await?;

        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == id) {
            *slot = updated;
        }
        Ok(())
    }

    /// Deletes on the server first; the local record goes away only once
    /// the server has confirmed.
    pub async fn remove(&mut self, id: Uuid) -> Result<(), ApiError> {
        service::delete_task(&self.store, self.caller_id, id).await?;
        self.tasks.retain(|t| t.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::tasks::store::memory::MemStore;

    fn new_task(title: &str) -> CreateTask {
        CreateTask {
            title: Some(title.to_string()),
            description: None,
        }
    }

    #[tokio::test]
    async fn full_lifecycle_through_one_session() {
        let store = MemStore::new();
        let user = Uuid::new_v4();
        let mut session = TaskSession::new(store, user);

        session.load().await.unwrap();
        assert!(session.tasks().is_empty());

        let created = session.add(new_task("Buy milk")).await.unwrap();
        assert_eq!(created.title, "Buy milk");
        assert_eq!(created.description, None);
        assert_eq!(created.owner_id, user);
        assert!(!created.completed);
        let id = created.id;

        session.toggle(id).await.unwrap();
        assert!(session.tasks()[0].completed);

        session.load().await.unwrap();
        assert_eq!(session.tasks().len(), 1);
        assert!(session.tasks()[0].completed);

        session.remove(id).await.unwrap();
        assert!(session.tasks().is_empty());

        session.load().await.unwrap();
        assert!(session.tasks().is_empty());
    }

    #[tokio::test]
    async fn rejected_create_leaves_collection_unchanged() {
        let store = MemStore::new();
        let mut session = TaskSession::new(store, Uuid::new_v4());

        session.add(new_task("keep me")).await.unwrap();

        let err = session.add(new_task("")).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(session.tasks().len(), 1);
        assert_eq!(session.tasks()[0].title, "keep me");
    }

    #[tokio::test]
    async fn toggle_flips_back_and_forth() {
        let store = MemStore::new();
        let mut session = TaskSession::new(store, Uuid::new_v4());
        let id = session.add(new_task("t")).await.unwrap().id;

        session.toggle(id).await.unwrap();
        assert!(session.tasks()[0].completed);
        session.toggle(id).await.unwrap();
        assert!(!session.tasks()[0].completed);
    }

    #[tokio::test]
    async fn failed_remove_keeps_local_record() {
        let store = MemStore::new();
        let user = Uuid::new_v4();
        let mut session = TaskSession::new(store.clone(), user);
        let id = session.add(new_task("t")).await.unwrap().id;

        // Another device deletes the task out from under this session.
        let mut other = TaskSession::new(store, user);
        other.load().await.unwrap();
        other.remove(id).await.unwrap();

        assert!(matches!(
            session.remove(id).await.unwrap_err(),
            ApiError::NotFound
        ));
        // Stale until the next load, but never half-applied.
        assert_eq!(session.tasks().len(), 1);

        session.load().await.unwrap();
        assert!(session.tasks().is_empty());
    }

    #[tokio::test]
    async fn sessions_of_different_users_never_mix() {
        let store = MemStore::new();
        let mut alice = TaskSession::new(store.clone(), Uuid::new_v4());
        let mut bob = TaskSession::new(store, Uuid::new_v4());

        alice.add(new_task("hers")).await.unwrap();
        bob.add(new_task("his")).await.unwrap();

        alice.load().await.unwrap();
        bob.load().await.unwrap();

        assert_eq!(alice.tasks().len(), 1);
        assert_eq!(alice.tasks()[0].title, "hers");
        assert_eq!(bob.tasks().len(), 1);
        assert_eq!(bob.tasks()[0].title, "his");
    }
}
