use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::model::{Task, TaskPatch};
use crate::error::ApiError;

/// Owner-scoped persistence of task records.
///
/// Every method that touches an existing record takes the owner id as a
/// query filter, never as an after-the-fact check: a lookup for someone
/// else's task matches zero rows and surfaces as `NotFound`, exactly like a
/// task that does not exist.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn find_all_by_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, ApiError>;

    async fn insert(
        &self,
        owner_id: Uuid,
        title: &str,
        description: Option<&str>,
    ) -> Result<Task, ApiError>;

    async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Task, ApiError>;

    /// Merges the patch into the record in a single atomic statement.
    async fn apply_partial_update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: TaskPatch,
    ) -> Result<Task, ApiError>;

    /// Deleting an already-deleted id fails with `NotFound`.
    async fn remove(&self, id: Uuid, owner_id: Uuid) -> Result<(), ApiError>;
}

#[async_trait]
impl TaskStore for PgPool {
    async fn find_all_by_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, ApiError> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT * FROM tasks
            WHERE owner_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(owner_id)
        .fetch_all(self)
        .await?;

        Ok(tasks)
    }

    async fn insert(
        &self,
        owner_id: Uuid,
        title: &str,
        description: Option<&str>,
    ) -> Result<Task, ApiError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (id, owner_id, title, description)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(title)
        .bind(description)
        .fetch_one(self)
        .await?;

        Ok(task)
    }

    async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Task, ApiError> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT * FROM tasks
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(self)
        .await?
        .ok_or(ApiError::NotFound)
    }

    async fn apply_partial_update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: TaskPatch,
    ) -> Result<Task, ApiError> {
        // Build the SET list from the fields actually present, so an absent
        // field is never written. Ownership filter and write are one
        // statement; Postgres row locking serializes same-id writers.
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if patch.title.is_some() {
            query.push_str(&format!(", title = ${}", bind_count));
            bind_count += 1;
        }
        if patch.description.is_some() {
            query.push_str(&format!(", description = ${}", bind_count));
            bind_count += 1;
        }
        if patch.completed.is_some() {
            query.push_str(&format!(", completed = ${}", bind_count));
            bind_count += 1;
        }

        query.push_str(&format!(
            " WHERE id = ${} AND owner_id = ${} RETURNING *",
            bind_count,
            bind_count + 1
        ));

        let mut query_builder = sqlx::query_as::<_, Task>(&query);

        if let Some(title) = patch.title {
            query_builder = query_builder.bind(title);
        }
        if let Some(description) = patch.description {
            query_builder = query_builder.bind(description);
        }
        if let Some(completed) = patch.completed {
            query_builder = query_builder.bind(completed);
        }

        query_builder
            .bind(id)
            .bind(owner_id)
            .fetch_optional(self)
            .await?
            .ok_or(ApiError::NotFound)
    }

    async fn remove(&self, id: Uuid, owner_id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(self)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound);
        }

        Ok(())
    }
}
