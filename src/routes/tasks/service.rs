use uuid::Uuid;

use super::dto::{CreateTask, UpdateTask};
use super::model::{Task, TaskPatch};
use super::store::TaskStore;
use crate::error::{ApiError, FieldError};

const TITLE_MAX_CHARS: usize = 255;

/// Returns every task owned by the caller, in insertion order.
pub async fn list_tasks<S: TaskStore>(store: &S, caller_id: Uuid) -> Result<Vec<Task>, ApiError> {
    store.find_all_by_owner(caller_id).await
}

/// Validates and persists a new task for the caller.
///
/// The owner is always the authenticated caller and `completed` always
/// starts false; the request body cannot influence either (the DTO does not
/// even carry those fields).
pub async fn create_task<S: TaskStore>(
    store: &S,
    caller_id: Uuid,
    body: CreateTask,
) -> Result<Task, ApiError> {
    let title = body.title.as_deref().unwrap_or("");

    let mut errors = Vec::new();
    if title.is_empty() {
        errors.push(FieldError::new("title", "title is required"));
    } else if title.chars().count() > TITLE_MAX_CHARS {
        errors.push(FieldError::new(
            "title",
            format!("title must be at most {TITLE_MAX_CHARS} characters"),
        ));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    store
        .insert(caller_id, title, body.description.as_deref())
        .await
}

/// Applies a partial update: only fields present in the body change.
///
/// Validation runs before any store call, so a rejected request leaves the
/// record untouched. A body with no recognized fields is a plain read.
pub async fn update_task<S: TaskStore>(
    store: &S,
    caller_id: Uuid,
    id: Uuid,
    body: UpdateTask,
) -> Result<Task, ApiError> {
    let mut errors = Vec::new();
    if let Some(title) = body.title.as_deref() {
        if title.is_empty() {
            errors.push(FieldError::new("title", "title must not be empty"));
        } else if title.chars().count() > TITLE_MAX_CHARS {
            errors.push(FieldError::new(
                "title",
                format!("title must be at most {TITLE_MAX_CHARS} characters"),
            ));
        }
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let patch = TaskPatch {
        title: body.title,
        description: body.description,
        completed: body.completed,
    };

    if patch.is_empty() {
        return store.find_owned(id, caller_id).await;
    }

    store.apply_partial_update(id, caller_id, patch).await
}

/// Deletes the caller's task. Unknown ids and other users' ids fail the
/// same way.
pub async fn delete_task<S: TaskStore>(
    store: &S,
    caller_id: Uuid,
    id: Uuid,
) -> Result<(), ApiError> {
    store.remove(id, caller_id).await
}
