use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::ensure_allowed;
use crate::gate::{authorize, Access, Action};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::store::{NewTask, TaskPatch};

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub name: String,
    pub description: String,
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// GET /api/v1/tasks - List tasks
///
/// Admins see every task; everyone else sees their own. An empty result is
/// 200 with an empty array, not a 404.
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult {
    let requester = auth.requester();

    let tasks = if requester.access == Access::Admin {
        ensure_allowed(authorize(&requester, Action::ListAll, None))?;
        state.tasks.list_all().await?
    } else {
        ensure_allowed(authorize(&requester, Action::ListOwn, None))?;
        state.tasks.list_by_owner(requester.user_id).await?
    };

    Ok(ApiResponse::ok(json!({ "tasks": tasks })))
}

/// POST /api/v1/tasks - Create a task owned by the requester
///
/// The owner is always the authenticated requester; nothing in the body can
/// assign a task to someone else.
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateTaskRequest>,
) -> ApiResult {
    let requester = auth.requester();
    ensure_allowed(authorize(&requester, Action::Create, None))?;

    let task = state
        .tasks
        .create(
            requester.user_id,
            NewTask {
                name: payload.name,
                description: payload.description,
                status: payload.status,
            },
        )
        .await?;

    tracing::info!(task_id = %task.id, owner_id = %task.owner_id, "task created");

    Ok(ApiResponse::created(json!({
        "message": "Task created successfully",
        "task": task,
    })))
}

/// GET /api/v1/tasks/:id - Fetch a single task
///
/// Missing id is 404; an existing task owned by someone else is 403. The
/// lookup runs first so the gate sees `None` only when the id truly does not
/// exist.
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult {
    let target = state.tasks.find(id).await?;
    ensure_allowed(authorize(&auth.requester(), Action::Read, target.as_ref()))?;

    // ensure_allowed returned Ok, so the target is present
    Ok(ApiResponse::ok(json!({ "task": target })))
}

/// PUT /api/v1/tasks/:id - Partially update a task
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> ApiResult {
    let target = state.tasks.find(id).await?;
    ensure_allowed(authorize(&auth.requester(), Action::Update, target.as_ref()))?;

    let task = state
        .tasks
        .update(
            id,
            TaskPatch {
                name: payload.name,
                description: payload.description,
                status: payload.status,
            },
        )
        .await?;

    tracing::info!(task_id = %task.id, "task updated");

    Ok(ApiResponse::ok(json!({
        "message": "Task updated successfully",
        "task": task,
    })))
}

/// DELETE /api/v1/tasks/:id - Hard-delete a task
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult {
    let target = state.tasks.find(id).await?;
    ensure_allowed(authorize(&auth.requester(), Action::Delete, target.as_ref()))?;

    state.tasks.delete(id).await?;

    tracing::info!(task_id = %id, "task deleted");

    Ok(ApiResponse::ok(json!({
        "message": "Task deleted successfully",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_user(access: Access) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            access,
        }
    }

    async fn seed_task(state: &AppState, owner_id: Uuid, name: &str) -> crate::store::Task {
        state
            .tasks
            .create(
                owner_id,
                NewTask {
                    name: name.to_string(),
                    description: "desc".to_string(),
                    status: "open".to_string(),
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn admin_list_sees_every_owner() {
        let state = AppState::in_memory();
        let admin = auth_user(Access::Admin);
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        seed_task(&state, alice, "a").await;
        seed_task(&state, bob, "b").await;

        // Admin listing returns both users' tasks
        let all = state.tasks.list_all().await.unwrap();
        assert_eq!(all.len(), 2);

        let result = list(State(state), Extension(admin)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn regular_list_is_scoped_to_the_requester() {
        let state = AppState::in_memory();
        let user = auth_user(Access::User);
        let stranger = Uuid::new_v4();

        seed_task(&state, user.user_id, "mine").await;
        seed_task(&state, stranger, "not mine").await;

        let own = state.tasks.list_by_owner(user.user_id).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].name, "mine");

        let result = list(State(state), Extension(user)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn cross_user_update_is_forbidden_and_leaves_task_unchanged() {
        let state = AppState::in_memory();
        let owner = Uuid::new_v4();
        let task = seed_task(&state, owner, "untouchable").await;
        let intruder = auth_user(Access::User);

        let err = update(
            State(state.clone()),
            Extension(intruder),
            Path(task.id),
            Json(UpdateTaskRequest { status: Some("hijacked".to_string()), ..Default::default() }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status_code(), 403);

        let unchanged = state.tasks.find(task.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, "open");
    }

    #[tokio::test]
    async fn missing_id_is_not_found_before_ownership_is_considered() {
        let state = AppState::in_memory();
        let user = auth_user(Access::User);

        let err = get(State(state), Extension(user), Path(Uuid::new_v4()))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 404);
    }
}
