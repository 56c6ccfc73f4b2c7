use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use uuid::Uuid;

use super::{NewTask, NewUser, StoreError, Task, TaskPatch, TaskStore, User, UserStore};

/// In-memory task store. Backs the integration tests and serves as the
/// fallback backend when no DATABASE_URL is configured, so the server can
/// run (and be demoed) without a Postgres instance. A Vec keeps insertion
/// order, which is the listing order the contract promises.
#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: Mutex<Vec<Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list_all(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.lock().unwrap();
        Ok(tasks.iter().filter(|t| t.owner_id == owner_id).cloned().collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let tasks = self.tasks.lock().unwrap();
        Ok(tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn create(&self, owner_id: Uuid, draft: NewTask) -> Result<Task, StoreError> {
        draft.validate()?;

        let task = Task {
            id: Uuid::new_v4(),
            owner_id,
            name: draft.name,
            description: draft.description,
            status: draft.status,
            created_at: Utc::now(),
        };

        self.tasks.lock().unwrap().push(task.clone());
        Ok(task)
    }

    async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<Task, StoreError> {
        patch.validate()?;

        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::not_found(format!("task {}", id)))?;

        patch.apply_to(task);
        Ok(task.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tasks = self.tasks.lock().unwrap();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);

        if tasks.len() == before {
            return Err(StoreError::not_found(format!("task {}", id)));
        }
        Ok(())
    }
}

/// In-memory user store with the same role as [`MemoryTaskStore`].
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, draft: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();

        if users.iter().any(|u| u.email == draft.email) {
            return Err(StoreError::Conflict(format!("email {} already registered", draft.email)));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: draft.name,
            email: draft.email,
            password_hash: draft.password_hash,
            access: draft.access,
            token_version: 0,
            created_at: Utc::now(),
        };

        users.push(user.clone());
        Ok(user)
    }

    async fn find(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn bump_token_version(&self, id: Uuid) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| StoreError::not_found(format!("user {}", id)))?;

        user.token_version += 1;
        Ok(())
    }
}
