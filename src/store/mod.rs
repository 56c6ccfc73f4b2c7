pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use memory::{MemoryTaskStore, MemoryUserStore};
pub use postgres::{PgTaskStore, PgUserStore};

/// Errors surfaced by the stores. `NotFound` and `Validation` are the only
/// variants the task store produces on its own; everything else is mapped to
/// a generic 500/503 at the boundary without leaking detail.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: field '{field}' {reason}")]
    Validation { field: &'static str, reason: &'static str },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl StoreError {
    pub fn not_found(what: impl Into<String>) -> Self {
        StoreError::NotFound(what.into())
    }

    pub fn missing_field(field: &'static str) -> Self {
        StoreError::Validation { field, reason: "is required and must not be empty" }
    }
}

/// A task record. `id` and `owner_id` are assigned at creation and never
/// change; `created_at` drives the creation-order listing guarantee.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a task. The owner is passed separately by the
/// handler from the authenticated identity, never read from the body.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub name: String,
    pub description: String,
    pub status: String,
}

impl NewTask {
    /// Defensive check mirroring the request-level validation. The store
    /// rejects empty required fields even if a caller skipped validation.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.name.trim().is_empty() {
            return Err(StoreError::missing_field("name"));
        }
        if self.description.trim().is_empty() {
            return Err(StoreError::missing_field("description"));
        }
        if self.status.trim().is_empty() {
            return Err(StoreError::missing_field("status"));
        }
        Ok(())
    }
}

/// Partial update: only supplied fields are overwritten. `id` and `owner_id`
/// are not representable here, so they cannot be mutated through `update`.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.status.is_none()
    }

    /// Supplied fields must still be non-empty; a blank name is a validation
    /// failure, not a no-op.
    pub fn validate(&self) -> Result<(), StoreError> {
        if matches!(self.name.as_deref(), Some(s) if s.trim().is_empty()) {
            return Err(StoreError::missing_field("name"));
        }
        if matches!(self.description.as_deref(), Some(s) if s.trim().is_empty()) {
            return Err(StoreError::missing_field("description"));
        }
        if matches!(self.status.as_deref(), Some(s) if s.trim().is_empty()) {
            return Err(StoreError::missing_field("status"));
        }
        Ok(())
    }

    pub fn apply_to(&self, task: &mut Task) {
        if let Some(name) = &self.name {
            task.name = name.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(status) = &self.status {
            task.status = status.clone();
        }
    }
}

/// Persistence contract for task records. Listings are in creation order.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Task>, StoreError>;
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, StoreError>;
    async fn find(&self, id: Uuid) -> Result<Option<Task>, StoreError>;
    async fn create(&self, owner_id: Uuid, draft: NewTask) -> Result<Task, StoreError>;
    async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<Task, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// A user account. Only consumed by the auth layer; tasks reference users by
/// id alone. `token_version` is bumped on logout so every outstanding token
/// minted before the bump stops validating.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub access: String,
    pub token_version: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub access: String,
}

/// Persistence contract for user accounts. Email is the unique lookup key.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, draft: NewUser) -> Result<User, StoreError>;
    async fn find(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn bump_token_version(&self, id: Uuid) -> Result<(), StoreError>;
}
