use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{NewTask, NewUser, StoreError, Task, TaskPatch, TaskStore, User, UserStore};

/// Postgres-unique-violation SQLSTATE, used to map duplicate emails to a 409.
const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

/// Postgres-backed task store. Every mutation is a single statement, so the
/// contract's atomicity requirement falls out of row-level atomicity; there
/// are no transactions, locks, or retries here.
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn list_all(&self) -> Result<Vec<Task>, StoreError> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT id, owner_id, name, description, status, created_at \
             FROM tasks ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT id, owner_id, name, description, status, created_at \
             FROM tasks WHERE owner_id = $1 ORDER BY created_at, id",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            "SELECT id, owner_id, name, description, status, created_at \
             FROM tasks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn create(&self, owner_id: Uuid, draft: NewTask) -> Result<Task, StoreError> {
        draft.validate()?;

        let task = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (id, owner_id, name, description, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, now()) \
             RETURNING id, owner_id, name, description, status, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(task)
    }

    async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<Task, StoreError> {
        patch.validate()?;

        // COALESCE keeps unsupplied fields untouched in one statement, so a
        // concurrent writer never sees a half-applied merge.
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 status = COALESCE($4, status) \
             WHERE id = $1 \
             RETURNING id, owner_id, name, description, status, created_at",
        )
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.status.as_deref())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::not_found(format!("task {}", id)))?;
        Ok(task)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(format!("task {}", id)));
        }
        Ok(())
    }
}

/// Postgres-backed user store. Email uniqueness is enforced by the unique
/// index on users.email and surfaced as a Conflict.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, draft: NewUser) -> Result<User, StoreError> {
        let result = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash, access, token_version, created_at) \
             VALUES ($1, $2, $3, $4, $5, 0, now()) \
             RETURNING id, name, email, password_hash, access, token_version, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.password_hash)
        .bind(&draft.access)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(err) if is_unique_violation(&err) => {
                Err(StoreError::Conflict(format!("email {} already registered", draft.email)))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, access, token_version, created_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, access, token_version, created_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn bump_token_version(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET token_version = token_version + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(format!("user {}", id)));
        }
        Ok(())
    }
}
