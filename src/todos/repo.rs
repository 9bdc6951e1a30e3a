use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::dto::{CreateTodoInput, UpdateTodoInput};
use super::repo_types::{CompletionCounts, Todo};
use crate::error::RepoError;

/// Persistence for todos. Every lookup and mutation is scoped by owner, so a
/// todo belonging to someone else behaves exactly like a missing one.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Newest first.
    async fn list_by_user(&self, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Todo>, RepoError>;
    async fn count_by_user(&self, user_id: Uuid) -> Result<i64, RepoError>;
    async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<Todo>, RepoError>;
    async fn insert(&self, user_id: Uuid, input: &CreateTodoInput) -> Result<Todo, RepoError>;
    /// `None` when no todo matches `(id, user_id)`.
    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        changes: &UpdateTodoInput,
    ) -> Result<Option<Todo>, RepoError>;
    /// `false` when no todo matches `(id, user_id)`.
    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, RepoError>;
    async fn completion_counts(&self, user_id: Uuid) -> Result<CompletionCounts, RepoError>;
}

pub struct PgTodoRepository {
    pub db: PgPool,
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn list_by_user(&self, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Todo>, RepoError> {
        let rows = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, description, completed, user_id, created_at, updated_at
            FROM todos
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64, RepoError> {
        let total = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM todos WHERE user_id = $1"#)
            .bind(user_id)
            .fetch_one(&self.db)
            .await?;
        Ok(total)
    }

    async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<Todo>, RepoError> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, description, completed, user_id, created_at, updated_at
            FROM todos
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(todo)
    }

    async fn insert(&self, user_id: Uuid, input: &CreateTodoInput) -> Result<Todo, RepoError> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (id, title, description, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, completed, user_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.title)
        .bind(input.description.as_deref())
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;
        Ok(todo)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        changes: &UpdateTodoInput,
    ) -> Result<Option<Todo>, RepoError> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET title       = COALESCE($3, title),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                completed   = COALESCE($6, completed),
                updated_at  = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, title, description, completed, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(changes.title.as_deref())
        .bind(changes.description.is_some())
        .bind(changes.description.clone().flatten())
        .bind(changes.completed)
        .fetch_optional(&self.db)
        .await?;
        Ok(todo)
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query(r#"DELETE FROM todos WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn completion_counts(&self, user_id: Uuid) -> Result<CompletionCounts, RepoError> {
        let counts = sqlx::query_as::<_, CompletionCounts>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE completed) AS completed
            FROM todos
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;
        Ok(counts)
    }
}
