//! In-memory store with the same ownership semantics as the Postgres
//! repositories. Backs the test suite and database-less local runs.

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::{repo::UserRepository, repo_types::User};
use crate::error::RepoError;
use crate::todos::{
    dto::{CreateTodoInput, UpdateTodoInput},
    repo::TodoRepository,
    repo_types::{CompletionCounts, Todo},
};

#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<Vec<User>>,
    todos: RwLock<Vec<Todo>>, // insertion order
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        name: Option<&str>,
    ) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
            return Err(RepoError::Conflict);
        }
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_owned(),
            name: name.map(str::to_owned),
            password_hash: password_hash.to_owned(),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl TodoRepository for InMemoryStore {
    async fn list_by_user(&self, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Todo>, RepoError> {
        let todos = self.todos.read().await;
        Ok(todos
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64, RepoError> {
        let todos = self.todos.read().await;
        Ok(todos.iter().filter(|t| t.user_id == user_id).count() as i64)
    }

    async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<Todo>, RepoError> {
        let todos = self.todos.read().await;
        Ok(todos
            .iter()
            .find(|t| t.id == id && t.user_id == user_id)
            .cloned())
    }

    async fn insert(&self, user_id: Uuid, input: &CreateTodoInput) -> Result<Todo, RepoError> {
        let now = OffsetDateTime::now_utc();
        let todo = Todo {
            id: Uuid::new_v4(),
            title: input.title.clone(),
            description: input.description.clone(),
            completed: false,
            user_id,
            created_at: now,
            updated_at: now,
        };
        self.todos.write().await.push(todo.clone());
        Ok(todo)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        changes: &UpdateTodoInput,
    ) -> Result<Option<Todo>, RepoError> {
        let mut todos = self.todos.write().await;
        let Some(todo) = todos.iter_mut().find(|t| t.id == id && t.user_id == user_id) else {
            return Ok(None);
        };
        if let Some(title) = &changes.title {
            todo.title = title.clone();
        }
        if let Some(description) = &changes.description {
            todo.description = description.clone();
        }
        if let Some(completed) = changes.completed {
            todo.completed = completed;
        }
        todo.updated_at = OffsetDateTime::now_utc();
        Ok(Some(todo.clone()))
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|t| !(t.id == id && t.user_id == user_id));
        Ok(todos.len() != before)
    }

    async fn completion_counts(&self, user_id: Uuid) -> Result<CompletionCounts, RepoError> {
        let todos = self.todos.read().await;
        Ok(todos
            .iter()
            .filter(|t| t.user_id == user_id)
            .fold(CompletionCounts::default(), |acc, t| CompletionCounts {
                total: acc.total + 1,
                completed: acc.completed + i64::from(t.completed),
            }))
    }
}
