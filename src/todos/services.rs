use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreateTodoInput, TodoPage, TodoStats, UpdateTodoInput},
    repo::TodoRepository,
    repo_types::Todo,
};
use crate::{
    error::{AppError, AppResult},
    pagination::Pagination,
    validation::todos::TITLE_MAX,
};

pub const TODO_NOT_FOUND: &str = "Todo not found";

/// Business rule on titles, re-checked here so the service is safe to call
/// without the HTTP validators in front of it.
fn normalize_title(raw: &str, empty_message: &'static str) -> AppResult<String> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(AppError::validation(empty_message));
    }
    if raw.chars().count() > TITLE_MAX {
        return Err(AppError::validation("Todo title must be less than 200 characters"));
    }
    Ok(title.to_owned())
}

fn normalize_description(raw: Option<String>) -> Option<String> {
    raw.map(|d| d.trim().to_owned()).filter(|d| !d.is_empty())
}

fn percentage(part: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as i64
}

#[instrument(skip(todos))]
pub async fn list_by_user(
    todos: &dyn TodoRepository,
    user_id: Uuid,
    pagination: Pagination,
) -> AppResult<TodoPage> {
    let (items, total) = tokio::try_join!(
        todos.list_by_user(user_id, pagination.limit, pagination.offset()),
        todos.count_by_user(user_id)
    )?;
    Ok(TodoPage {
        todos: items,
        total,
        page: pagination.page,
        limit: pagination.limit,
        total_pages: pagination.total_pages(total),
    })
}

#[instrument(skip(todos))]
pub async fn get_by_id(todos: &dyn TodoRepository, id: Uuid, user_id: Uuid) -> AppResult<Todo> {
    todos
        .find_by_id(id, user_id)
        .await?
        .ok_or(AppError::NotFound(TODO_NOT_FOUND))
}

#[instrument(skip(todos, input))]
pub async fn create(
    todos: &dyn TodoRepository,
    user_id: Uuid,
    input: CreateTodoInput,
) -> AppResult<Todo> {
    let input = CreateTodoInput {
        title: normalize_title(&input.title, "Todo title is required")?,
        description: normalize_description(input.description),
    };
    let todo = todos.insert(user_id, &input).await?;
    info!(todo_id = %todo.id, "todo created");
    Ok(todo)
}

#[instrument(skip(todos, changes))]
pub async fn update(
    todos: &dyn TodoRepository,
    id: Uuid,
    user_id: Uuid,
    changes: UpdateTodoInput,
) -> AppResult<Todo> {
    get_by_id(todos, id, user_id).await?;

    let changes = UpdateTodoInput {
        title: changes
            .title
            .map(|t| normalize_title(&t, "Todo title cannot be empty"))
            .transpose()?,
        description: changes.description.map(normalize_description),
        completed: changes.completed,
    };

    // The row can vanish between the ownership check and the write.
    let todo = todos
        .update(id, user_id, &changes)
        .await?
        .ok_or(AppError::NotFound(TODO_NOT_FOUND))?;
    info!(todo_id = %todo.id, "todo updated");
    Ok(todo)
}

#[instrument(skip(todos))]
pub async fn delete(todos: &dyn TodoRepository, id: Uuid, user_id: Uuid) -> AppResult<()> {
    get_by_id(todos, id, user_id).await?;
    if !todos.delete(id, user_id).await? {
        return Err(AppError::NotFound(TODO_NOT_FOUND));
    }
    info!(todo_id = %id, "todo deleted");
    Ok(())
}

#[instrument(skip(todos))]
pub async fn stats(todos: &dyn TodoRepository, user_id: Uuid) -> AppResult<TodoStats> {
    let counts = todos.completion_counts(user_id).await?;
    let pending = counts.total - counts.completed;
    Ok(TodoStats {
        total: counts.total,
        completed: counts.completed,
        pending,
        completion_rate: percentage(counts.completed, counts.total),
        pending_rate: percentage(pending, counts.total),
    })
}
