use serde::Serialize;
use utoipa::{IntoParams, ToSchema};

use super::repo_types::Todo;

/// Normalized payload for `POST /todos`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTodoInput {
    pub title: String,
    pub description: Option<String>,
}

/// Normalized payload for `PUT /todos/:id`. Absent fields are left untouched;
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTodoInput {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
}

/// Raw `?page=&limit=` query; parsed leniently by [`crate::pagination::Pagination`].
#[derive(Debug, Default, PartialEq, Eq, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// 1-based page number, defaults to 1.
    pub page: Option<String>,
    /// Page size, defaults to 10 and is capped at 100.
    pub limit: Option<String>,
}

impl ListQuery {
    /// Picks `page` and `limit` out of decoded query pairs. The first
    /// occurrence of a repeated key wins; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoPage {
    pub todos: Vec<Todo>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoStats {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
    pub completion_rate: i64,
    pub pending_rate: i64,
}
