use serde_json::Value;

use super::{as_object, char_len, is_blank, Violations};
use crate::error::AppError;
use crate::todos::dto::{CreateTodoInput, UpdateTodoInput};

pub const TITLE_MAX: usize = 200;
pub const DESCRIPTION_MAX: usize = 1000;

/// Checks a title already known to be present.
fn check_title(value: &Value, violations: &mut Violations) -> Option<String> {
    let Some(raw) = value.as_str() else {
        violations.push("Title must be a string");
        return None;
    };
    if raw.trim().is_empty() {
        violations.push("Title cannot be empty");
        None
    } else if char_len(raw) > TITLE_MAX {
        violations.push("Title must be less than 200 characters");
        None
    } else {
        Some(raw.trim().to_owned())
    }
}

/// `None` when absent, `Some(None)` when explicitly cleared.
fn check_description(value: Option<&Value>, violations: &mut Violations) -> Option<Option<String>> {
    match value? {
        Value::Null => Some(None),
        Value::String(raw) if char_len(raw) > DESCRIPTION_MAX => {
            violations.push("Description must be less than 1000 characters");
            None
        }
        Value::String(raw) => {
            let trimmed = raw.trim();
            Some((!trimmed.is_empty()).then(|| trimmed.to_owned()))
        }
        _ => {
            violations.push("Description must be a string");
            None
        }
    }
}

pub fn validate_create_todo(body: &Value) -> Result<CreateTodoInput, AppError> {
    let fields = as_object(body)?;
    let mut violations = Violations::default();

    let title = match fields.get("title") {
        Some(v) if !is_blank(Some(v)) => check_title(v, &mut violations),
        _ => {
            violations.push("Title is required");
            None
        }
    };
    let description = check_description(fields.get("description"), &mut violations).flatten();

    violations.finish(|| CreateTodoInput {
        title: title.unwrap_or_default(),
        description,
    })
}

pub fn validate_update_todo(body: &Value) -> Result<UpdateTodoInput, AppError> {
    let fields = as_object(body)?;
    let mut violations = Violations::default();

    if !["title", "description", "completed"]
        .iter()
        .any(|k| fields.contains_key(*k))
    {
        violations.push("At least one field (title, description, or completed) must be provided");
    }

    let title = fields
        .get("title")
        .and_then(|v| check_title(v, &mut violations));
    let description = check_description(fields.get("description"), &mut violations);
    let completed = match fields.get("completed") {
        None => None,
        Some(Value::Bool(b)) => Some(*b),
        Some(_) => {
            violations.push("Completed must be a boolean");
            None
        }
    };

    violations.finish(|| UpdateTodoInput {
        title,
        description,
        completed,
    })
}
