//! Request payload validation.
//!
//! Validators run against the raw JSON body so that type mismatches are
//! reported alongside every other violation instead of failing at
//! deserialization. On success they return the normalized input.

pub mod auth;
pub mod todos;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::AppError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Accumulates violation messages for one payload.
#[derive(Debug, Default)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    /// `Ok(value)` when nothing was recorded, the collected messages otherwise.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, AppError> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(AppError::Validation(self.0))
        }
    }
}

pub(crate) fn as_object(body: &Value) -> Result<&Map<String, Value>, AppError> {
    body.as_object()
        .ok_or_else(|| AppError::validation("Request body must be a JSON object"))
}

/// Mirrors a loose "is this value provided" check: absent, null, `false`,
/// zero and the empty string all count as missing.
pub(crate) fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(_) => false,
    }
}

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Messages of a validation failure; panics on anything else.
#[cfg(test)]
pub(crate) fn errors_of<T: std::fmt::Debug>(result: Result<T, AppError>) -> Vec<String> {
    match result {
        Err(AppError::Validation(errors)) => errors,
        other => panic!("expected validation error, got {other:?}"),
    }
}
