use serde_json::Value;

use super::{as_object, char_len, is_blank, is_valid_email, Violations};
use crate::auth::dto::{LoginInput, RegisterInput};
use crate::error::AppError;

const MIN_PASSWORD_LEN: usize = 6;
const NAME_LEN: std::ops::RangeInclusive<usize> = 2..=50;

/// Normalized email if the field is present and well-formed.
fn check_email(value: Option<&Value>, violations: &mut Violations) -> Option<String> {
    if is_blank(value) {
        violations.push("Email is required");
        return None;
    }
    match value.and_then(Value::as_str).map(|e| e.trim().to_lowercase()) {
        Some(email) if is_valid_email(&email) => Some(email),
        _ => {
            violations.push("Please provide a valid email address");
            None
        }
    }
}

fn check_password_present(value: Option<&Value>, violations: &mut Violations) -> Option<String> {
    if is_blank(value) {
        violations.push("Password is required");
        return None;
    }
    match value.and_then(Value::as_str) {
        Some(password) => Some(password.to_owned()),
        None => {
            violations.push("Password must be a string");
            None
        }
    }
}

pub fn validate_register(body: &Value) -> Result<RegisterInput, AppError> {
    let fields = as_object(body)?;
    let mut violations = Violations::default();

    let email = check_email(fields.get("email"), &mut violations);

    let password = check_password_present(fields.get("password"), &mut violations);
    if let Some(p) = &password {
        if char_len(p) < MIN_PASSWORD_LEN {
            violations.push("Password must be at least 6 characters long");
        }
    }

    let name = match fields.get("name") {
        None => None,
        v if is_blank(v) => None,
        Some(Value::String(raw)) => {
            let trimmed = raw.trim();
            if !NAME_LEN.contains(&char_len(trimmed)) {
                violations.push("Name must be between 2 and 50 characters");
            }
            Some(trimmed.to_owned())
        }
        Some(_) => {
            violations.push("Name must be a string");
            None
        }
    };

    violations.finish(|| RegisterInput {
        email: email.unwrap_or_default(),
        password: password.unwrap_or_default(),
        name,
    })
}

pub fn validate_login(body: &Value) -> Result<LoginInput, AppError> {
    let fields = as_object(body)?;
    let mut violations = Violations::default();

    let email = check_email(fields.get("email"), &mut violations);
    let password = check_password_present(fields.get("password"), &mut violations);

    violations.finish(|| LoginInput {
        email: email.unwrap_or_default(),
        password: password.unwrap_or_default(),
    })
}
