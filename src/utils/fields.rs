use crate::error::{AppError, AppResult};

/// Trimmed, non-empty, at most `max` characters
pub fn require_text(field: &str, value: &str, max: usize) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{} may not be blank", field)));
    }
    if value.chars().count() > max {
        return Err(AppError::BadRequest(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(value.to_string())
}

pub fn require_email(field: &str, value: &str) -> AppResult<String> {
    let value = require_text(field, value, 254)?;
    if !looks_like_email(&value) {
        return Err(AppError::BadRequest(format!(
            "{} must be a valid email address",
            field
        )));
    }
    Ok(value)
}

pub fn require_positive(field: &str, value: i32) -> AppResult<i32> {
    if value <= 0 {
        return Err(AppError::BadRequest(format!("{} must be positive", field)));
    }
    Ok(value)
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && !value.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}
