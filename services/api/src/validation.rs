//! Input validation utilities

use chrono::{DateTime, NaiveDate, Utc};
use common::types::TaskStatus;
use regex::Regex;
use std::sync::OnceLock;

/// Validate a display name
pub fn validate_name(name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Name is required".to_string());
    }

    let length = name.chars().count();
    if length < 2 || length > 50 {
        return Err("Name must be between 2 and 50 characters".to_string());
    }

    Ok(())
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Please provide a valid email".to_string());
    }

    Ok(())
}

/// Validate a password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 6 {
        return Err("Password must be at least 6 characters".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate an avatar URI; the empty string clears the avatar
pub fn validate_avatar(avatar: &str) -> Result<(), String> {
    if avatar.is_empty() {
        return Ok(());
    }

    if !avatar.starts_with("http://") && !avatar.starts_with("https://") {
        return Err("Avatar must be a valid URL".to_string());
    }

    Ok(())
}

/// Validate a task title
pub fn validate_title(title: &str) -> Result<(), String> {
    let title = title.trim();
    if title.is_empty() {
        return Err("Task title is required".to_string());
    }

    if title.chars().count() > 100 {
        return Err("Title must be between 1 and 100 characters".to_string());
    }

    Ok(())
}

/// Validate a task description
pub fn validate_description(description: &str) -> Result<(), String> {
    if description.chars().count() > 500 {
        return Err("Description cannot exceed 500 characters".to_string());
    }

    Ok(())
}

/// Parse a task status from its wire representation
pub fn parse_status(value: &str) -> Result<TaskStatus, String> {
    TaskStatus::parse(value)
        .ok_or_else(|| "Status must be pending, in-progress, or completed".to_string())
}

/// Parse a due date from an RFC 3339 timestamp or a plain calendar date
pub fn parse_due_date(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err("Due date must be a valid date".to_string())
}
