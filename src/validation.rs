use crate::error::{ReunionError, ReunionResult};
use crate::model::AgeGroup;

/// Validates that a string is not blank (empty or whitespace-only).
/// Returns the trimmed string on success.
pub fn non_blank(value: &str, field: &str) -> ReunionResult<String> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        Err(ReunionError::BlankField {
            field: field.to_string(),
        })
    } else {
        Ok(trimmed)
    }
}

/// Parses an age group case-insensitively ("adult", "CHILD", ...).
pub fn age_group(value: &str) -> ReunionResult<AgeGroup> {
    value.trim().parse()
}

/// Validates the name and age group of a member request in one go.
pub fn member_input(name: &str, age_group_value: &str) -> ReunionResult<(String, AgeGroup)> {
    let name = non_blank(name, "name")?;
    let age = age_group(age_group_value)?;
    Ok((name, age))
}
