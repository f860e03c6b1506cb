use crate::utils::error::{AllocError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(AllocError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(AllocError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 容量必須是正整數；用 i64 接收才能分辨出負數
pub fn validate_capacity(activity: &str, capacity: i64) -> Result<usize> {
    if capacity < 1 {
        return Err(AllocError::InvalidConfigValueError {
            field: format!("activities.{}", activity),
            value: capacity.to_string(),
            reason: "Capacity must be a positive integer".to_string(),
        });
    }
    usize::try_from(capacity).map_err(|_| AllocError::InvalidConfigValueError {
        field: format!("activities.{}", activity),
        value: capacity.to_string(),
        reason: "Capacity does not fit in memory on this platform".to_string(),
    })
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| AllocError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AllocError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_output_formats(field_name: &str, formats: &[String]) -> Result<()> {
    let valid_formats = ["csv", "json"];
    let mut seen = HashSet::new();

    for format in formats {
        if !valid_formats.contains(&format.as_str()) {
            return Err(AllocError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format.clone(),
                reason: format!(
                    "Unsupported format. Valid formats: {}",
                    valid_formats.join(", ")
                ),
            });
        }
        if !seen.insert(format.as_str()) {
            return Err(AllocError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format.clone(),
                reason: "Format listed more than once".to_string(),
            });
        }
    }

    if formats.is_empty() {
        return Err(AllocError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one output format is required".to_string(),
        });
    }

    Ok(())
}
