use crate::utils::error::{EtlError, Result};
use crate::utils::logger::LOG_LEVELS;
use chrono::NaiveDate;
use std::collections::HashSet;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::invalid_config(
            field_name,
            path,
            "Path cannot be empty",
        ));
    }

    if path.contains('\0') {
        return Err(EtlError::invalid_config(
            field_name,
            path,
            "Path contains null bytes",
        ));
    }

    Ok(())
}

pub fn validate_non_negative_cost(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(EtlError::invalid_config(
            field_name,
            value,
            "Value must be a finite number",
        ));
    }
    if value < 0.0 {
        return Err(EtlError::invalid_config(
            field_name,
            value,
            "Value cannot be negative",
        ));
    }
    Ok(())
}

pub fn validate_positive_rate(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EtlError::invalid_config(
            field_name,
            value,
            "Value must be a finite number greater than zero",
        ));
    }
    Ok(())
}

/// Parses a `YYYY-MM-DD` calendar date from a configuration value.
pub fn parse_iso_date(field_name: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT).map_err(|e| {
        EtlError::invalid_config(
            field_name,
            value,
            format!("Expected a date in YYYY-MM-DD format ({})", e),
        )
    })
}

pub fn validate_output_formats(field_name: &str, formats: &[String], allowed: &[&str]) -> Result<()> {
    if formats.is_empty() {
        return Err(EtlError::invalid_config(
            field_name,
            "",
            "At least one output format is required",
        ));
    }

    let allowed_set: HashSet<&str> = allowed.iter().copied().collect();
    for format in formats {
        if !allowed_set.contains(format.trim().to_ascii_lowercase().as_str()) {
            return Err(EtlError::invalid_config(
                field_name,
                format,
                format!("Unsupported format. Valid formats: {}", allowed.join(", ")),
            ));
        }
    }

    Ok(())
}

pub fn validate_log_level(field_name: &str, level: &str) -> Result<()> {
    if !LOG_LEVELS.contains(&level.trim().to_ascii_lowercase().as_str()) {
        return Err(EtlError::invalid_config(
            field_name,
            level,
            format!("Unknown log level. Valid levels: {}", LOG_LEVELS.join(", ")),
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::invalid_config(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}
