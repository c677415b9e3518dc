//! Validation helpers and parsing utilities for copy policies.

use crate::defaults::MAX_CHUNK_SIZE;
use crate::error::{ConfigError, ConfigResult};
use crate::model::CopyPolicy;

/// Check that a policy can drive a copy run.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for an empty or path-like descriptor
/// extension, an empty identifier field, or a chunk size outside
/// `1..=16 MiB`.
pub fn validate_policy(policy: &CopyPolicy) -> ConfigResult<()> {
    let extension = policy.descriptor_extension.as_str();
    if extension.trim().is_empty() {
        return Err(ConfigError::invalid(
            "descriptor_extension",
            extension,
            "empty",
        ));
    }
    if extension.contains(['/', '\\']) {
        return Err(ConfigError::invalid(
            "descriptor_extension",
            extension,
            "contains_separator",
        ));
    }
    if policy.identifier_field.trim().is_empty() {
        return Err(ConfigError::invalid(
            "identifier_field",
            policy.identifier_field.as_str(),
            "empty",
        ));
    }
    validate_chunk_size(policy.chunk_size)?;
    Ok(())
}

pub(crate) fn validate_chunk_size(chunk_size: usize) -> ConfigResult<usize> {
    if chunk_size == 0 || chunk_size > MAX_CHUNK_SIZE {
        return Err(ConfigError::invalid(
            "chunk_size",
            chunk_size.to_string(),
            "out_of_range",
        ));
    }
    Ok(chunk_size)
}

pub(crate) fn parse_chunk_size(value: &str) -> ConfigResult<usize> {
    let parsed = value
        .trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::invalid("chunk_size", value, "not_an_integer"))?;
    validate_chunk_size(parsed)
}

pub(crate) fn parse_bool(field: &'static str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(field, value, "not_a_boolean")),
    }
}
