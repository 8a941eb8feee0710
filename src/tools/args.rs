//! JSON argument extraction with range checks.
//!
//! A `null` argument counts as missing.

use std::ops::RangeInclusive;

use super::error::ToolError;

fn present<'a>(args: &'a serde_json::Value, name: &str) -> Option<&'a serde_json::Value> {
    args.get(name).filter(|v| !v.is_null())
}

/// Integer argument within `range`, or `None` when absent.
pub fn optional_int(
    args: &serde_json::Value,
    name: &str,
    range: RangeInclusive<i64>,
) -> Result<Option<i64>, ToolError> {
    let Some(value) = present(args, name) else {
        return Ok(None);
    };
    let n = value
        .as_i64()
        .ok_or_else(|| ToolError::Validation(format!("{name} must be an integer")))?;
    if !range.contains(&n) {
        return Err(ToolError::Validation(format!(
            "{name} must be {}-{}",
            range.start(),
            range.end()
        )));
    }
    Ok(Some(n))
}

/// Integer argument within `range`.
pub fn required_int(
    args: &serde_json::Value,
    name: &str,
    range: RangeInclusive<i64>,
) -> Result<i64, ToolError> {
    let (lo, hi) = (*range.start(), *range.end());
    optional_int(args, name, range)?.ok_or_else(|| {
        ToolError::Validation(format!("missing required argument: {name} ({lo}-{hi})"))
    })
}

/// Boolean argument.
pub fn required_bool(args: &serde_json::Value, name: &str) -> Result<bool, ToolError> {
    present(args, name)
        .ok_or_else(|| ToolError::Validation(format!("missing required argument: {name}")))?
        .as_bool()
        .ok_or_else(|| ToolError::Validation(format!("{name} must be a boolean")))
}

/// String argument, or `None` when absent.
pub fn optional_str<'a>(
    args: &'a serde_json::Value,
    name: &str,
) -> Result<Option<&'a str>, ToolError> {
    present(args, name)
        .map(|v| {
            v.as_str()
                .ok_or_else(|| ToolError::Validation(format!("{name} must be a string")))
        })
        .transpose()
}

/// String argument.
pub fn required_str<'a>(args: &'a serde_json::Value, name: &str) -> Result<&'a str, ToolError> {
    optional_str(args, name)?
        .ok_or_else(|| ToolError::Validation(format!("missing required argument: {name}")))
}
