//! Subcommands

pub mod address;
pub mod calldata;
pub mod codec;
pub mod signature;

use tabi_abi::{split_nesting, Value};

use crate::CliError;

/// Split a comma-separated type list, keeping tuple members together
pub fn parse_types(types: &str) -> Result<Vec<String>, CliError> {
    Ok(split_nesting(types)?
        .into_iter()
        .map(|ty| ty.trim().to_string())
        .collect())
}

/// Parse a JSON array of argument values
pub fn parse_values(values: &str) -> Result<Vec<Value>, CliError> {
    match serde_json::from_str::<serde_json::Value>(values)? {
        serde_json::Value::Array(items) => Ok(items
            .into_iter()
            .map(Value::from_json)
            .collect::<Result<Vec<_>, _>>()?),
        _ => Err(CliError::InvalidInput(
            "values must be a JSON array".to_string(),
        )),
    }
}
