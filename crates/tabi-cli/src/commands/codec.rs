//! Encode and decode commands

use clap::Args;
use tabi_abi::{AbiCoder, Value};

use super::{parse_types, parse_values};
use crate::{config::Config, output::Output, CliError};

/// Encode values for a type list
#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// Comma-separated types, e.g. "address,uint256[]"
    pub types: String,
    /// Values as a JSON array, e.g. '["0x...", [1, 2]]'
    pub values: String,
}

impl EncodeArgs {
    pub fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let types = parse_types(&self.types)?;
        let values = parse_values(&self.values)?;

        let data = AbiCoder::with_config(config.abi.clone()).encode(&types, &values)?;

        Output::new(json)
            .field("data", &data)
            .message(&data)
            .print();
        Ok(())
    }
}

/// Decode ABI data for a type list
#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Comma-separated types
    pub types: String,
    /// 0x-prefixed hex data
    pub data: String,
}

impl DecodeArgs {
    pub fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let types = parse_types(&self.types)?;
        let values = AbiCoder::with_config(config.abi.clone()).decode_hex(&types, &self.data)?;

        let lines: Vec<String> = types
            .iter()
            .zip(values.iter())
            .map(|(ty, value)| format!("{}: {}", ty, value))
            .collect();

        Output::new(json)
            .field_value("values", Value::List(values).to_json())
            .message(&lines.join("\n"))
            .print();
        Ok(())
    }
}
