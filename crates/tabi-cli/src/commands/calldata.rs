//! Call data commands

use clap::Subcommand;
use tabi_abi::{Contract, Value};
use tabi_primitives::bytes::{arrayify, hexlify};

use super::parse_values;
use crate::{config::Config, output::Output, CliError};

/// Call data subcommands
#[derive(Debug, Subcommand)]
pub enum CalldataCommand {
    /// Encode a call: selector followed by the arguments
    Encode {
        /// Function signature
        #[arg(long = "sig")]
        signature: String,
        /// Arguments as a JSON array
        values: String,
    },
    /// Decode call data against one or more function signatures
    Decode {
        /// Function signatures to match the selector against
        #[arg(long = "sig", required = true)]
        signatures: Vec<String>,
        /// 0x-prefixed call data
        data: String,
    },
}

impl CalldataCommand {
    pub fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        match self {
            CalldataCommand::Encode { signature, values } => {
                encode_call(config, &signature, &values, json)
            }
            CalldataCommand::Decode { signatures, data } => {
                decode_call(config, &signatures, &data, json)
            }
        }
    }
}

fn encode_call(config: &Config, signature: &str, values: &str, json: bool) -> Result<(), CliError> {
    let contract = Contract::from_signatures_with_config(&[signature], config.abi.clone())?;
    let function = contract
        .functions()
        .first()
        .ok_or_else(|| CliError::InvalidInput(format!("not a function signature: {}", signature)))?;

    let args = parse_values(values)?;
    let data = hexlify(&contract.encode_call(function.name(), &args)?);

    Output::new(json)
        .field("function", &function.signature)
        .field("data", &data)
        .message(&data)
        .print();
    Ok(())
}

fn decode_call(
    config: &Config,
    signatures: &[String],
    data: &str,
    json: bool,
) -> Result<(), CliError> {
    let signatures: Vec<&str> = signatures.iter().map(String::as_str).collect();
    let contract = Contract::from_signatures_with_config(&signatures, config.abi.clone())?;
    let call = contract.decode_call(&arrayify(data)?)?;

    let mut lines = vec![format!("function: {}", call.name)];
    for ((ty, name), value) in call.types.iter().zip(&call.names).zip(call.inputs.iter()) {
        lines.push(format!("{} {}: {}", ty, name, value));
    }

    Output::new(json)
        .field("function", &call.name)
        .field_value("types", serde_json::json!(call.types))
        .field_value("names", serde_json::json!(call.names))
        .field_value("inputs", Value::List(call.inputs).to_json())
        .message(&lines.join("\n"))
        .print();
    Ok(())
}
