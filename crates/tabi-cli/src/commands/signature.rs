//! Signature inspection commands

use clap::Args;
use tabi_abi::{
    canonical_signature, event_topic, format_signature, function_selector, parse_signature,
    Fragment,
};
use tabi_primitives::bytes::hexlify;

use crate::{output::Output, CliError};

/// Parse a function, constructor or event signature
#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Signature, e.g. "function transfer(address to, uint amount) returns (bool)"
    pub signature: String,
}

impl ParseArgs {
    pub fn execute(self, json: bool) -> Result<(), CliError> {
        let fragment = parse_signature(&self.signature)?;
        let formatted = format_signature(&fragment)?;
        let canonical = canonical_signature(&fragment)?;

        let mut output = Output::new(json)
            .field("kind", fragment.kind_name())
            .field("signature", &formatted)
            .field("canonical", &canonical)
            .field_value("fragment", serde_json::to_value(&fragment)?);
        let mut message = format!("{} {}", fragment.kind_name(), formatted);

        match &fragment {
            Fragment::Event(_) => {
                let topic = event_topic(&self.signature)?.to_hex();
                message.push_str(&format!("\ntopic: {}", topic));
                output = output.field("topic", &topic);
            }
            Fragment::Function(function) if !function.is_constructor() => {
                let selector = hexlify(&function_selector(&self.signature)?);
                message.push_str(&format!("\nselector: {}", selector));
                output = output.field("selector", &selector);
            }
            Fragment::Function(_) => {}
        }

        output.message(&message).print();
        Ok(())
    }
}

/// Print the 4-byte selector of a function signature
#[derive(Debug, Args)]
pub struct SelectorArgs {
    /// Function signature, e.g. "transfer(address,uint256)"
    pub signature: String,
}

impl SelectorArgs {
    pub fn execute(self, json: bool) -> Result<(), CliError> {
        let selector = hexlify(&function_selector(&self.signature)?);
        Output::new(json)
            .field("selector", &selector)
            .message(&selector)
            .print();
        Ok(())
    }
}
