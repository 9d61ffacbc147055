//! Contract interface built from human-readable signatures

use tabi_crypto::{id, keccak256};
use tabi_primitives::{bytes::hexlify, Address, H256};
use tracing::debug;

use crate::abi_coder::AbiCoder;
use crate::config::AbiConfig;
use crate::error::{AbiError, ErrorContext};
use crate::signature::{canonical_signature, format_param_type, parse_signature};
use crate::types::{EventFragment, Fragment, FunctionFragment, ParamType};
use crate::value::{Value, Values};

/// Selector length in bytes
pub const SELECTOR_LEN: usize = 4;

/// First 4 bytes of the Keccak-256 hash of the canonical signature
///
/// ```
/// use tabi_abi::function_selector;
///
/// let selector = function_selector("function transfer(address to, uint amount)").unwrap();
/// assert_eq!(selector, [0xa9, 0x05, 0x9c, 0xbb]);
/// ```
pub fn function_selector(signature: &str) -> Result<[u8; SELECTOR_LEN], AbiError> {
    let canonical = canonical_signature(&parse_signature(signature)?)?;
    Ok(id(&canonical).selector())
}

/// Keccak-256 hash of the canonical event signature
pub fn event_topic(signature: &str) -> Result<H256, AbiError> {
    let text = signature.trim_start();
    let fragment = if text.starts_with("event ") {
        parse_signature(text)?
    } else {
        parse_signature(&format!("event {}", text))?
    };
    Ok(keccak256(canonical_signature(&fragment)?.as_bytes()))
}

/// A function of the contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    /// Canonical signature (e.g., "transfer(address,uint256)")
    pub signature: String,
    /// Function selector (4 bytes)
    pub selector: [u8; SELECTOR_LEN],
    /// Parsed fragment
    pub fragment: FunctionFragment,
}

impl FunctionDef {
    /// Function name
    pub fn name(&self) -> &str {
        self.fragment.name.as_deref().unwrap_or_default()
    }

    /// Input parameters
    pub fn inputs(&self) -> &[ParamType] {
        &self.fragment.inputs
    }

    /// Output parameters
    pub fn outputs(&self) -> &[ParamType] {
        self.fragment.outputs()
    }
}

/// An event of the contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDef {
    /// Canonical signature
    pub signature: String,
    /// Topic hash
    pub topic: H256,
    /// Parsed fragment
    pub fragment: EventFragment,
}

/// Call data decoded against the matching function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCall {
    /// Function name
    pub name: String,
    /// Input type strings
    pub types: Vec<String>,
    /// Input names
    pub names: Vec<String>,
    /// Decoded arguments
    pub inputs: Values,
}

/// Contract helper for encoding/decoding function calls
#[derive(Debug, Clone, Default)]
pub struct Contract {
    coder: AbiCoder,
    constructor: Option<FunctionFragment>,
    functions: Vec<FunctionDef>,
    events: Vec<EventDef>,
}

impl Contract {
    /// Empty contract with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty contract with the given configuration
    pub fn with_config(config: AbiConfig) -> Self {
        Self {
            coder: AbiCoder::with_config(config),
            ..Self::default()
        }
    }

    /// Contract from function, constructor and event signatures
    ///
    /// ```
    /// use tabi_abi::{Contract, Value};
    ///
    /// let erc20 = Contract::from_signatures(&[
    ///     "function balanceOf(address owner) view returns (uint256)",
    ///     "event Transfer(address indexed from, address indexed to, uint256 value)",
    /// ]).unwrap();
    /// let call = erc20
    ///     .encode_call("balanceOf", &[Value::from("0x0000000000000000000000000000000000000001")])
    ///     .unwrap();
    /// assert_eq!(&call[..4], &[0x70, 0xa0, 0x82, 0x31]);
    /// ```
    pub fn from_signatures(signatures: &[&str]) -> Result<Self, AbiError> {
        Self::from_signatures_with_config(signatures, AbiConfig::default())
    }

    /// Same as [`Contract::from_signatures`] with a configuration
    pub fn from_signatures_with_config(
        signatures: &[&str],
        config: AbiConfig,
    ) -> Result<Self, AbiError> {
        let mut contract = Self::with_config(config);
        for signature in signatures {
            contract.add_signature(signature)?;
        }
        Ok(contract)
    }

    /// Parse and add one signature
    pub fn add_signature(&mut self, signature: &str) -> Result<(), AbiError> {
        let fragment = parse_signature(signature)?;
        let canonical = canonical_signature(&fragment)?;

        match fragment {
            Fragment::Function(function) if function.is_constructor() => {
                self.constructor = Some(function);
            }
            Fragment::Function(function) => {
                let selector = id(&canonical).selector();
                debug!(signature = %canonical, selector = %hexlify(&selector), "added function");
                self.functions.push(FunctionDef {
                    signature: canonical,
                    selector,
                    fragment: function,
                });
            }
            Fragment::Event(event) => {
                let topic = id(&canonical);
                debug!(signature = %canonical, %topic, "added event");
                self.events.push(EventDef {
                    signature: canonical,
                    topic,
                    fragment: event,
                });
            }
        }
        Ok(())
    }

    /// Get a function by name
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.iter().find(|f| f.name() == name)
    }

    /// Get a function by selector
    pub fn function_by_selector(&self, selector: &[u8]) -> Option<&FunctionDef> {
        self.functions.iter().find(|f| f.selector[..] == *selector)
    }

    /// All functions, in the order they were added
    pub fn functions(&self) -> &[FunctionDef] {
        &self.functions
    }

    /// Get an event by name
    pub fn event(&self, name: &str) -> Option<&EventDef> {
        self.events.iter().find(|e| e.fragment.name == name)
    }

    /// All events
    pub fn events(&self) -> &[EventDef] {
        &self.events
    }

    /// Constructor, if one was declared
    pub fn constructor(&self) -> Option<&FunctionFragment> {
        self.constructor.as_ref()
    }

    /// Encode constructor arguments (no selector)
    pub fn encode_constructor(&self, args: &[Value]) -> Result<Vec<u8>, AbiError> {
        let inputs = self.constructor.as_ref().map_or(&[][..], |c| &c.inputs[..]);
        self.coder.encode_bytes(inputs, args)
    }

    /// Encode a function call: selector followed by the arguments
    pub fn encode_call(&self, function_name: &str, args: &[Value]) -> Result<Vec<u8>, AbiError> {
        let function = self.function(function_name).ok_or_else(|| unknown_function(function_name))?;

        let mut data = function.selector.to_vec();
        data.extend(self.coder.encode_bytes(function.inputs(), args)?);
        Ok(data)
    }

    /// Decode call data by its selector
    ///
    /// The arguments must be whole words. With `tron_addresses` configured,
    /// top-level addresses are returned as `41` + lower-case hex.
    pub fn decode_call(&self, data: &[u8]) -> Result<DecodedCall, AbiError> {
        if data.len() < SELECTOR_LEN {
            return Err(AbiError::invalid(
                "call data too short",
                ErrorContext::new().value(hexlify(data)),
            ));
        }
        let (selector, args) = data.split_at(SELECTOR_LEN);

        let function = self.function_by_selector(selector).ok_or_else(|| {
            AbiError::invalid(
                "no matching function",
                ErrorContext::new().arg("selector").value(hexlify(selector)),
            )
        })?;

        if args.len() % 32 != 0 {
            return Err(AbiError::invalid(
                "call data length must be a multiple of 32 bytes",
                ErrorContext::new().value(args.len()),
            ));
        }

        let inputs = self.coder.decode(function.inputs(), args)?;
        let types = function
            .inputs()
            .iter()
            .map(format_param_type)
            .collect::<Result<Vec<_>, _>>()?;
        let names = function.inputs().iter().map(|p| p.name.clone()).collect();

        let inputs = if self.coder.config().tron_addresses {
            inputs.map(|index, value| match (types.get(index).map(String::as_str), value) {
                (Some("address"), Value::Address(text)) => Value::String(tron_form(&text)),
                (_, other) => other,
            })
        } else {
            inputs
        };

        Ok(DecodedCall {
            name: function.name().to_string(),
            types,
            names,
            inputs,
        })
    }

    /// Decode a function's return data
    pub fn decode_output(&self, function_name: &str, data: &[u8]) -> Result<Values, AbiError> {
        let function = self.function(function_name).ok_or_else(|| unknown_function(function_name))?;
        self.coder.decode(function.outputs(), data)
    }
}

fn unknown_function(name: &str) -> AbiError {
    AbiError::invalid("unknown function", ErrorContext::new().value(name))
}

/// `41` + lower-case hex of a checksummed address
fn tron_form(text: &str) -> String {
    match Address::from_hex(text) {
        Ok(address) => address.to_tron_hex(),
        Err(_) => text.to_string(),
    }
}
