//! Parameter and fragment definitions

use serde::{Deserialize, Serialize};
use tabi_primitives::BigNumber;

use crate::error::AbiError;
use crate::signature::parse_param;

/// A typed, optionally named parameter
///
/// `ty` is canonical (`uint` is stored as `uint256`). `components` is only
/// set for tuple types.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParamType {
    /// Type string such as `uint256[2]` or `tuple`
    #[serde(rename = "type")]
    pub ty: String,
    /// Parameter name, possibly empty
    #[serde(default)]
    pub name: String,
    /// Event parameter stored as a topic
    #[serde(default, skip_serializing_if = "is_false")]
    pub indexed: bool,
    /// Tuple members
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<ParamType>>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ParamType {
    /// Unnamed parameter of the given type
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            ..Self::default()
        }
    }

    /// Named parameter of the given type
    pub fn named(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Tuple parameter
    pub fn tuple(name: impl Into<String>, components: Vec<ParamType>) -> Self {
        Self {
            ty: "tuple".to_string(),
            name: name.into(),
            indexed: false,
            components: Some(components),
        }
    }
}

/// Anything that can stand for a parameter: a type string or a [`ParamType`]
pub trait AsParamType {
    /// Resolve into a parameter definition
    fn to_param_type(&self) -> Result<ParamType, AbiError>;
}

impl AsParamType for str {
    fn to_param_type(&self) -> Result<ParamType, AbiError> {
        parse_param(self, false)
    }
}

impl AsParamType for String {
    fn to_param_type(&self) -> Result<ParamType, AbiError> {
        parse_param(self, false)
    }
}

impl AsParamType for ParamType {
    fn to_param_type(&self) -> Result<ParamType, AbiError> {
        Ok(self.clone())
    }
}

impl<T: AsParamType + ?Sized> AsParamType for &T {
    fn to_param_type(&self) -> Result<ParamType, AbiError> {
        (**self).to_param_type()
    }
}

/// Declared state mutability of a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    /// Reads nothing
    Pure,
    /// Reads state
    View,
    /// Writes state, rejects value
    NonPayable,
    /// Accepts value
    Payable,
}

/// Function or constructor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    /// Named function
    Function,
    /// Constructor: no name, no outputs
    Constructor,
}

/// Parsed event signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFragment {
    /// Event name
    pub name: String,
    /// Declared `anonymous`
    pub anonymous: bool,
    /// Parameters
    pub inputs: Vec<ParamType>,
}

/// Parsed function or constructor signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionFragment {
    /// Function or constructor
    #[serde(rename = "type")]
    pub kind: FunctionKind,
    /// Name; `None` for constructors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Declared `constant`, `view` or `pure`
    pub constant: bool,
    /// Declared `payable`
    pub payable: bool,
    /// Mutability from the modifiers, if any was given
    pub state_mutability: Option<StateMutability>,
    /// Parameters
    pub inputs: Vec<ParamType>,
    /// Return values; `None` for constructors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<ParamType>>,
    /// Gas given after `@`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<BigNumber>,
}

impl FunctionFragment {
    /// Check for a constructor
    pub fn is_constructor(&self) -> bool {
        self.kind == FunctionKind::Constructor
    }

    /// Return values, empty for constructors
    pub fn outputs(&self) -> &[ParamType] {
        self.outputs.as_deref().unwrap_or(&[])
    }
}

/// A parsed signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fragment {
    /// `event ...`
    Event(EventFragment),
    /// Function or constructor
    Function(FunctionFragment),
}

impl Fragment {
    /// Name, `constructor` for constructors
    pub fn name(&self) -> &str {
        match self {
            Fragment::Event(event) => &event.name,
            Fragment::Function(function) => function.name.as_deref().unwrap_or("constructor"),
        }
    }

    /// Parameters
    pub fn inputs(&self) -> &[ParamType] {
        match self {
            Fragment::Event(event) => &event.inputs,
            Fragment::Function(function) => &function.inputs,
        }
    }

    /// `event`, `function` or `constructor`
    pub fn kind_name(&self) -> &'static str {
        match self {
            Fragment::Event(_) => "event",
            Fragment::Function(f) if f.is_constructor() => "constructor",
            Fragment::Function(_) => "function",
        }
    }
}
