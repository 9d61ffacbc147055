//! Human-readable signature grammar
//!
//! Type strings are scanned one character at a time. Each open parenthesis
//! level is a node in an arena; nodes refer to their parent by index and
//! carry their scan flags while open.

use tabi_primitives::BigNumber;
use tracing::info;

use crate::codec::Coder;
use crate::error::AbiError;
use crate::types::{
    EventFragment, Fragment, FunctionFragment, FunctionKind, ParamType, StateMutability,
};

/// What the scanner may accept next for the open node
#[derive(Debug, Clone, Copy, Default)]
struct ScanFlags {
    allow_type: bool,
    allow_name: bool,
    allow_params: bool,
    allow_array: bool,
    read_array: bool,
}

#[derive(Debug)]
enum NodeState {
    Open(ScanFlags),
    Closed,
}

#[derive(Debug)]
struct Node {
    ty: String,
    name: String,
    indexed: bool,
    components: Option<Vec<usize>>,
    parent: Option<usize>,
    state: NodeState,
}

impl Node {
    fn new(parent: Option<usize>) -> Self {
        Self {
            ty: String::new(),
            name: String::new(),
            indexed: false,
            components: None,
            parent,
            state: NodeState::Open(ScanFlags {
                allow_type: true,
                ..ScanFlags::default()
            }),
        }
    }

    fn take_indexed_keyword(&mut self, allow_indexed: bool) {
        if allow_indexed && self.name == "indexed" {
            self.indexed = true;
            self.name.clear();
        }
    }

    fn close(&mut self, allow_indexed: bool) {
        self.take_indexed_keyword(allow_indexed);
        self.ty = canonical_integer(&self.ty);
        self.state = NodeState::Closed;
    }
}

fn syntax_error(text: &str, position: usize) -> AbiError {
    AbiError::Syntax {
        character: text.chars().nth(position).unwrap_or(' '),
        position,
        text: text.to_string(),
    }
}

fn open_flags<'n>(
    state: &'n mut NodeState,
    text: &str,
    position: usize,
) -> Result<&'n mut ScanFlags, AbiError> {
    match state {
        NodeState::Open(flags) => Ok(flags),
        NodeState::Closed => Err(syntax_error(text, position)),
    }
}

/// `uint`/`int` not followed by a digit 1-9 gets the implicit `256`
fn canonical_integer(ty: &str) -> String {
    for prefix in ["uint", "int"] {
        if let Some(rest) = ty.strip_prefix(prefix) {
            let sized = rest.starts_with(|c: char| ('1'..='9').contains(&c));
            if !sized {
                return format!("{}256{}", prefix, rest);
            }
        }
    }
    ty.to_string()
}

/// Parse one parameter such as `uint256[] amounts` or `tuple(address a, bool b) t`
///
/// With `allow_indexed`, a name of `indexed` sets the `indexed` flag instead.
pub(crate) fn parse_param(text: &str, allow_indexed: bool) -> Result<ParamType, AbiError> {
    let mut nodes = vec![Node::new(None)];
    let mut current = 0;

    for (position, c) in text.chars().enumerate() {
        let c = if c.is_whitespace() { ' ' } else { c };

        match c {
            '(' => {
                let node = &mut nodes[current];
                let flags = open_flags(&mut node.state, text, position)?;
                if !flags.allow_params {
                    return Err(syntax_error(text, position));
                }
                flags.allow_type = false;
                node.ty = canonical_integer(&node.ty);

                let child = nodes.len();
                nodes[current].components = Some(vec![child]);
                nodes.push(Node::new(Some(current)));
                current = child;
            }

            ')' => {
                let node = &mut nodes[current];
                node.close(allow_indexed);
                current = node.parent.ok_or_else(|| syntax_error(text, position))?;

                let flags = open_flags(&mut nodes[current].state, text, position)?;
                flags.allow_params = false;
                flags.allow_name = true;
                flags.allow_array = true;
            }

            ',' => {
                let node = &mut nodes[current];
                let parent = node.parent.ok_or_else(|| syntax_error(text, position))?;
                node.close(allow_indexed);

                let sibling = nodes.len();
                nodes.push(Node::new(Some(parent)));
                nodes[parent]
                    .components
                    .get_or_insert_with(Vec::new)
                    .push(sibling);
                current = sibling;
            }

            ' ' => {
                let node = &mut nodes[current];
                let flags = open_flags(&mut node.state, text, position)?;

                if flags.allow_type && !node.ty.is_empty() {
                    node.ty = canonical_integer(&node.ty);
                    flags.allow_type = false;
                    flags.allow_name = true;
                    flags.allow_params = true;
                }

                if flags.allow_name && !node.name.is_empty() {
                    if allow_indexed && node.name == "indexed" {
                        node.indexed = true;
                        node.name.clear();
                    } else {
                        flags.allow_name = false;
                    }
                }
            }

            '[' => {
                let node = &mut nodes[current];
                let flags = open_flags(&mut node.state, text, position)?;
                if !flags.allow_array {
                    return Err(syntax_error(text, position));
                }
                node.ty.push(c);
                flags.allow_array = false;
                flags.allow_name = false;
                flags.read_array = true;
            }

            ']' => {
                let node = &mut nodes[current];
                let flags = open_flags(&mut node.state, text, position)?;
                if !flags.read_array {
                    return Err(syntax_error(text, position));
                }
                node.ty.push(c);
                flags.read_array = false;
                flags.allow_array = true;
                flags.allow_name = true;
            }

            _ => {
                let node = &mut nodes[current];
                let flags = open_flags(&mut node.state, text, position)?;
                if flags.allow_type {
                    node.ty.push(c);
                    flags.allow_params = true;
                    flags.allow_array = true;
                } else if flags.allow_name {
                    node.name.push(c);
                    flags.allow_array = false;
                } else if flags.read_array {
                    node.ty.push(c);
                } else {
                    return Err(syntax_error(text, position));
                }
            }
        }
    }

    if nodes[current].parent.is_some() {
        return Err(AbiError::InvalidSignature("unexpected eof".to_string()));
    }
    nodes[current].close(allow_indexed);

    Ok(build_param(&nodes, current))
}

fn build_param(nodes: &[Node], id: usize) -> ParamType {
    let node = &nodes[id];
    ParamType {
        ty: node.ty.clone(),
        name: node.name.clone(),
        indexed: node.indexed,
        components: node
            .components
            .as_ref()
            .map(|children| children.iter().map(|&child| build_param(nodes, child)).collect()),
    }
}

/// Split a parameter list on the commas outside any parentheses
pub fn split_nesting(value: &str) -> Result<Vec<String>, AbiError> {
    let mut result = Vec::new();
    let mut accum = String::new();
    let mut depth = 0usize;

    for c in value.trim().chars() {
        if c == ',' && depth == 0 {
            result.push(std::mem::take(&mut accum));
            continue;
        }
        accum.push(c);
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    AbiError::InvalidSignature("unbalanced parenthesis".to_string())
                })?;
            }
            _ => {}
        }
    }

    if !accum.is_empty() {
        result.push(accum);
    }
    Ok(result)
}

/// `prefix(inner)suffix` around the outermost parentheses, with no parentheses
/// in the prefix or suffix
fn split_paren(text: &str) -> Option<(&str, &str, &str)> {
    let is_paren = |c: char| c == '(' || c == ')';
    let open = text.find(is_paren)?;
    let close = text.rfind(is_paren)?;
    if !text[open..].starts_with('(') || !text[close..].starts_with(')') || close < open {
        return None;
    }
    Some((&text[..open], &text[open + 1..close], &text[close + 1..]))
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn parse_params(list: &str, allow_indexed: bool) -> Result<Vec<ParamType>, AbiError> {
    split_nesting(list)?
        .iter()
        .map(|param| parse_param(param, allow_indexed))
        .collect()
}

/// Parse one parameter type, accepting the `indexed` keyword
pub fn parse_param_type(text: &str) -> Result<ParamType, AbiError> {
    parse_param(text, true)
}

/// Canonical type string of a parameter; tuples print as `tuple(...)`
pub fn format_param_type(param: &ParamType) -> Result<String, AbiError> {
    Ok(Coder::from_param(param)?.type_name())
}

/// `name(type1,type2,...)`
pub fn format_signature(fragment: &Fragment) -> Result<String, AbiError> {
    let types = fragment
        .inputs()
        .iter()
        .map(format_param_type)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("{}({})", fragment.name(), types.join(",")))
}

/// Signature hashed for selectors and topics; tuples print as `(...)`
pub fn canonical_signature(fragment: &Fragment) -> Result<String, AbiError> {
    let types = fragment
        .inputs()
        .iter()
        .map(|param| Coder::from_param(param).map(|coder| coder.canonical_type()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("{}({})", fragment.name(), types.join(",")))
}

/// Parse a function, constructor or event signature
///
/// ```
/// use tabi_abi::{parse_signature, Fragment};
///
/// let fragment = parse_signature("function balanceOf(address owner) view returns (uint)").unwrap();
/// let Fragment::Function(function) = fragment else { panic!() };
/// assert!(function.constant);
/// assert_eq!(function.outputs()[0].ty, "uint256");
/// ```
pub fn parse_signature(text: &str) -> Result<Fragment, AbiError> {
    let normalized = normalize_signature(text);

    if let Some(rest) = normalized.strip_prefix("event ") {
        return parse_event(rest.trim()).map(Fragment::Event);
    }

    let body = normalized.strip_prefix("function ").unwrap_or(&normalized);
    parse_function(body.trim()).map(Fragment::Function)
}

/// Single spaces everywhere, a space before each `(` and after each `)`
fn normalize_signature(text: &str) -> String {
    let mut spaced = String::with_capacity(text.len() * 2);
    for c in text.chars() {
        match c {
            '(' => spaced.push_str(" ("),
            ')' => spaced.push_str(") "),
            c if c.is_whitespace() => spaced.push(' '),
            c => spaced.push(c),
        }
    }
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_event(fragment: &str) -> Result<EventFragment, AbiError> {
    let (name, params, modifiers) = split_paren(fragment)
        .ok_or_else(|| AbiError::InvalidSignature(format!("invalid event: {}", fragment)))?;

    let name = name.trim().to_string();
    let inputs = parse_params(params, true)?;

    let mut anonymous = false;
    for modifier in modifiers.split(' ') {
        match modifier {
            "anonymous" => anonymous = true,
            "" => {}
            other => info!(modifier = other, "unknown modifier"),
        }
    }

    if !name.is_empty() && !is_identifier(&name) {
        return Err(AbiError::InvalidSignature(format!(
            "invalid identifier: \"{}\"",
            name
        )));
    }

    Ok(EventFragment {
        name,
        anonymous,
        inputs,
    })
}

fn parse_function(fragment: &str) -> Result<FunctionFragment, AbiError> {
    let invalid = || AbiError::InvalidSignature("invalid signature".to_string());
    let invalid_gas = || AbiError::InvalidSignature("invalid signature gas".to_string());

    let mut pieces = fragment.split('@');
    let body = pieces.next().unwrap_or_default();
    let gas = match pieces.next() {
        Some(_) if pieces.next().is_some() => return Err(invalid()),
        Some(digits) => {
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid_gas());
            }
            Some(BigNumber::parse(digits).map_err(|_| invalid_gas())?)
        }
        None => None,
    };

    let sections: Vec<&str> = body.split(" returns ").collect();
    if sections.len() > 2 {
        return Err(invalid());
    }

    let (raw_name, params, modifiers) = split_paren(sections[0]).ok_or_else(invalid)?;
    let name = raw_name.trim();
    if !is_identifier(name) {
        return Err(AbiError::InvalidSignature(format!(
            "invalid identifier: \"{}\"",
            raw_name
        )));
    }

    let inputs = parse_params(params, false)?;

    let mut constant = false;
    let mut payable = false;
    let mut state_mutability = None;
    for modifier in modifiers.split(' ') {
        match modifier {
            "constant" => constant = true,
            "payable" => {
                payable = true;
                state_mutability = Some(StateMutability::Payable);
            }
            "pure" => {
                constant = true;
                state_mutability = Some(StateMutability::Pure);
            }
            "view" => {
                constant = true;
                state_mutability = Some(StateMutability::View);
            }
            "external" | "public" | "" => {}
            other => info!(modifier = other, "unknown modifier"),
        }
    }

    let outputs = match sections.get(1) {
        Some(right) => {
            let unexpected = || AbiError::InvalidSignature("unexpected tokens".to_string());
            let (prefix, params, suffix) = split_paren(right).ok_or_else(unexpected)?;
            if !prefix.trim().is_empty() || !suffix.trim().is_empty() {
                return Err(unexpected());
            }
            parse_params(params, false)?
        }
        None => Vec::new(),
    };

    if name == "constructor" {
        if !outputs.is_empty() {
            return Err(AbiError::InvalidSignature(
                "constructor may not have outputs".to_string(),
            ));
        }
        return Ok(FunctionFragment {
            kind: FunctionKind::Constructor,
            name: None,
            constant,
            payable,
            state_mutability,
            inputs,
            outputs: None,
            gas,
        });
    }

    Ok(FunctionFragment {
        kind: FunctionKind::Function,
        name: Some(name.to_string()),
        constant,
        payable,
        state_mutability,
        inputs,
        outputs: Some(outputs),
        gas,
    })
}
