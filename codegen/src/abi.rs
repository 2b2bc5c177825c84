//! Contract ABI model.
//!
//! An ABI document is parsed once into an immutable tree of events and
//! parameters. Nothing here binds to a live contract; generators walk the
//! tree as plain data.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{CodegenError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abi {
    pub events: Vec<AbiEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiEvent {
    pub name: String,
    pub inputs: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// A `tuple` with its named components.
    Tuple(Vec<Param>),
    /// Any other Solidity type, as written in the ABI (`uint256`, `address[]`,
    /// `tuple[2]`, ...).
    Value(String),
}

/// Raw parameter as it appears in ABI JSON.
#[derive(Debug, Deserialize)]
struct RawParam {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    components: Vec<RawParam>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    name: String,
    #[serde(default)]
    inputs: Vec<RawParam>,
}

impl Abi {
    /// Parse an ABI from JSON text.
    ///
    /// Accepts either a bare ABI array or an artifact object carrying the
    /// array under `abi`. Items other than events are ignored.
    pub fn parse(json: &str) -> std::result::Result<Self, String> {
        let value: Value = serde_json::from_str(json).map_err(|e| e.to_string())?;
        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut obj) => match obj.remove("abi") {
                Some(Value::Array(items)) => items,
                _ => return Err("expected a JSON array or an object with an `abi` array".into()),
            },
            _ => return Err("expected a JSON array or an object with an `abi` array".into()),
        };

        let events = items
            .into_iter()
            .filter(|item| item.get("type").and_then(Value::as_str) == Some("event"))
            .map(|item| {
                serde_json::from_value::<RawEvent>(item)
                    .map(AbiEvent::from)
                    .map_err(|e| format!("invalid event: {}", e))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Abi { events })
    }

    /// Read and parse an ABI file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;
        Abi::parse(&json).map_err(|reason| CodegenError::AbiParse {
            path: path.to_path_buf(),
            reason,
        })
    }
}

impl From<RawEvent> for AbiEvent {
    fn from(raw: RawEvent) -> Self {
        AbiEvent {
            name: raw.name,
            inputs: params(raw.inputs),
        }
    }
}

/// Convert raw parameters, naming unnamed ones `param<index>`.
fn params(raw: Vec<RawParam>) -> Vec<Param> {
    raw.into_iter()
        .enumerate()
        .map(|(index, p)| {
            let name = if p.name.is_empty() {
                format!("param{}", index)
            } else {
                p.name
            };
            let kind = if p.ty == "tuple" {
                ParamKind::Tuple(params(p.components))
            } else {
                ParamKind::Value(canonical_type(&p.ty, &p.components))
            };
            Param { name, kind }
        })
        .collect()
}

/// Expand `tuple` prefixes in array types into their component list so the
/// type can appear in a signature: `tuple[]` -> `(address,uint256)[]`.
fn canonical_type(ty: &str, components: &[RawParam]) -> String {
    match ty.strip_prefix("tuple") {
        Some(suffix) => format!(
            "({}){}",
            components
                .iter()
                .map(|c| canonical_type(&c.ty, &c.components))
                .collect::<Vec<_>>()
                .join(","),
            suffix
        ),
        None => ty.to_string(),
    }
}

impl AbiEvent {
    /// The canonical signature, e.g. `Transfer(address,address,uint256)`.
    pub fn signature(&self) -> String {
        format!(
            "{}({})",
            self.name,
            self.inputs
                .iter()
                .map(Param::signature_type)
                .collect::<Vec<_>>()
                .join(",")
        )
    }
}

impl Param {
    /// The base type tag used for type mapping. Arrays report `array`,
    /// tuples report `tuple`.
    pub fn base_type(&self) -> &str {
        match &self.kind {
            ParamKind::Tuple(_) => "tuple",
            ParamKind::Value(ty) if ty.ends_with(']') => "array",
            ParamKind::Value(ty) => ty.as_str(),
        }
    }

    fn signature_type(&self) -> String {
        match &self.kind {
            ParamKind::Tuple(children) => format!(
                "({})",
                children
                    .iter()
                    .map(Param::signature_type)
                    .collect::<Vec<_>>()
                    .join(",")
            ),
            ParamKind::Value(ty) => ty.clone(),
        }
    }
}

/// The event name in a signature: everything before the first `(`.
pub fn event_base_name(signature: &str) -> &str {
    match signature.find('(') {
        Some(idx) => signature[..idx].trim(),
        None => signature.trim(),
    }
}
