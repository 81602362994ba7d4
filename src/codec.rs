//! Line-delimited JSON codec
//!
//! One JSON object per `\n`-terminated UTF-8 line. Outbound messages are
//! parameter assignments; inbound messages carry a `score` and, in the first
//! message, a `possible_values` declaration of the search space.
//!
//! A domain object carrying the `normalizedValue` marker is continuous over
//! `[0, 1]`; a JSON list is a categorical domain whose entries are sent back
//! as strings.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::params::{ParameterAssignment, ParameterDomain, ParameterSpace, ParameterValue};

/// Key marking a continuous `[0, 1]` domain
pub const NORMALIZED_MARKER: &str = "normalizedValue";

/// Codec errors
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Empty line")]
    Empty,

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Expected a JSON object, got {0}")]
    NotAnObject(String),

    #[error("Invalid domain for {0}: {1}")]
    InvalidDomain(String, String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Accumulates raw bytes and yields complete lines
///
/// Bytes after the last newline stay buffered until the rest of the line arrives.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append freshly read bytes
    pub fn push(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    /// Pop the next complete line without its terminator (`\n` or `\r\n`)
    pub fn next_line(&mut self) -> Option<String> {
        let pos = self.pending.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    /// Drain an unterminated trailing line, if any bytes are left
    pub fn take_rest(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest: Vec<u8> = self.pending.drain(..).collect();
        Some(String::from_utf8_lossy(&rest).into_owned())
    }

    /// Bytes of an unterminated trailing line
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Decoded inbound message
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    /// Score of the most recent evaluation, if present
    pub score: Option<f64>,
    /// Declared search space (first message only)
    pub possible_values: Option<ParameterSpace>,
}

impl InboundMessage {
    /// Interpret a decoded JSON object
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let score = score_of(map);
        let possible_values = map.get("possible_values").map(parse_possible_values).transpose()?;
        Ok(Self { score, possible_values })
    }
}

/// Numeric `score` field of a message, accepting numeric strings
pub fn score_of(map: &Map<String, Value>) -> Option<f64> {
    map.get("score").and_then(score_from_value)
}

fn score_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Serialize an assignment as one JSON line, newline included
pub fn encode_assignment(assignment: &ParameterAssignment) -> Result<String> {
    let map: Map<String, Value> = assignment
        .iter()
        .map(|(name, value)| -> Result<(String, Value)> {
            let json = match value {
                ParameterValue::Categorical(s) => Value::String(s.clone()),
                ParameterValue::Float(v) => serde_json::Number::from_f64(*v)
                    .map(Value::Number)
                    .ok_or_else(|| CodecError::InvalidValue(name.clone(), v.to_string()))?,
            };
            Ok((name.clone(), json))
        })
        .collect::<Result<_>>()?;
    let mut line = serde_json::to_string(&Value::Object(map))?;
    line.push('\n');
    Ok(line)
}

/// Parse one line into a JSON object
pub fn decode_line(line: &str) -> Result<Map<String, Value>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(CodecError::Empty);
    }
    match serde_json::from_str::<Value>(trimmed)? {
        Value::Object(map) => Ok(map),
        other => Err(CodecError::NotAnObject(kind_of(&other).to_string())),
    }
}

/// Parse a line into an assignment typed by `space`
///
/// Categorical values come back as strings (numbers are stringified,
/// booleans become `True`/`False`); continuous values must be numeric.
pub fn decode_assignment(line: &str, space: &ParameterSpace) -> Result<ParameterAssignment> {
    let map = decode_line(line)?;
    let mut assignment = ParameterAssignment::new();
    for (name, value) in &map {
        let typed = match space.get(name) {
            Some(ParameterDomain::Continuous { .. }) => match value {
                Value::Number(n) => n.as_f64().map(ParameterValue::Float),
                Value::String(s) => s.parse::<f64>().ok().map(ParameterValue::Float),
                _ => None,
            },
            Some(ParameterDomain::Categorical { .. }) | None => {
                scalar_to_string(value).map(ParameterValue::Categorical)
            }
        };
        let typed = typed.ok_or_else(|| CodecError::InvalidValue(name.clone(), value.to_string()))?;
        assignment.insert(name.clone(), typed);
    }
    Ok(assignment)
}

/// Build a parameter space from a `possible_values` declaration
pub fn parse_possible_values(value: &Value) -> Result<ParameterSpace> {
    let Value::Object(decl) = value else {
        return Err(CodecError::NotAnObject(kind_of(value).to_string()));
    };

    let mut space = ParameterSpace::new();
    for (name, raw) in decl {
        let domain = match raw {
            Value::Object(obj) if obj.contains_key(NORMALIZED_MARKER) => {
                ParameterDomain::unit_interval()
            }
            Value::Array(items) => {
                let choices = items
                    .iter()
                    .map(|item| {
                        scalar_to_string(item)
                            .ok_or_else(|| CodecError::InvalidDomain(name.clone(), item.to_string()))
                    })
                    .collect::<Result<Vec<_>>>()?;
                ParameterDomain::Categorical { choices }
            }
            other => return Err(CodecError::InvalidDomain(name.clone(), other.to_string())),
        };
        space
            .add(name, domain)
            .map_err(|e| CodecError::InvalidDomain(name.clone(), e.to_string()))?;
    }
    Ok(space)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("True".to_string()),
        Value::Bool(false) => Some("False".to_string()),
        _ => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
