//! YAML parsing and relaxed mapping of fetched documents

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

use crate::versions::error::DocumentError;

/// Parse raw bytes into a generic YAML value
///
/// A document with no content (or only `~`) is rejected, since no record can
/// be built from it.
pub fn parse(bytes: &[u8]) -> Result<Value, DocumentError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(DocumentError::Empty);
    }

    match serde_yaml::from_slice::<Value>(bytes)? {
        Value::Null => Err(DocumentError::Empty),
        value => Ok(value),
    }
}

/// Convert a generic value into `T`
///
/// Records opt into relaxed mapping with `#[serde(default)]`; unknown fields
/// are ignored by serde unless a record denies them.
pub fn map<T: DeserializeOwned>(value: Value) -> Result<T, DocumentError> {
    Ok(serde_yaml::from_value(value)?)
}

pub fn parse_document<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DocumentError> {
    map(parse(bytes)?)
}

/// Accept any YAML scalar where a string is expected
///
/// Unquoted versions such as `2` or `1.5` are read by YAML as numbers. A
/// float loses trailing zeros (`1.50` reads back as `1.5`).
pub(crate) fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "expected a scalar, found {:?}",
            other
        ))),
    }
}

/// Optional counterpart of [`scalar_string`]; `~` maps to `None`
pub(crate) fn scalar_string_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(D::Error::custom(format!(
            "expected a scalar, found {:?}",
            other
        ))),
    }
}
