//! Relay-style global identifiers: base64 of `TypeName:rawId`.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine;
use thiserror::Error;

const SEPARATOR: char = ':';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded bytes are not UTF-8")]
    Utf8,

    #[error("missing ':' between type name and id")]
    MissingSeparator,

    #[error("empty type name")]
    EmptyTypeName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalId {
    pub type_name: String,
    pub raw_id: String,
}

impl GlobalId {
    pub fn new(type_name: impl Into<String>, raw_id: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            raw_id: raw_id.into(),
        }
    }

    pub fn encode(&self) -> String {
        STANDARD.encode(format!("{}{SEPARATOR}{}", self.type_name, self.raw_id))
    }

    /// Decode an id in either the standard or the URL-safe alphabet, padded
    /// or not. A `+` that arrived as a space through a query string is
    /// restored. The raw id keeps any further `:`.
    pub fn decode(id: &str) -> Result<Self, DecodeError> {
        let normalized: String = id
            .trim()
            .chars()
            .filter(|c| *c != '=')
            .map(|c| match c {
                '-' | ' ' => '+',
                '_' => '/',
                other => other,
            })
            .collect();
        let bytes = STANDARD_NO_PAD.decode(normalized)?;
        let decoded = String::from_utf8(bytes).map_err(|_| DecodeError::Utf8)?;
        let (type_name, raw_id) = decoded
            .split_once(SEPARATOR)
            .ok_or(DecodeError::MissingSeparator)?;
        if type_name.is_empty() {
            return Err(DecodeError::EmptyTypeName);
        }
        Ok(Self::new(type_name, raw_id))
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for GlobalId {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}
