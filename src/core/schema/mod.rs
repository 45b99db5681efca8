//! Static record schemas and the decode entry points built on them.
//!
//! Every typed record carries a `RecordSchema`: an enumerable list of
//! `(field_name, Contract)` pairs. Decoding a wire payload runs in three
//! steps:
//!
//! 1. [`casing::normalize_keys`] rewrites every map key to its canonical
//!    snake_case form, recursively.
//! 2. [`coerce::coerce`] walks the normalized tree against the schema and
//!    produces a canonical tree (exact decimal strings, RFC 3339 timestamps,
//!    declared enum spellings), rejecting anything the schema does not allow.
//! 3. `serde` materializes the canonical tree into the Rust struct.

pub mod casing;
pub mod coerce;
pub mod timestamp;

use crate::core::errors::DecodeError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use tracing::error;

pub use coerce::coerce;

/// Shape a single (non-list) value must take
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    String,
    Integer,
    Boolean,
    Decimal,
    Timestamp,
    Enum(&'static EnumSchema),
    Record(&'static RecordSchema),
    Union(&'static UnionSchema),
}

/// Declared contract of one record field
#[derive(Debug, Clone, Copy)]
pub enum Contract {
    Required(Shape),
    Optional(Shape),
    ListOf(Shape),
    OptionalListOf(Shape),
}

#[derive(Debug)]
pub struct RecordSchema {
    pub name: &'static str,
    pub fields: &'static [(&'static str, Contract)],
}

impl RecordSchema {
    pub fn field(&self, name: &str) -> Option<Contract> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, contract)| *contract)
    }
}

/// Closed set of wire spellings for a string enum
#[derive(Debug)]
pub struct EnumSchema {
    pub name: &'static str,
    pub variants: &'static [&'static str],
}

/// Two alternative shapes for the same logical field, tried in order
#[derive(Debug)]
pub struct UnionSchema {
    pub branches: [Shape; 2],
}

impl Shape {
    /// Cheap kind check used to pick a union branch before coercing
    pub fn admits(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string() || value.is_number(),
            Self::Integer | Self::Decimal | Self::Timestamp => {
                value.is_number() || value.is_string()
            }
            Self::Boolean => value.is_boolean() || value.is_string(),
            Self::Enum(_) => value.is_string(),
            Self::Record(_) => value.is_object(),
            Self::Union(union) => union.branches.iter().any(|branch| branch.admits(value)),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "integer"),
            Self::Boolean => write!(f, "boolean"),
            Self::Decimal => write!(f, "decimal"),
            Self::Timestamp => write!(f, "timestamp"),
            Self::Enum(schema) => write!(f, "enum {}", schema.name),
            Self::Record(schema) => write!(f, "record {}", schema.name),
            Self::Union(union) => write!(f, "{} | {}", union.branches[0], union.branches[1]),
        }
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required(shape) => write!(f, "{}", shape),
            Self::Optional(shape) => write!(f, "optional {}", shape),
            Self::ListOf(shape) => write!(f, "list of {}", shape),
            Self::OptionalListOf(shape) => write!(f, "optional list of {}", shape),
        }
    }
}

/// A typed record with a static field contract
pub trait Record: DeserializeOwned {
    fn schema() -> &'static RecordSchema;
}

/// Decode one record from a raw wire payload
pub fn decode_record<T: Record>(raw: &Value) -> Result<T, DecodeError> {
    let schema = T::schema();
    decode_with(raw, Contract::Required(Shape::Record(schema)), schema.name)
}

/// Decode a list of records from a raw wire payload
pub fn decode_list<T: Record>(raw: &Value) -> Result<Vec<T>, DecodeError> {
    let schema = T::schema();
    decode_with(raw, Contract::ListOf(Shape::Record(schema)), schema.name)
}

fn decode_with<T: DeserializeOwned>(
    raw: &Value,
    contract: Contract,
    root: &str,
) -> Result<T, DecodeError> {
    let decoded = casing::normalize_keys(raw)
        .and_then(|normalized| coerce(&normalized, contract, root))
        .and_then(|canonical| {
            serde_json::from_value(canonical).map_err(|e| DecodeError::Materialize {
                record: root.to_string(),
                reason: e.to_string(),
            })
        });
    if let Err(e) = &decoded {
        error!(record = root, payload = %raw, "Failed to decode: {}", e);
    }
    decoded
}
