use super::timestamp::{coerce_timestamp, to_canonical};
use super::{Contract, EnumSchema, RecordSchema, Shape, UnionSchema};
use crate::core::errors::DecodeError;
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};
use std::str::FromStr;

/// Coerce a key-normalized value against a field contract.
///
/// Returns the canonical form of the value: decimals as exact strings,
/// timestamps as RFC 3339 UTC strings, enums as their declared spelling and
/// records as maps holding every declared field (missing optionals as null).
/// `field` is the path used in error messages.
pub fn coerce(value: &Value, contract: Contract, field: &str) -> Result<Value, DecodeError> {
    match contract {
        Contract::Required(shape) => {
            if value.is_null() {
                return Err(DecodeError::mismatch(field, contract.to_string(), value));
            }
            coerce_shape(value, shape, field)
        }
        Contract::Optional(shape) => {
            if value.is_null() {
                return Ok(Value::Null);
            }
            coerce_shape(value, shape, field)
        }
        Contract::ListOf(shape) => coerce_list(value, shape, contract, field),
        Contract::OptionalListOf(shape) => {
            if value.is_null() {
                return Ok(Value::Null);
            }
            coerce_list(value, shape, contract, field)
        }
    }
}

fn coerce_list(
    value: &Value,
    shape: Shape,
    contract: Contract,
    field: &str,
) -> Result<Value, DecodeError> {
    let items = value
        .as_array()
        .ok_or_else(|| DecodeError::mismatch(field, contract.to_string(), value))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            coerce(item, Contract::Required(shape), &format!("{}[{}]", field, index))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

/// Coerce a non-null value to a single shape
pub fn coerce_shape(value: &Value, shape: Shape, field: &str) -> Result<Value, DecodeError> {
    match shape {
        Shape::String => coerce_string(value, field),
        Shape::Integer => coerce_integer(value, field).map(|n| Value::Number(Number::from(n))),
        Shape::Boolean => coerce_bool(value, field).map(Value::Bool),
        Shape::Decimal => coerce_decimal(value, field).map(|d| Value::String(d.to_string())),
        Shape::Timestamp => {
            coerce_timestamp(value, field).map(|ts| Value::String(to_canonical(&ts)))
        }
        Shape::Enum(schema) => coerce_enum(value, schema, field).map(|v| Value::String(v.into())),
        Shape::Record(schema) => coerce_record(value, schema, field),
        Shape::Union(schema) => coerce_union(value, schema, field),
    }
}

fn coerce_string(value: &Value, field: &str) -> Result<Value, DecodeError> {
    match value {
        Value::String(_) => Ok(value.clone()),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        _ => Err(DecodeError::mismatch(field, "string", value)),
    }
}

// 2^63 is exact as f64 while i64::MAX is not
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;
const I64_LOWER: f64 = -I64_UPPER;

pub fn coerce_integer(value: &Value, field: &str) -> Result<i64, DecodeError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && (I64_LOWER..I64_UPPER).contains(f))
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| DecodeError::mismatch(field, "integer", value))
}

pub fn coerce_bool(value: &Value, field: &str) -> Result<bool, DecodeError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(DecodeError::mismatch(field, "boolean", value)),
    }
}

/// Exact decimal from a number or numeric string.
///
/// Numbers are parsed from their textual form so `0.0001` stays `0.0001`.
pub fn coerce_decimal(value: &Value, field: &str) -> Result<Decimal, DecodeError> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return Err(DecodeError::mismatch(field, "decimal", value)),
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| DecodeError::mismatch(field, "decimal", value))
}

/// Resolve a string to one of the declared enum spellings.
///
/// An exact match wins; otherwise the value is upper-cased with `-` and
/// spaces mapped to `_` and matched again.
pub fn coerce_enum(
    value: &Value,
    schema: &'static EnumSchema,
    field: &str,
) -> Result<&'static str, DecodeError> {
    let expected = || DecodeError::mismatch(field, format!("enum {}", schema.name), value);
    let raw = value.as_str().ok_or_else(expected)?;

    if let Some(variant) = schema.variants.iter().find(|v| **v == raw) {
        return Ok(*variant);
    }

    let normalized = raw.to_uppercase().replace(['-', ' '], "_");
    schema
        .variants
        .iter()
        .find(|v| **v == normalized)
        .copied()
        .ok_or_else(expected)
}

fn coerce_record(
    value: &Value,
    schema: &'static RecordSchema,
    path: &str,
) -> Result<Value, DecodeError> {
    let map = value
        .as_object()
        .ok_or_else(|| DecodeError::mismatch(path, format!("record {}", schema.name), value))?;

    if let Some(unknown) = map.keys().find(|key| schema.field(key).is_none()) {
        return Err(DecodeError::UnknownField {
            record: schema.name.to_string(),
            field: join(path, unknown),
        });
    }

    let mut canonical = Map::with_capacity(schema.fields.len());
    for (name, contract) in schema.fields {
        let child = map.get(*name).unwrap_or(&Value::Null);
        canonical.insert((*name).to_string(), coerce(child, *contract, &join(path, name))?);
    }
    Ok(Value::Object(canonical))
}

/// First branch whose kind check admits the value is committed to
fn coerce_union(
    value: &Value,
    schema: &'static UnionSchema,
    field: &str,
) -> Result<Value, DecodeError> {
    match schema.branches.iter().find(|branch| branch.admits(value)) {
        Some(branch) => coerce_shape(value, *branch, field),
        None => Err(DecodeError::mismatch(
            field,
            Shape::Union(schema).to_string(),
            value,
        )),
    }
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static SIDE: EnumSchema = EnumSchema {
        name: "OrderSide",
        variants: &["BUY", "SELL"],
    };

    static TIF: EnumSchema = EnumSchema {
        name: "TimeInForce",
        variants: &["GTC", "FOK", "IOC"],
    };

    static PAIR: RecordSchema = RecordSchema {
        name: "Pair",
        fields: &[
            ("symbol", Contract::Required(Shape::String)),
            ("active", Contract::Optional(Shape::Boolean)),
        ],
    };

    static PAIR_OR_SYMBOL: UnionSchema = UnionSchema {
        branches: [Shape::Record(&PAIR), Shape::String],
    };

    #[test]
    fn test_decimal_is_exact() {
        let d = coerce_decimal(&json!("0.0001"), "price").unwrap();
        assert_eq!(d.to_string(), "0.0001");
        let d = coerce_decimal(&json!(0.1), "price").unwrap();
        assert_eq!(d, Decimal::from_str("0.1").unwrap());
        let d = coerce_decimal(&json!(1e-7), "price").unwrap();
        assert_eq!(d, Decimal::from_str("0.0000001").unwrap());
    }

    #[test]
    fn test_decimal_keeps_wire_digits() {
        let raw: Value = serde_json::from_str(r#"{"price": 1234567.123456789012}"#).unwrap();
        let d = coerce_decimal(&raw["price"], "price").unwrap();
        assert_eq!(d, Decimal::from_str("1234567.123456789012").unwrap());
        assert_eq!(d.to_string(), "1234567.123456789012");

        let raw: Value = serde_json::from_str("0.30000000000000000001").unwrap();
        assert_eq!(
            coerce_decimal(&raw, "price").unwrap().to_string(),
            "0.30000000000000000001"
        );
    }

    #[test]
    fn test_decimal_rejects_non_numeric() {
        let err = coerce_decimal(&json!("abc"), "price").unwrap_err();
        assert_eq!(err.field(), Some("price"));
        assert!(coerce_decimal(&json!(true), "price").is_err());
    }

    #[test]
    fn test_integer_accepts_integral_forms() {
        assert_eq!(coerce_integer(&json!(7), "n").unwrap(), 7);
        assert_eq!(coerce_integer(&json!(7.0), "n").unwrap(), 7);
        assert_eq!(coerce_integer(&json!("42"), "n").unwrap(), 42);
        assert!(coerce_integer(&json!(7.5), "n").is_err());
        assert!(coerce_integer(&json!("7.5"), "n").is_err());
    }

    #[test]
    fn test_integer_out_of_range_is_rejected() {
        let two_pow_63: Value = serde_json::from_str("9223372036854775808").unwrap();
        assert!(coerce_integer(&two_pow_63, "n").is_err());
        let float_form: Value = serde_json::from_str("9223372036854775808.0").unwrap();
        assert!(coerce_integer(&float_form, "n").is_err());
        assert!(coerce_integer(&json!("9223372036854775808"), "n").is_err());

        let max: Value = serde_json::from_str("9223372036854775807").unwrap();
        assert_eq!(coerce_integer(&max, "n").unwrap(), i64::MAX);
        let min: Value = serde_json::from_str("-9223372036854775808").unwrap();
        assert_eq!(coerce_integer(&min, "n").unwrap(), i64::MIN);
    }

    #[test]
    fn test_bool_forms() {
        assert!(coerce_bool(&json!(true), "b").unwrap());
        assert!(coerce_bool(&json!("TRUE"), "b").unwrap());
        assert!(!coerce_bool(&json!("false"), "b").unwrap());
        assert!(coerce_bool(&json!(1), "b").is_err());
        assert!(coerce_bool(&json!("yes"), "b").is_err());
    }

    #[test]
    fn test_enum_normalization() {
        assert_eq!(coerce_enum(&json!("BUY"), &SIDE, "side").unwrap(), "BUY");
        assert_eq!(coerce_enum(&json!("buy"), &SIDE, "side").unwrap(), "BUY");
        assert_eq!(coerce_enum(&json!("gtc"), &TIF, "tif").unwrap(), "GTC");
        let err = coerce_enum(&json!("unknown-side"), &SIDE, "side").unwrap_err();
        assert!(matches!(err, DecodeError::Mismatch { ref expected, .. } if expected == "enum OrderSide"));
    }

    #[test]
    fn test_required_and_optional() {
        let required = Contract::Required(Shape::String);
        let optional = Contract::Optional(Shape::String);
        assert!(coerce(&Value::Null, required, "name").is_err());
        assert_eq!(coerce(&Value::Null, optional, "name").unwrap(), Value::Null);
        assert_eq!(coerce(&json!(5), required, "name").unwrap(), json!("5"));
    }

    #[test]
    fn test_list_contracts() {
        let list = Contract::ListOf(Shape::Integer);
        assert_eq!(coerce(&json!(["1", 2]), list, "xs").unwrap(), json!([1, 2]));
        assert!(coerce(&Value::Null, list, "xs").is_err());

        let err = coerce(&json!([1, null]), list, "xs").unwrap_err();
        assert_eq!(err.field(), Some("xs[1]"));

        let optional = Contract::OptionalListOf(Shape::Integer);
        assert_eq!(coerce(&Value::Null, optional, "xs").unwrap(), Value::Null);
    }

    #[test]
    fn test_record_fills_missing_optionals() {
        let canonical = coerce(
            &json!({"symbol": "BTCZAR"}),
            Contract::Required(Shape::Record(&PAIR)),
            "pair",
        )
        .unwrap();
        assert_eq!(canonical, json!({"symbol": "BTCZAR", "active": null}));
    }

    #[test]
    fn test_record_rejects_unknown_field() {
        let err = coerce(
            &json!({"symbol": "BTCZAR", "colour": "red"}),
            Contract::Required(Shape::Record(&PAIR)),
            "pair",
        )
        .unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownField {
                record: "Pair".to_string(),
                field: "pair.colour".to_string(),
            }
        );
    }

    #[test]
    fn test_union_prefers_record() {
        let contract = Contract::Required(Shape::Union(&PAIR_OR_SYMBOL));
        let nested = coerce(&json!({"symbol": "BTCZAR", "active": "true"}), contract, "p").unwrap();
        assert_eq!(nested, json!({"symbol": "BTCZAR", "active": true}));

        let bare = coerce(&json!("BTCZAR"), contract, "p").unwrap();
        assert_eq!(bare, json!("BTCZAR"));

        // a map that fails the record branch does not fall back to the string branch
        let err = coerce(&json!({"symbol": null}), contract, "p").unwrap_err();
        assert_eq!(err.field(), Some("p.symbol"));

        assert!(coerce(&json!([1]), contract, "p").is_err());
    }
}
