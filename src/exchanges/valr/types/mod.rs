//! Typed VALR records.
//!
//! Each record is a plain serde struct paired with a static `RecordSchema`
//! listing the same fields and their contracts. The schema drives coercion;
//! serde only ever sees the canonical tree the coercion engine produced.

/// Ties a record type to its static schema
macro_rules! record {
    ($ty:ty => $schema:ident) => {
        impl crate::core::schema::Record for $ty {
            fn schema() -> &'static crate::core::schema::RecordSchema {
                &$schema
            }
        }
    };
}

pub mod account;
pub mod market;
pub mod rest;

pub use account::*;
pub use market::*;
pub use rest::*;
