// Author: Dustin Pilgrim
// License: MIT

//! Coercion between the primitive kinds.
//!
//! | from \ to | boolean     | integer        | float    | string           |
//! |-----------|-------------|----------------|----------|------------------|
//! | boolean   | itself      | 0 / 1          | 0 / 1    | `True` / `False` |
//! | integer   | non-zero    | itself         | widened  | decimal          |
//! | float     | non-zero    | truncated      | itself   | shortest decimal |
//! | string    | non-empty   | parsed         | parsed   | itself           |
//! | null      | `false`     | error          | error    | `Null`           |
//!
//! Sections never convert.

use crate::value::{Value, ValueKind, ValueType};
use crate::config::Section;
use crate::ForgeError;

fn conversion_error(kind: &ValueKind, target: ValueType, detail: Option<String>) -> ForgeError {
    ForgeError::Conversion {
        found: kind.value_type(),
        target,
        detail,
    }
}

pub fn as_boolean(kind: &ValueKind) -> Result<bool, ForgeError> {
    match kind {
        ValueKind::Boolean(b) => Ok(*b),
        ValueKind::Integer(n) => Ok(*n != 0),
        ValueKind::Float(n) => Ok(*n != 0.0),
        ValueKind::String(s) => Ok(!s.is_empty()),
        ValueKind::Null => Ok(false),
        ValueKind::Section(_) => Err(conversion_error(kind, ValueType::Boolean, None)),
    }
}

pub fn as_integer(kind: &ValueKind) -> Result<i64, ForgeError> {
    match kind {
        ValueKind::Boolean(b) => Ok(i64::from(*b)),
        ValueKind::Integer(n) => Ok(*n),
        // `as` truncates toward zero and saturates at the i64 bounds
        ValueKind::Float(n) => Ok(n.trunc() as i64),
        ValueKind::String(s) => s.trim().parse::<i64>().map_err(|e| {
            conversion_error(kind, ValueType::Integer, Some(format!("'{}': {}", s, e)))
        }),
        ValueKind::Null | ValueKind::Section(_) => {
            Err(conversion_error(kind, ValueType::Integer, None))
        }
    }
}

pub fn as_float(kind: &ValueKind) -> Result<f64, ForgeError> {
    match kind {
        ValueKind::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
        ValueKind::Integer(n) => Ok(*n as f64),
        ValueKind::Float(n) => Ok(*n),
        ValueKind::String(s) => s.trim().parse::<f64>().map_err(|e| {
            conversion_error(kind, ValueType::Float, Some(format!("'{}': {}", s, e)))
        }),
        ValueKind::Null | ValueKind::Section(_) => {
            Err(conversion_error(kind, ValueType::Float, None))
        }
    }
}

pub fn as_string(kind: &ValueKind) -> Result<String, ForgeError> {
    match kind {
        ValueKind::Boolean(true) => Ok("True".to_string()),
        ValueKind::Boolean(false) => Ok("False".to_string()),
        ValueKind::Integer(n) => Ok(n.to_string()),
        ValueKind::Float(n) => Ok(n.to_string()),
        ValueKind::String(s) => Ok(s.clone()),
        ValueKind::Null => Ok("Null".to_string()),
        ValueKind::Section(_) => Err(conversion_error(kind, ValueType::String, None)),
    }
}

impl TryFrom<Value> for bool {
    type Error = ForgeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.as_boolean()
    }
}

impl TryFrom<Value> for i64 {
    type Error = ForgeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.as_integer()
    }
}

impl TryFrom<Value> for f64 {
    type Error = ForgeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.as_float()
    }
}

impl TryFrom<Value> for String {
    type Error = ForgeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.as_string()
    }
}

impl TryFrom<Value> for Section {
    type Error = ForgeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.as_section().ok_or_else(|| ForgeError::Conversion {
            found: value.value_type(),
            target: ValueType::Section,
            detail: None,
        })
    }
}

fn integer_in_range<T: TryFrom<i64>>(value: Value, type_name: &str) -> Result<T, ForgeError> {
    let n = value.as_integer()?;
    T::try_from(n).map_err(|_| ForgeError::Conversion {
        found: value.value_type(),
        target: ValueType::Integer,
        detail: Some(format!("{} out of range for {}", n, type_name)),
    })
}

impl TryFrom<Value> for i32 {
    type Error = ForgeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        integer_in_range(value, "i32")
    }
}

impl TryFrom<Value> for u16 {
    type Error = ForgeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        integer_in_range(value, "u16")
    }
}

impl TryFrom<Value> for u32 {
    type Error = ForgeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        integer_in_range(value, "u32")
    }
}

impl TryFrom<Value> for u64 {
    type Error = ForgeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        integer_in_range(value, "u64")
    }
}

impl TryFrom<Value> for usize {
    type Error = ForgeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        integer_in_range(value, "usize")
    }
}

impl<T> TryFrom<Value> for Option<T>
where
    T: TryFrom<Value, Error = ForgeError>,
{
    type Error = ForgeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if value.is_null() {
            Ok(None)
        } else {
            Ok(Some(T::try_from(value)?))
        }
    }
}
