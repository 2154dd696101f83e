//! Attribute value representation
//!
//! The quirk family only traffics in a handful of scalar shapes, so values
//! are a closed enum rather than a type-erased box. Numeric accessors widen
//! to the largest shape so transforms can operate uniformly.

use serde::{Deserialize, Serialize};

/// A single attribute or command-argument value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    I32(i32),
    /// 8-bit enumeration (mode selectors, zone states)
    Enum8(u8),
}

impl AttributeValue {
    /// Widen to u64 where the value is non-negative
    ///
    /// Returns `None` for negative `I32` values.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            AttributeValue::Bool(b) => Some(u64::from(b)),
            AttributeValue::U8(v) | AttributeValue::Enum8(v) => Some(u64::from(v)),
            AttributeValue::U16(v) => Some(u64::from(v)),
            AttributeValue::U32(v) => Some(u64::from(v)),
            AttributeValue::I32(v) => u64::try_from(v).ok(),
        }
    }

    /// Interpret the value as a boolean (0 = false, anything else = true)
    pub fn as_bool(&self) -> bool {
        match *self {
            AttributeValue::Bool(b) => b,
            AttributeValue::U8(v) | AttributeValue::Enum8(v) => v != 0,
            AttributeValue::U16(v) => v != 0,
            AttributeValue::U32(v) => v != 0,
            AttributeValue::I32(v) => v != 0,
        }
    }

    /// Rebuild a value of the same shape from a widened u64, saturating
    ///
    /// Used by numeric transforms that must preserve the wire shape of the
    /// attribute they rewrite.
    pub fn with_u64(&self, raw: u64) -> AttributeValue {
        match *self {
            AttributeValue::Bool(_) => AttributeValue::Bool(raw != 0),
            AttributeValue::U8(_) => AttributeValue::U8(u8::try_from(raw).unwrap_or(u8::MAX)),
            AttributeValue::Enum8(_) => {
                AttributeValue::Enum8(u8::try_from(raw).unwrap_or(u8::MAX))
            }
            AttributeValue::U16(_) => AttributeValue::U16(u16::try_from(raw).unwrap_or(u16::MAX)),
            AttributeValue::U32(_) => AttributeValue::U32(u32::try_from(raw).unwrap_or(u32::MAX)),
            AttributeValue::I32(_) => AttributeValue::I32(i32::try_from(raw).unwrap_or(i32::MAX)),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

impl From<u8> for AttributeValue {
    fn from(v: u8) -> Self {
        AttributeValue::U8(v)
    }
}

impl From<u16> for AttributeValue {
    fn from(v: u16) -> Self {
        AttributeValue::U16(v)
    }
}

impl From<u32> for AttributeValue {
    fn from(v: u32) -> Self {
        AttributeValue::U32(v)
    }
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        AttributeValue::I32(v)
    }
}
