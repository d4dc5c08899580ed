//! Decode-side value model.
//!
//! A [`Value`] is the tree returned from a successful response decode.
//! Exactly one variant is active; callers either match on it directly
//! or check [`Value::kind`] and use the typed accessor, which returns
//! `None` for every other kind.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// Data types available in the XML-RPC standard, plus the `Invalid`
/// sentinel used only by default-constructed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Invalid,
    Array,
    Base64,
    Bool,
    DateTime,
    Double,
    Int,
    String,
    Struct,
}

/// A decoded XML-RPC value.
///
/// Owns its children exclusively; arrays preserve wire order, struct
/// member order is not meaningful. Successful decoding never produces
/// `Invalid`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Invalid,
    Int(i64),
    Bool(bool),
    String(String),
    Double(f64),
    DateTime(DateTime<Utc>),
    Base64(Vec<u8>),
    Array(Vec<Value>),
    Struct(HashMap<String, Value>),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Invalid => Kind::Invalid,
            Value::Int(_) => Kind::Int,
            Value::Bool(_) => Kind::Bool,
            Value::String(_) => Kind::String,
            Value::Double(_) => Kind::Double,
            Value::DateTime(_) => Kind::DateTime,
            Value::Base64(_) => Kind::Base64,
            Value::Array(_) => Kind::Array,
            Value::Struct(_) => Kind::Struct,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_base64(&self) -> Option<&[u8]> {
        match self {
            Value::Base64(data) => Some(data.as_slice()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Struct(members) => Some(members),
            _ => None,
        }
    }
}
