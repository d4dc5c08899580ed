//! Encode-side argument model.
//!
//! [`Param`] is the closed set of native shapes a call argument may
//! take. The caller builds the tree up front (usually through the
//! `From` impls below); shapes outside this set simply cannot be
//! constructed. The two rejections that survive as runtime checks —
//! nil arguments and maps with non-string keys — are reported during
//! conversion, before anything touches the network.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

/// One call argument, built by the caller and consumed by the encoder.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// Absent value; always rejected by the encoder.
    Nil,
    Int(i64),
    Bool(bool),
    String(String),
    Double(f64),
    DateTime(DateTime<Utc>),
    Bytes(Vec<u8>),
    /// Homogeneity is not enforced; any mix of params is encodable.
    Seq(Vec<Param>),
    /// Ordered key/value pairs. Keys must convert to strings; the
    /// encoder rejects everything else.
    Map(Vec<(Param, Param)>),
}

impl Param {
    /// Variant name used in conversion error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Param::Nil => "nil",
            Param::Int(_) => "int",
            Param::Bool(_) => "bool",
            Param::String(_) => "string",
            Param::Double(_) => "double",
            Param::DateTime(_) => "datetime",
            Param::Bytes(_) => "bytes",
            Param::Seq(_) => "sequence",
            Param::Map(_) => "map",
        }
    }

    /// Builds a `Param` from a dynamic JSON value.
    ///
    /// Null maps to [`Param::Nil`] (and will be rejected at encode
    /// time), numbers map to `Int` when i64-representable and `Double`
    /// otherwise, arrays and objects recurse.
    pub fn from_json(value: &serde_json::Value) -> Param {
        match value {
            serde_json::Value::Null => Param::Nil,
            serde_json::Value::Bool(b) => Param::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Param::Int(i),
                None => Param::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Param::String(s.clone()),
            serde_json::Value::Array(items) => {
                Param::Seq(items.iter().map(Param::from_json).collect())
            }
            serde_json::Value::Object(members) => Param::Map(
                members
                    .iter()
                    .map(|(k, v)| (Param::String(k.clone()), Param::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Param {
    fn from(b: bool) -> Param {
        Param::Bool(b)
    }
}

macro_rules! param_from_int {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Param {
            fn from(n: $ty) -> Param {
                Param::Int(i64::from(n))
            }
        })*
    };
}

param_from_int!(i8, i16, i32, i64, u16, u32);

impl From<f32> for Param {
    fn from(f: f32) -> Param {
        Param::Double(f64::from(f))
    }
}

impl From<f64> for Param {
    fn from(f: f64) -> Param {
        Param::Double(f)
    }
}

impl From<&str> for Param {
    fn from(s: &str) -> Param {
        Param::String(s.to_owned())
    }
}

impl From<String> for Param {
    fn from(s: String) -> Param {
        Param::String(s)
    }
}

impl From<DateTime<Utc>> for Param {
    fn from(dt: DateTime<Utc>) -> Param {
        Param::DateTime(dt)
    }
}

impl From<Vec<u8>> for Param {
    fn from(data: Vec<u8>) -> Param {
        Param::Bytes(data)
    }
}

impl From<&[u8]> for Param {
    fn from(data: &[u8]) -> Param {
        Param::Bytes(data.to_vec())
    }
}

impl From<Vec<Param>> for Param {
    fn from(items: Vec<Param>) -> Param {
        Param::Seq(items)
    }
}

impl From<HashMap<String, Param>> for Param {
    fn from(map: HashMap<String, Param>) -> Param {
        Param::Map(
            map.into_iter()
                .map(|(k, v)| (Param::String(k), v))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, Param>> for Param {
    fn from(map: BTreeMap<String, Param>) -> Param {
        Param::Map(
            map.into_iter()
                .map(|(k, v)| (Param::String(k), v))
                .collect(),
        )
    }
}
