//! Argument conversion and request serialization.
//!
//! Conversion turns each [`Param`] into a [`WireValue`], rejecting
//! shapes the wire cannot carry; serialization then writes the
//! `methodCall` document in one pass. The first conversion failure
//! aborts the whole request.

use std::collections::HashSet;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use quick_xml::escape::escape;

use crate::constants::*;
use crate::error::EncodeError;
use crate::param::Param;

/// Encode-side value tree, produced only by [`to_wire`] and consumed
/// synchronously by the serializer. Struct member names are unique and
/// keep insertion order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum WireValue {
    Int(i64),
    Bool(bool),
    String(String),
    Double(f64),
    DateTime(DateTime<Utc>),
    Base64(Vec<u8>),
    Array(Vec<WireValue>),
    Struct(Vec<(String, WireValue)>),
}

/// Converts one argument, recursing into sequences and maps.
///
/// An empty sequence is accepted here even though a conformant peer's
/// decoder may reject the resulting payload; only decoding enforces
/// non-emptiness.
pub(crate) fn to_wire(param: &Param) -> Result<WireValue, EncodeError> {
    match param {
        Param::Nil => Err(EncodeError::InvalidArgumentType(param.type_name())),
        Param::Int(n) => Ok(WireValue::Int(*n)),
        Param::Bool(b) => Ok(WireValue::Bool(*b)),
        Param::String(s) => Ok(WireValue::String(s.clone())),
        Param::Double(f) => Ok(WireValue::Double(*f)),
        Param::DateTime(dt) => Ok(WireValue::DateTime(*dt)),
        Param::Bytes(data) => Ok(WireValue::Base64(data.clone())),
        Param::Seq(items) => {
            let mut converted = Vec::with_capacity(items.len());
            for item in items {
                converted.push(to_wire(item)?);
            }
            Ok(WireValue::Array(converted))
        }
        Param::Map(pairs) => {
            let mut members = Vec::with_capacity(pairs.len());
            let mut seen = HashSet::new();
            for (key, val) in pairs {
                let name = match key {
                    Param::String(name) => name,
                    other => return Err(EncodeError::InvalidArgumentType(other.type_name())),
                };
                if !seen.insert(name.as_str()) {
                    return Err(EncodeError::DuplicateStructKey(name.clone()));
                }
                members.push((name.clone(), to_wire(val)?));
            }
            Ok(WireValue::Struct(members))
        }
    }
}

/// Encodes a method call into a complete XML-RPC request document.
pub fn encode_request(method: &str, args: &[Param]) -> Result<Vec<u8>, EncodeError> {
    let mut wires = Vec::with_capacity(args.len());
    for (index, arg) in args.iter().enumerate() {
        let wire = to_wire(arg).map_err(|source| EncodeError::ArgumentConversionFailed {
            index,
            type_name: arg.type_name(),
            source: Box::new(source),
        })?;
        wires.push(wire);
    }

    let mut out = String::with_capacity(256);
    out.push_str(XML_DECLARATION);
    push_open(&mut out, METHOD_CALL);
    push_scalar(&mut out, METHOD_NAME, &escape(method));
    push_open(&mut out, PARAMS);
    for wire in &wires {
        push_open(&mut out, PARAM);
        write_value(&mut out, wire);
        push_close(&mut out, PARAM);
    }
    push_close(&mut out, PARAMS);
    push_close(&mut out, METHOD_CALL);
    Ok(out.into_bytes())
}

/// Writes `<value>` wrapping the tagged encoding of `wire`.
fn write_value(out: &mut String, wire: &WireValue) {
    push_open(out, VALUE);
    match wire {
        WireValue::Int(n) => push_scalar(out, INT, &n.to_string()),
        WireValue::Bool(b) => push_scalar(out, BOOLEAN, if *b { "1" } else { "0" }),
        WireValue::String(s) => push_scalar(out, STRING, &escape(s)),
        WireValue::Double(f) => push_scalar(out, DOUBLE, &f.to_string()),
        WireValue::DateTime(dt) => {
            push_scalar(out, DATE_TIME, &dt.format(TIME_FORMAT).to_string());
        }
        WireValue::Base64(data) => push_scalar(out, BASE64, &STANDARD.encode(data)),
        WireValue::Array(items) => {
            push_open(out, ARRAY);
            push_open(out, DATA);
            for item in items {
                write_value(out, item);
            }
            push_close(out, DATA);
            push_close(out, ARRAY);
        }
        WireValue::Struct(members) => {
            push_open(out, STRUCT);
            for (name, val) in members {
                push_open(out, MEMBER);
                push_scalar(out, NAME, &escape(name));
                write_value(out, val);
                push_close(out, MEMBER);
            }
            push_close(out, STRUCT);
        }
    }
    push_close(out, VALUE);
}

fn push_open(out: &mut String, tag: &str) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
}

fn push_close(out: &mut String, tag: &str) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn push_scalar(out: &mut String, tag: &str, text: &str) {
    push_open(out, tag);
    out.push_str(text);
    push_close(out, tag);
}
