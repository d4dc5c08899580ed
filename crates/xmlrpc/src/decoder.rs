//! Response decoding.
//!
//! Walks the parsed document from two fixed entry paths — the success
//! value or the fault report — and validates shape at every nesting
//! level. The first failure aborts the whole decode; a partially built
//! tree is never returned.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};

use crate::constants::*;
use crate::error::DecodeError;
use crate::value::Value;
use crate::xml::{Document, Element};

/// Decodes a `methodResponse` document into a [`Value`] tree.
///
/// A recognized fault terminates with [`DecodeError::RemoteFault`];
/// it is never surfaced as a value.
pub fn decode_response(data: &[u8]) -> Result<Value, DecodeError> {
    let doc = Document::parse(data)?;
    let value_tag = doc.find(RESPONSE_VALUE_PATH);
    let fault_tag = doc.find(RESPONSE_FAULT_PATH);
    match (value_tag, fault_tag) {
        (Some(value), None) => parse_value(value),
        (None, Some(fault)) => Err(parse_fault(fault)),
        _ => Err(DecodeError::UnrecognizedResponseShape),
    }
}

/// Validates the fault struct shape and produces the terminal error.
fn parse_fault(fault: &Element) -> DecodeError {
    let members = fault.find_all(FAULT_MEMBER_PATH);
    if members.len() != 2 {
        return DecodeError::UnrecognizedFaultShape;
    }

    // Members are matched by name, not position.
    let mut code_element = None;
    let mut message_element = None;
    for member in members {
        let name = match member.find(NAME) {
            Some(name) => name,
            None => return DecodeError::UnrecognizedFaultShape,
        };
        if name.text() == FAULT_CODE {
            code_element = member
                .find(FAULT_CODE_INT_PATH)
                .or_else(|| member.find(FAULT_CODE_I4_PATH));
        }
        if name.text() == FAULT_STRING {
            message_element = member.find(FAULT_STRING_PATH);
        }
    }

    let (code_element, message_element) = match (code_element, message_element) {
        (Some(code), Some(message)) => (code, message),
        _ => return DecodeError::UnrecognizedFaultShape,
    };
    let code = match code_element.text().parse::<i32>() {
        Ok(code) => code,
        Err(_) => return DecodeError::UnrecognizedFaultShape,
    };
    DecodeError::RemoteFault {
        code,
        message: message_element.text().to_owned(),
    }
}

/// Enforces the exactly-one-child rule on a `value` element, then
/// dispatches on the child's tag.
fn parse_value(value: &Element) -> Result<Value, DecodeError> {
    match value.children() {
        [child] => parse_element(child),
        _ => Err(DecodeError::MalformedValue),
    }
}

fn parse_element(element: &Element) -> Result<Value, DecodeError> {
    let text = element.text();
    match element.name() {
        STRING => Ok(Value::String(text.to_owned())),
        INT | I4 => {
            let number =
                text.parse::<i64>()
                    .map_err(|source| DecodeError::IntegerConversionFailed {
                        text: text.to_owned(),
                        source,
                    })?;
            Ok(Value::Int(number))
        }
        BOOLEAN => match parse_bool(text) {
            Some(boolean) => Ok(Value::Bool(boolean)),
            None => Err(DecodeError::BooleanConversionFailed(text.to_owned())),
        },
        DOUBLE => {
            let double =
                text.parse::<f64>()
                    .map_err(|source| DecodeError::DoubleConversionFailed {
                        text: text.to_owned(),
                        source,
                    })?;
            Ok(Value::Double(double))
        }
        DATE_TIME => {
            let parsed = DateTime::parse_from_rfc3339(text).map_err(|source| {
                DecodeError::DateTimeConversionFailed {
                    text: text.to_owned(),
                    source,
                }
            })?;
            Ok(Value::DateTime(parsed.with_timezone(&Utc)))
        }
        BASE64 => {
            let data =
                STANDARD
                    .decode(text)
                    .map_err(|source| DecodeError::Base64ConversionFailed {
                        text: text.to_owned(),
                        source,
                    })?;
            Ok(Value::Base64(data))
        }
        ARRAY => Ok(Value::Array(parse_array(element)?)),
        STRUCT => Ok(Value::Struct(parse_struct(element)?)),
        other => Err(DecodeError::UnrecognizedTag(other.to_owned())),
    }
}

/// The textual boolean forms accepted on the wire, beyond `1`/`0`.
fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

fn parse_array(array: &Element) -> Result<Vec<Value>, DecodeError> {
    let mut values = Vec::new();
    for value in array.find_all(ARRAY_VALUE_PATH) {
        match value.children() {
            [child] => values.push(parse_element(child)?),
            _ => return Err(DecodeError::MalformedValue),
        }
    }

    // An empty array cannot be represented; the peer may still emit
    // one, since the encode side deliberately allows it.
    if values.is_empty() {
        return Err(DecodeError::EmptyArrayNotAllowed);
    }
    Ok(values)
}

fn parse_struct(structure: &Element) -> Result<HashMap<String, Value>, DecodeError> {
    let mut members = HashMap::new();
    for member in structure.find_all(MEMBER) {
        let name = member.find(NAME).ok_or(DecodeError::MissingMemberName)?;
        let value = member.find(VALUE).ok_or(DecodeError::MissingMemberValue)?;
        if members.contains_key(name.text()) {
            return Err(DecodeError::DuplicateMemberName(name.text().to_owned()));
        }

        let parsed = match value.children() {
            [child] => parse_element(child)?,
            _ => return Err(DecodeError::MalformedValue),
        };
        members.insert(name.text().to_owned(), parsed);
    }

    if members.is_empty() {
        return Err(DecodeError::EmptyStructNotAllowed);
    }
    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Kind;
    use chrono::TimeZone;

    fn response(inner: &str) -> Vec<u8> {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <methodResponse><params><param>{inner}</param></params></methodResponse>"
        )
        .into_bytes()
    }

    fn decode_value(inner: &str) -> Result<Value, DecodeError> {
        decode_response(&response(inner))
    }

    #[test]
    fn decodes_int_and_i4() {
        assert_eq!(
            decode_value("<value><int>512</int></value>").expect("int"),
            Value::Int(512)
        );
        assert_eq!(
            decode_value("<value><i4>-7</i4></value>").expect("i4"),
            Value::Int(-7)
        );
    }

    #[test]
    fn decodes_string_verbatim() {
        let value = decode_value("<value><string> a &amp; b </string></value>").expect("string");
        assert_eq!(value.as_str(), Some(" a & b "));
    }

    #[test]
    fn decodes_boolean_forms() {
        for text in ["1", "t", "T", "true", "TRUE", "True"] {
            let value =
                decode_value(&format!("<value><boolean>{text}</boolean></value>")).expect(text);
            assert_eq!(value, Value::Bool(true));
        }
        for text in ["0", "f", "F", "false", "FALSE", "False"] {
            let value =
                decode_value(&format!("<value><boolean>{text}</boolean></value>")).expect(text);
            assert_eq!(value, Value::Bool(false));
        }
        assert!(matches!(
            decode_value("<value><boolean>yes</boolean></value>"),
            Err(DecodeError::BooleanConversionFailed(text)) if text == "yes"
        ));
    }

    #[test]
    fn decodes_double() {
        assert_eq!(
            decode_value("<value><double>11.25</double></value>").expect("double"),
            Value::Double(11.25)
        );
        assert!(matches!(
            decode_value("<value><double>x</double></value>"),
            Err(DecodeError::DoubleConversionFailed { .. })
        ));
    }

    #[test]
    fn decodes_datetime_rfc3339() {
        let value = decode_value(
            "<value><dateTime.iso8601>2024-05-01T14:30:45+02:00</dateTime.iso8601></value>",
        )
        .expect("datetime");
        assert_eq!(
            value.as_datetime(),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 45).unwrap())
        );
        assert!(matches!(
            decode_value("<value><dateTime.iso8601>yesterday</dateTime.iso8601></value>"),
            Err(DecodeError::DateTimeConversionFailed { .. })
        ));
    }

    #[test]
    fn decodes_base64() {
        let value = decode_value("<value><base64>aGVsbG8=</base64></value>").expect("base64");
        assert_eq!(value.as_base64(), Some(&b"hello"[..]));
        assert!(matches!(
            decode_value("<value><base64>!!!</base64></value>"),
            Err(DecodeError::Base64ConversionFailed { .. })
        ));
    }

    #[test]
    fn rejects_unknown_tag() {
        assert!(matches!(
            decode_value("<value><float>1.5</float></value>"),
            Err(DecodeError::UnrecognizedTag(tag)) if tag == "float"
        ));
    }

    #[test]
    fn rejects_wrong_child_count_in_value() {
        assert!(matches!(
            decode_value("<value></value>"),
            Err(DecodeError::MalformedValue)
        ));
        assert!(matches!(
            decode_value("<value><int>1</int><int>2</int></value>"),
            Err(DecodeError::MalformedValue)
        ));
    }

    #[test]
    fn decodes_array_preserving_order() {
        let value = decode_value(
            "<value><array><data>\
             <value><int>1</int></value>\
             <value><string>two</string></value>\
             <value><boolean>1</boolean></value>\
             </data></array></value>",
        )
        .expect("array");
        let items = value.as_array().expect("items");
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], Value::Int(1));
        assert_eq!(items[1], Value::String("two".into()));
        assert_eq!(items[2], Value::Bool(true));
    }

    #[test]
    fn rejects_empty_array() {
        assert!(matches!(
            decode_value("<value><array><data></data></array></value>"),
            Err(DecodeError::EmptyArrayNotAllowed)
        ));
        assert!(matches!(
            decode_value("<value><array></array></value>"),
            Err(DecodeError::EmptyArrayNotAllowed)
        ));
    }

    #[test]
    fn rejects_malformed_array_element() {
        assert!(matches!(
            decode_value("<value><array><data><value></value></data></array></value>"),
            Err(DecodeError::MalformedValue)
        ));
    }

    #[test]
    fn decodes_struct_members() {
        let value = decode_value(
            "<value><struct>\
             <member><name>lhs</name><value><int>2</int></value></member>\
             <member><name>rhs</name><value><int>9</int></value></member>\
             </struct></value>",
        )
        .expect("struct");
        let members = value.as_struct().expect("members");
        assert_eq!(members.len(), 2);
        assert_eq!(members["lhs"], Value::Int(2));
        assert_eq!(members["rhs"], Value::Int(9));
    }

    #[test]
    fn rejects_struct_shape_violations() {
        assert!(matches!(
            decode_value("<value><struct></struct></value>"),
            Err(DecodeError::EmptyStructNotAllowed)
        ));
        assert!(matches!(
            decode_value(
                "<value><struct><member><value><int>1</int></value></member></struct></value>"
            ),
            Err(DecodeError::MissingMemberName)
        ));
        assert!(matches!(
            decode_value("<value><struct><member><name>k</name></member></struct></value>"),
            Err(DecodeError::MissingMemberValue)
        ));
        assert!(matches!(
            decode_value(
                "<value><struct>\
                 <member><name>k</name><value><int>1</int></value></member>\
                 <member><name>k</name><value><int>2</int></value></member>\
                 </struct></value>"
            ),
            Err(DecodeError::DuplicateMemberName(name)) if name == "k"
        ));
        assert!(matches!(
            decode_value("<value><struct><member><name>k</name><value></value></member></struct></value>"),
            Err(DecodeError::MalformedValue)
        ));
    }

    #[test]
    fn nested_failures_abort_the_whole_decode() {
        assert!(matches!(
            decode_value(
                "<value><array><data>\
                 <value><int>1</int></value>\
                 <value><int>oops</int></value>\
                 </data></array></value>"
            ),
            Err(DecodeError::IntegerConversionFailed { .. })
        ));
    }

    #[test]
    fn recognizes_fault() {
        let body = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
            <methodResponse><fault><value><struct>\
            <member><name>faultCode</name><value><int>4</int></value></member>\
            <member><name>faultString</name><value><string>bad args</string></value></member>\
            </struct></value></fault></methodResponse>";
        match decode_response(body) {
            Err(DecodeError::RemoteFault { code, message }) => {
                assert_eq!(code, 4);
                assert_eq!(message, "bad args");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn fault_members_match_by_name_not_position() {
        let body = b"<methodResponse><fault><value><struct>\
            <member><name>faultString</name><value><string>late code</string></value></member>\
            <member><name>faultCode</name><value><i4>13</i4></value></member>\
            </struct></value></fault></methodResponse>";
        match decode_response(body) {
            Err(DecodeError::RemoteFault { code, message }) => {
                assert_eq!(code, 13);
                assert_eq!(message, "late code");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_faults() {
        // One member only.
        let one = b"<methodResponse><fault><value><struct>\
            <member><name>faultCode</name><value><int>4</int></value></member>\
            </struct></value></fault></methodResponse>";
        assert!(matches!(
            decode_response(one),
            Err(DecodeError::UnrecognizedFaultShape)
        ));
        // Mistyped faultCode value.
        let mistyped = b"<methodResponse><fault><value><struct>\
            <member><name>faultCode</name><value><string>four</string></value></member>\
            <member><name>faultString</name><value><string>x</string></value></member>\
            </struct></value></fault></methodResponse>";
        assert!(matches!(
            decode_response(mistyped),
            Err(DecodeError::UnrecognizedFaultShape)
        ));
        // Unparsable code text.
        let unparsable = b"<methodResponse><fault><value><struct>\
            <member><name>faultCode</name><value><int>four</int></value></member>\
            <member><name>faultString</name><value><string>x</string></value></member>\
            </struct></value></fault></methodResponse>";
        assert!(matches!(
            decode_response(unparsable),
            Err(DecodeError::UnrecognizedFaultShape)
        ));
    }

    #[test]
    fn value_and_fault_are_mutually_exclusive() {
        let both = b"<methodResponse>\
            <params><param><value><int>1</int></value></param></params>\
            <fault><value><struct>\
            <member><name>faultCode</name><value><int>4</int></value></member>\
            <member><name>faultString</name><value><string>x</string></value></member>\
            </struct></value></fault></methodResponse>";
        assert!(matches!(
            decode_response(both),
            Err(DecodeError::UnrecognizedResponseShape)
        ));
        assert!(matches!(
            decode_response(b"<methodResponse></methodResponse>"),
            Err(DecodeError::UnrecognizedResponseShape)
        ));
        assert!(matches!(
            decode_response(b"<otherDocument><x/></otherDocument>"),
            Err(DecodeError::UnrecognizedResponseShape)
        ));
    }

    #[test]
    fn rejects_malformed_document() {
        assert!(matches!(
            decode_response(b"this is not xml <"),
            Err(DecodeError::MalformedDocument(_))
        ));
    }

    #[test]
    fn successful_decode_never_yields_invalid() {
        let value = decode_value("<value><int>1</int></value>").expect("int");
        assert_ne!(value.kind(), Kind::Invalid);
    }
}
