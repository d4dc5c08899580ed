//! Wire vocabulary of the XML-RPC format.
//!
//! Element names, the document declaration, the decoder's fixed query
//! paths, and the datetime text format. These must match the wire
//! exactly for interoperability with other XML-RPC peers.

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

pub const METHOD_CALL: &str = "methodCall";
pub const METHOD_NAME: &str = "methodName";
pub const PARAMS: &str = "params";
pub const PARAM: &str = "param";
pub const VALUE: &str = "value";
pub const INT: &str = "int";
pub const I4: &str = "i4";
pub const BOOLEAN: &str = "boolean";
pub const STRING: &str = "string";
pub const DOUBLE: &str = "double";
pub const DATE_TIME: &str = "dateTime.iso8601";
pub const BASE64: &str = "base64";
pub const STRUCT: &str = "struct";
pub const MEMBER: &str = "member";
pub const NAME: &str = "name";
pub const ARRAY: &str = "array";
pub const DATA: &str = "data";
pub const FAULT_CODE: &str = "faultCode";
pub const FAULT_STRING: &str = "faultString";

/// First (and only) location of a successful result value.
pub const RESPONSE_VALUE_PATH: &str = "methodResponse/params/param/value";
/// First (and only) location of a fault report.
pub const RESPONSE_FAULT_PATH: &str = "methodResponse/fault";
pub const ARRAY_VALUE_PATH: &str = "data/value";
pub const FAULT_MEMBER_PATH: &str = "value/struct/member";
pub const FAULT_CODE_INT_PATH: &str = "value/int";
pub const FAULT_CODE_I4_PATH: &str = "value/i4";
pub const FAULT_STRING_PATH: &str = "value/string";

/// Datetime text format: UTC-normalized, offset without a colon
/// (`2006-01-02T15:04:05-0700`). Deliberately not strict RFC 3339;
/// peers depend on this exact shape.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";
