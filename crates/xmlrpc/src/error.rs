//! Error taxonomy, one enum per codec stage.
//!
//! Every stage wraps the underlying cause without discarding it, so a
//! caller can walk the `source()` chain down to the leaf kind or match
//! on a specific variant. Nothing here is retried; any retry policy
//! belongs to the transport.

use thiserror::Error;

/// Failures while converting call arguments into wire values.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The argument (or one of its nested elements) has no XML-RPC
    /// representation, e.g. a nil argument or a map with a non-string key.
    #[error("invalid type {0}")]
    InvalidArgumentType(&'static str),
    /// A struct argument names the same member twice; member names must
    /// be unique on the wire.
    #[error("struct key `{0}` given multiple times")]
    DuplicateStructKey(String),
    /// Conversion of one argument failed; carries the argument position
    /// and outermost type name, with the offending cause as source.
    #[error("method arguments parsing failed: argument {index} ({type_name})")]
    ArgumentConversionFailed {
        index: usize,
        type_name: &'static str,
        #[source]
        source: Box<EncodeError>,
    },
}

/// Structural XML failures: the bytes do not form a well-formed document.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("document is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("malformed XML")]
    Parse(#[from] quick_xml::Error),
    #[error("unexpected end of document")]
    UnexpectedEof,
}

/// Failures while decoding a `methodResponse` document.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to reconstruct XML DOM")]
    MalformedDocument(#[from] XmlError),
    /// Neither or both of the value path and the fault path are present.
    #[error("failed to recognize XML RPC response")]
    UnrecognizedResponseShape,
    /// A `value` element does not contain exactly one child element.
    #[error("`value` tag doesn't contain exactly one child tag")]
    MalformedValue,
    #[error("cannot recognize tag `{0}`")]
    UnrecognizedTag(String),
    #[error("cannot convert `{text}` to integer")]
    IntegerConversionFailed {
        text: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("cannot convert `{0}` to boolean")]
    BooleanConversionFailed(String),
    #[error("cannot convert `{text}` to floating point number")]
    DoubleConversionFailed {
        text: String,
        #[source]
        source: std::num::ParseFloatError,
    },
    #[error("cannot convert `{text}` to a date")]
    DateTimeConversionFailed {
        text: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("cannot decode `{text}` as base64")]
    Base64ConversionFailed {
        text: String,
        #[source]
        source: base64::DecodeError,
    },
    #[error("no values found in array")]
    EmptyArrayNotAllowed,
    #[error("no members found in struct")]
    EmptyStructNotAllowed,
    #[error("no `name` tag found for struct member")]
    MissingMemberName,
    #[error("no `value` tag found for struct member")]
    MissingMemberValue,
    #[error("struct member `{0}` found multiple times")]
    DuplicateMemberName(String),
    /// The fault path is present but its struct is not exactly
    /// `{faultCode: int, faultString: string}`.
    #[error("failed to recognize XML RPC fault")]
    UnrecognizedFaultShape,
    /// The remote endpoint reported a fault. Terminal: a recognized
    /// fault is never represented as a [`Value`](crate::Value).
    #[error("XML RPC error: {code}: {message}")]
    RemoteFault { code: i32, message: String },
}

/// A whole-call failure, tagged with the stage that produced it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("payload preparation failed")]
    Encode(#[source] EncodeError),
    #[error("request failed")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("cannot parse XML RPC response")]
    Decode(#[source] DecodeError),
}

impl Error {
    /// Returns the remote fault code and message, if this error is one.
    pub fn remote_fault(&self) -> Option<(i32, &str)> {
        match self {
            Error::Decode(DecodeError::RemoteFault { code, message }) => {
                Some((*code, message.as_str()))
            }
            _ => None,
        }
    }
}
