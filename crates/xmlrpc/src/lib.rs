//! XML-RPC wire codec.
//!
//! Encodes a method name plus a sequence of typed arguments into an
//! XML-RPC `methodCall` document, and decodes `methodResponse`
//! documents into a [`Value`] tree or a structured fault. Decoding is
//! strict: every nesting level is validated (exactly-one-child rules,
//! required tags, duplicate-key detection, fault shape), and the first
//! violation aborts the decode.
//!
//! The codec is synchronous and shares nothing between calls; the
//! network exchange is abstracted behind [`Transport`].
//!
//! ```
//! use xmlrpc_wire::{encode_request, decode_response, Param, Value};
//!
//! let body = encode_request("pow", &[Param::Int(2), Param::Int(9)]).unwrap();
//! assert!(body.starts_with(b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
//!
//! let response = b"<methodResponse><params><param>\
//!     <value><int>512</int></value>\
//!     </param></params></methodResponse>";
//! assert_eq!(decode_response(response).unwrap(), Value::Int(512));
//! ```

mod client;
mod constants;
mod decoder;
mod encoder;
mod error;
mod param;
mod value;
mod xml;

pub use client::{Client, Transport};
pub use decoder::decode_response;
pub use encoder::encode_request;
pub use error::{DecodeError, EncodeError, Error, XmlError};
pub use param::Param;
pub use value::{Kind, Value};
