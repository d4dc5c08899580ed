//! Call orchestration over a pluggable transport.
//!
//! The codec itself never touches the network; it hands the serialized
//! request to a [`Transport`] and decodes whatever comes back. Retry
//! policy, deadlines and cancellation all live inside the transport
//! implementation.

use crate::decoder::decode_response;
use crate::encoder::encode_request;
use crate::error::Error;
use crate::param::Param;
use crate::value::Value;

/// A single HTTP-like request/response exchange.
///
/// Implementations send the request body and return the raw response
/// body, or an opaque transport error (connection failure, non-2xx
/// status, body-read failure). The codec does not retry.
pub trait Transport {
    type Error: std::error::Error + Send + Sync + 'static;

    fn round_trip(&mut self, body: &[u8]) -> Result<Vec<u8>, Self::Error>;
}

/// An XML-RPC client: encode, exchange, decode.
pub struct Client<T> {
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Client<T> {
        Client { transport }
    }

    /// Calls a remote method.
    ///
    /// Each stage failure is wrapped with its stage context; a fault
    /// reported by the remote side surfaces as
    /// [`DecodeError::RemoteFault`](crate::DecodeError::RemoteFault)
    /// inside [`Error::Decode`], never as a value.
    pub fn call(&mut self, method: &str, args: &[Param]) -> Result<Value, Error> {
        let body = encode_request(method, args).map_err(Error::Encode)?;
        log::debug!("calling `{}` with {} argument(s)", method, args.len());

        let response = self.transport.round_trip(&body).map_err(|err| {
            log::error!("call `{}` failed in transport: {}", method, err);
            Error::Transport(Box::new(err))
        })?;

        decode_response(&response).map_err(Error::Decode)
    }

    pub fn into_inner(self) -> T {
        self.transport
    }
}
