//! RFC 1035 wire format (§4.1) for [`Message`](crate::Message).
//!
//! Messages are carried as-is: no TCP length prefix, the datagram or HTTP
//! body length is the message length.
mod decoder;
mod encoder;

pub use decoder::decode;
pub use encoder::encode;

pub const HEADER_LEN: usize = 12;

/// Media type of wire-format DNS messages over HTTP (RFC 8484 §6).
pub const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

/// Upper bound on compression pointers followed while reading one name.
pub const MAX_POINTER_HOPS: usize = 64;

/// Transaction id of a message, if at least the first two bytes are present.
pub fn peek_id(bytes: &[u8]) -> Option<u16> {
    match bytes {
        [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
        _ => None,
    }
}
