//! RFC 8484 adapter between HTTP exchanges and [`Message`].
//!
//! GET carries the wire-encoded query base64url-encoded in the `dns`
//! parameter; POST carries it raw in the body with the DNS message media
//! type. Responses are always wire-encoded.

use axum::{
    body::Body,
    http::{
        header::{CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE},
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
};
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use dohgate_domain::{DomainError, Message};
pub use dohgate_domain::DNS_MESSAGE_CONTENT_TYPE;
use std::collections::HashMap;

pub const DNS_QUERY_PARAM: &str = "dns";

/// base64url without padding on output; padded or unpadded input is accepted.
pub const BASE64URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Extracts the DNS query carried by an HTTP request.
pub fn http_to_message(
    method: &Method,
    params: &HashMap<String, String>,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Message, DomainError> {
    let wire = match *method {
        Method::GET => decode_query_param(params)?,
        Method::POST => {
            check_content_type(headers)?;
            body.to_vec()
        }
        ref other => return Err(DomainError::MethodNotAllowed(other.to_string())),
    };

    Message::from_wire(&wire)
}

/// Wire-encodes `message` into a `200 OK` DoH response.
pub fn message_to_http_response(message: &Message) -> Result<DohResponse, DomainError> {
    let body = message.to_wire()?;

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(DNS_MESSAGE_CONTENT_TYPE));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
    if let Some(ttl) = message.min_answer_ttl() {
        if let Ok(value) = HeaderValue::from_str(&format!("max-age={}", ttl)) {
            headers.insert(CACHE_CONTROL, value);
        }
    }

    Ok(DohResponse {
        status: StatusCode::OK,
        headers,
        body,
    })
}

fn decode_query_param(params: &HashMap<String, String>) -> Result<Vec<u8>, DomainError> {
    let encoded = params.get(DNS_QUERY_PARAM).ok_or_else(|| {
        DomainError::InvalidDohRequest(format!("missing '{}' query parameter", DNS_QUERY_PARAM))
    })?;

    BASE64URL.decode(encoded.trim()).map_err(|e| {
        DomainError::InvalidDohRequest(format!(
            "'{}' parameter is not valid base64url: {}",
            DNS_QUERY_PARAM, e
        ))
    })
}

fn check_content_type(headers: &HeaderMap) -> Result<(), DomainError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    let media_type = content_type.split(';').next().unwrap_or("").trim();
    if media_type.eq_ignore_ascii_case(DNS_MESSAGE_CONTENT_TYPE) {
        Ok(())
    } else if media_type.is_empty() {
        Err(DomainError::UnsupportedMediaType(
            "missing Content-Type".to_string(),
        ))
    } else {
        Err(DomainError::UnsupportedMediaType(media_type.to_string()))
    }
}

/// Status, headers and wire body of a successful DoH exchange.
#[derive(Debug, Clone)]
pub struct DohResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl IntoResponse for DohResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
