//! Query checks that run before any upstream is contacted.
use crate::dns_message::{Message, Question};
use crate::errors::DomainError;

pub const MAX_QNAME_LEN: usize = 253;

pub const QNAME_LENGTH_MESSAGE: &str = "Query name length must be between 1 and 253";
pub const QTYPE_RANGE_MESSAGE: &str = "Query type must be in range [1, 65535]";
pub const QCLASS_RANGE_MESSAGE: &str = "Query class must be in range [1, 65535]";

/// Name length counts presentation octets without the trailing dot, so the
/// root name has length 0 and is rejected.
pub fn validate_question(question: &Question) -> Result<(), DomainError> {
    let len = question.qname.text_len();
    if len == 0 || len > MAX_QNAME_LEN {
        return Err(DomainError::Validation(QNAME_LENGTH_MESSAGE.to_string()));
    }
    if question.qtype == 0 {
        return Err(DomainError::Validation(QTYPE_RANGE_MESSAGE.to_string()));
    }
    if question.qclass == 0 {
        return Err(DomainError::Validation(QCLASS_RANGE_MESSAGE.to_string()));
    }
    Ok(())
}

pub fn validate_query(message: &Message) -> Result<(), DomainError> {
    if message.questions.is_empty() {
        return Err(DomainError::Validation(
            "Query must contain at least one question".to_string(),
        ));
    }
    message.questions.iter().try_for_each(validate_question)
}

/// Narrows a wider integer to a query type, for sources that are not bounded
/// by the wire format (JSON, query strings).
pub fn query_type_from(value: u32) -> Result<u16, DomainError> {
    match u16::try_from(value) {
        Ok(qtype) if qtype >= 1 => Ok(qtype),
        _ => Err(DomainError::Validation(QTYPE_RANGE_MESSAGE.to_string())),
    }
}

pub fn query_class_from(value: u32) -> Result<u16, DomainError> {
    match u16::try_from(value) {
        Ok(qclass) if qclass >= 1 => Ok(qclass),
        _ => Err(DomainError::Validation(QCLASS_RANGE_MESSAGE.to_string())),
    }
}
