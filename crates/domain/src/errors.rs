use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    /// Malformed query detected before any I/O. The message is surfaced verbatim.
    #[error("{0}")]
    Validation(String),

    #[error("Malformed DNS message: {0}")]
    MalformedMessage(String),

    #[error("Invalid upstream: {0}")]
    InvalidUpstream(String),

    #[error("Invalid DoH request: {0}")]
    InvalidDohRequest(String),

    #[error("HTTP method {0} is not allowed for DNS queries")]
    MethodNotAllowed(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Failed to send the request to {upstream}: {reason}")]
    ClientRequestFailed { upstream: String, reason: String },

    #[error("Failed to map the response from {upstream}: {reason}")]
    ResponseMappingFailed { upstream: String, reason: String },

    #[error("Transport timeout waiting for {server}")]
    TransportTimeout { server: String },

    #[error("No transport supports any of the {upstreams} configured upstream(s)")]
    NoEligibleTransport { upstreams: usize },

    #[error("All upstream servers failed after {attempts} attempt(s), last error: {last}")]
    PoolExhausted {
        attempts: usize,
        last: Box<DomainError>,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl DomainError {
    /// Errors caused by what the client sent; they map to 4xx / FORMERR.
    pub fn is_client_input_error(&self) -> bool {
        matches!(
            self,
            DomainError::Validation(_)
                | DomainError::InvalidDomainName(_)
                | DomainError::MalformedMessage(_)
                | DomainError::InvalidDohRequest(_)
                | DomainError::MethodNotAllowed(_)
                | DomainError::UnsupportedMediaType(_)
        )
    }

    /// Failures talking to a single upstream. The pool resolver fails over on these.
    pub fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            DomainError::ClientRequestFailed { .. }
                | DomainError::ResponseMappingFailed { .. }
                | DomainError::TransportTimeout { .. }
        )
    }

    /// Terminal resolution failures surfaced once the whole pool has been tried.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            DomainError::PoolExhausted { .. } | DomainError::NoEligibleTransport { .. }
        ) || self.is_upstream_failure()
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        DomainError::MalformedMessage(reason.into())
    }
}
