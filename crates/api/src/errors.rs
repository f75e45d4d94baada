use axum::{
    http::{header::ALLOW, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use dohgate_domain::DomainError;
use serde_json::json;
use tracing::error;

pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,

            DomainError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,

            DomainError::InvalidDohRequest(_)
            | DomainError::MalformedMessage(_)
            | DomainError::Validation(_)
            | DomainError::InvalidDomainName(_) => StatusCode::BAD_REQUEST,

            DomainError::PoolExhausted { .. }
            | DomainError::NoEligibleTransport { .. }
            | DomainError::ClientRequestFailed { .. }
            | DomainError::ResponseMappingFailed { .. }
            | DomainError::TransportTimeout { .. } => StatusCode::BAD_GATEWAY,

            DomainError::InvalidUpstream(_)
            | DomainError::ConfigError(_)
            | DomainError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "Internal error while serving DoH request");
            "internal error".to_string()
        } else {
            self.0.to_string()
        };

        let mut response = (status, Json(json!({ "error": message }))).into_response();
        if status == StatusCode::METHOD_NOT_ALLOWED {
            response
                .headers_mut()
                .insert(ALLOW, HeaderValue::from_static("GET, POST"));
        }
        response
    }
}
