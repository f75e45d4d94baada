pub mod https;
pub mod json_api;
pub mod udp;

use async_trait::async_trait;
use dohgate_domain::config::UpstreamConfig;
use dohgate_domain::{DomainError, Message, UpstreamDescriptor};
use std::fmt::Display;
use std::sync::Arc;

pub use https::HttpsClient;
pub use json_api::JsonApiClient;
pub use udp::UdpClient;

pub use dohgate_domain::DNS_MESSAGE_CONTENT_TYPE;

/// One way of talking to an upstream.
///
/// Clients decide eligibility from the descriptor alone; the resolver picks
/// the first client in registry order whose `supports` returns true.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    fn name(&self) -> &'static str;

    fn supports(&self, upstream: &UpstreamDescriptor) -> bool;

    async fn resolve(
        &self,
        upstream: &UpstreamDescriptor,
        request: &Message,
    ) -> Result<Message, DomainError>;
}

/// Builds the client registry in priority order: JSON-API, HTTPS, UDP.
///
/// The JSON-API client goes first because its endpoints are https URLs the
/// DoH client would otherwise claim.
pub fn create_clients(config: &UpstreamConfig) -> Result<Vec<Arc<dyn UpstreamClient>>, DomainError> {
    let timeout = config.timeout();
    let json_api = JsonApiClient::from_addresses(&config.json_api_endpoints, timeout)?;
    let https = HttpsClient::new(timeout)?;
    let udp = UdpClient::new(timeout);

    let clients: Vec<Arc<dyn UpstreamClient>> =
        vec![Arc::new(json_api), Arc::new(https), Arc::new(udp)];
    Ok(clients)
}

pub(crate) fn send_failed(upstream: &UpstreamDescriptor, reason: impl Display) -> DomainError {
    DomainError::ClientRequestFailed {
        upstream: upstream.to_string(),
        reason: reason.to_string(),
    }
}

pub(crate) fn mapping_failed(upstream: &UpstreamDescriptor, reason: impl Display) -> DomainError {
    DomainError::ResponseMappingFailed {
        upstream: upstream.to_string(),
        reason: reason.to_string(),
    }
}

pub(crate) fn timed_out(upstream: &UpstreamDescriptor) -> DomainError {
    DomainError::TransportTimeout {
        server: upstream.to_string(),
    }
}

pub(crate) fn build_http_client(
    timeout: std::time::Duration,
) -> Result<reqwest::Client, DomainError> {
    reqwest::Client::builder()
        .use_rustls_tls()
        .timeout(timeout)
        .pool_max_idle_per_host(4)
        .build()
        .map_err(|e| DomainError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}
