//! DNS-over-HTTPS client (RFC 8484)
//!
//! Sends the wire-format query as the body of an HTTP POST and decodes the
//! wire-format body of the answer.
//!
//! ```text
//! POST /dns-query HTTP/2
//! Content-Type: application/dns-message
//! Accept: application/dns-message
//!
//! <raw DNS message bytes>
//! ```

use super::{
    build_http_client, mapping_failed, send_failed, timed_out, UpstreamClient,
    DNS_MESSAGE_CONTENT_TYPE,
};
use async_trait::async_trait;
use dohgate_domain::{DomainError, Message, UpstreamDescriptor};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;
use tracing::debug;

pub struct HttpsClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpsClient {
    pub fn new(timeout: Duration) -> Result<Self, DomainError> {
        Ok(Self {
            client: build_http_client(timeout)?,
            timeout,
        })
    }
}

#[async_trait]
impl UpstreamClient for HttpsClient {
    fn name(&self) -> &'static str {
        "HTTPS"
    }

    fn supports(&self, upstream: &UpstreamDescriptor) -> bool {
        upstream
            .scheme()
            .is_some_and(|scheme| scheme.to_ascii_lowercase().contains("https"))
    }

    async fn resolve(
        &self,
        upstream: &UpstreamDescriptor,
        request: &Message,
    ) -> Result<Message, DomainError> {
        let body = request.to_wire()?;
        debug!(upstream = %upstream, message_len = body.len(), "Sending DoH query");

        let response = tokio::time::timeout(
            self.timeout,
            self.client
                .post(upstream.address())
                .header(CONTENT_TYPE, DNS_MESSAGE_CONTENT_TYPE)
                .header(ACCEPT, DNS_MESSAGE_CONTENT_TYPE)
                .body(body)
                .send(),
        )
        .await
        .map_err(|_| timed_out(upstream))?
        .map_err(|e| {
            if e.is_timeout() {
                timed_out(upstream)
            } else {
                send_failed(upstream, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(send_failed(
                upstream,
                format!(
                    "HTTP {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            ));
        }

        let bytes = tokio::time::timeout(self.timeout, response.bytes())
            .await
            .map_err(|_| timed_out(upstream))?
            .map_err(|e| send_failed(upstream, format!("failed to read body: {}", e)))?;

        debug!(upstream = %upstream, response_len = bytes.len(), "DoH response received");

        Message::from_wire(&bytes).map_err(|e| mapping_failed(upstream, e))
    }
}
