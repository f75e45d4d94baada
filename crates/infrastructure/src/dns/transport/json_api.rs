//! Google DNS JSON API client (`GET /resolve?name=..&type=..`).

use super::{build_http_client, mapping_failed, send_failed, timed_out, UpstreamClient};
use crate::dns::json_mapper::map_response;
use async_trait::async_trait;
use dohgate_domain::validation::validate_question;
use dohgate_domain::{DomainError, Message, UpstreamDescriptor};
use reqwest::header::ACCEPT;
use std::time::Duration;
use tracing::debug;

const DNS_JSON_CONTENT_TYPE: &str = "application/dns-json";

pub struct JsonApiClient {
    client: reqwest::Client,
    endpoints: Vec<UpstreamDescriptor>,
    timeout: Duration,
}

impl JsonApiClient {
    pub fn new(endpoints: Vec<UpstreamDescriptor>, timeout: Duration) -> Result<Self, DomainError> {
        Ok(Self {
            client: build_http_client(timeout)?,
            endpoints,
            timeout,
        })
    }

    pub fn from_addresses(addresses: &[String], timeout: Duration) -> Result<Self, DomainError> {
        let endpoints = addresses
            .iter()
            .map(|address| {
                address.parse::<UpstreamDescriptor>().map_err(|e| {
                    DomainError::InvalidUpstream(format!(
                        "Invalid JSON API endpoint '{}': {}",
                        address, e
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(endpoints, timeout)
    }

    pub fn endpoints(&self) -> &[UpstreamDescriptor] {
        &self.endpoints
    }
}

/// Provider endpoints are matched by host and path. The scheme only has to
/// be fetchable, and ports are compared when both sides spell one out.
fn same_endpoint(endpoint: &UpstreamDescriptor, upstream: &UpstreamDescriptor) -> bool {
    let fetchable = upstream.has_scheme("https") || upstream.has_scheme("http");
    let ports_agree = match (endpoint.port(), upstream.port()) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    };

    fetchable
        && ports_agree
        && endpoint.host().eq_ignore_ascii_case(upstream.host())
        && endpoint.path().unwrap_or("/") == upstream.path().unwrap_or("/")
}

#[async_trait]
impl UpstreamClient for JsonApiClient {
    fn name(&self) -> &'static str {
        "JSON-API"
    }

    fn supports(&self, upstream: &UpstreamDescriptor) -> bool {
        self.endpoints
            .iter()
            .any(|endpoint| same_endpoint(endpoint, upstream))
    }

    async fn resolve(
        &self,
        upstream: &UpstreamDescriptor,
        request: &Message,
    ) -> Result<Message, DomainError> {
        let question = request.first_question().ok_or_else(|| {
            DomainError::Validation("Query must contain at least one question".to_string())
        })?;
        validate_question(question)?;

        let mut params = vec![
            ("name", question.qname.to_string()),
            ("type", question.qtype.to_string()),
        ];
        if request.header.checking_disabled {
            params.push(("cd", "1".to_string()));
        }
        debug!(upstream = %upstream, qname = %question.qname, qtype = question.qtype, "Sending JSON API query");

        let response = tokio::time::timeout(
            self.timeout,
            self.client
                .get(upstream.address())
                .query(&params)
                .header(ACCEPT, DNS_JSON_CONTENT_TYPE)
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
            return Err(send_failed(upstream, format!("HTTP {}", status.as_u16())));
        }

        let body = tokio::time::timeout(self.timeout, response.bytes())
            .await
            .map_err(|_| timed_out(upstream))?
            .map_err(|e| send_failed(upstream, format!("failed to read body: {}", e)))?;

        map_response(&body, request).map_err(|e| mapping_failed(upstream, e))
    }
}
