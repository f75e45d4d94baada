use crate::errors::DomainError;
use crate::upstream::UpstreamPool;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Tried in this order.
    #[serde(default = "default_servers")]
    pub servers: Vec<String>,

    /// Seconds, per upstream attempt.
    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,

    /// Addresses served by the JSON-API transport instead of DoH.
    #[serde(default = "default_json_api_endpoints")]
    pub json_api_endpoints: Vec<String>,
}

impl UpstreamConfig {
    pub fn pool(&self) -> Result<UpstreamPool, DomainError> {
        UpstreamPool::from_addresses(&self.servers)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            servers: default_servers(),
            query_timeout: default_query_timeout(),
            json_api_endpoints: default_json_api_endpoints(),
        }
    }
}

fn default_servers() -> Vec<String> {
    vec![
        "https://cloudflare-dns.com/dns-query".to_string(),
        "8.8.8.8:53".to_string(),
    ]
}

fn default_query_timeout() -> u64 {
    5
}

fn default_json_api_endpoints() -> Vec<String> {
    vec![
        "https://dns.google.com/resolve".to_string(),
        "https://dns.google/resolve".to_string(),
    ]
}
