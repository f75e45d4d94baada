use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,

    /// DoH listener.
    pub web_port: u16,

    /// Classic UDP listener, disabled when absent.
    pub dns_port: Option<u16>,

    pub doh_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            web_port: 8053,
            dns_port: None,
            doh_path: "/dns-query".to_string(),
        }
    }
}
