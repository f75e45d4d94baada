//! UDP client for classic DNS upstreams (RFC 1035 §4.2.1)
//!
//! One datagram out, one datagram back. No TCP fallback on truncation: a
//! response with TC set is returned as-is.

use super::{mapping_failed, send_failed, timed_out, UpstreamClient};
use async_trait::async_trait;
use dohgate_domain::{DomainError, Message, UpstreamDescriptor};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::{lookup_host, UdpSocket};
use tracing::debug;

pub const DEFAULT_RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct UdpClient {
    recv_timeout: Duration,
}

impl UdpClient {
    pub fn new(recv_timeout: Duration) -> Self {
        Self { recv_timeout }
    }

    pub fn recv_timeout(&self) -> Duration {
        self.recv_timeout
    }

    async fn server_addr(&self, upstream: &UpstreamDescriptor) -> Result<SocketAddr, DomainError> {
        let target = upstream.socket_target();
        let mut addrs = tokio::time::timeout(self.recv_timeout, lookup_host(target.as_str()))
            .await
            .map_err(|_| timed_out(upstream))?
            .map_err(|e| send_failed(upstream, format!("failed to resolve {}: {}", target, e)))?;
        addrs
            .next()
            .ok_or_else(|| send_failed(upstream, format!("no address found for {}", target)))
    }
}

impl Default for UdpClient {
    fn default() -> Self {
        Self::new(DEFAULT_RECV_TIMEOUT)
    }
}

#[async_trait]
impl UpstreamClient for UdpClient {
    fn name(&self) -> &'static str {
        "UDP"
    }

    fn supports(&self, upstream: &UpstreamDescriptor) -> bool {
        match upstream.scheme() {
            None => true,
            Some(scheme) => scheme.eq_ignore_ascii_case("udp"),
        }
    }

    async fn resolve(
        &self,
        upstream: &UpstreamDescriptor,
        request: &Message,
    ) -> Result<Message, DomainError> {
        let query = request.to_wire()?;
        let server_addr = self.server_addr(upstream).await?;

        let bind_addr = if server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| send_failed(upstream, format!("failed to bind UDP socket: {}", e)))?;
        // Connected: datagrams from any other source are discarded by the kernel.
        socket
            .connect(server_addr)
            .await
            .map_err(|e| send_failed(upstream, e))?;

        let bytes_sent = socket
            .send(&query)
            .await
            .map_err(|e| send_failed(upstream, e))?;
        debug!(server = %server_addr, bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let bytes_received = tokio::time::timeout(self.recv_timeout, socket.recv(&mut recv_buf))
            .await
            .map_err(|_| timed_out(upstream))?
            .map_err(|e| send_failed(upstream, e))?;
        recv_buf.truncate(bytes_received);

        debug!(server = %server_addr, bytes_received, "UDP response received");

        let response = Message::from_wire(&recv_buf).map_err(|e| mapping_failed(upstream, e))?;
        if response.header.id != request.header.id {
            return Err(mapping_failed(
                upstream,
                format!(
                    "response id {} does not match query id {}",
                    response.header.id, request.header.id
                ),
            ));
        }
        Ok(response)
    }
}
