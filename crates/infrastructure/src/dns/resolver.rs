use crate::dns::transport::UpstreamClient;
use async_trait::async_trait;
use dohgate_application::ports::DnsResolver;
use dohgate_domain::{DomainError, Message, UpstreamDescriptor, UpstreamPool};
use std::sync::Arc;
use tracing::{debug, warn};

/// Ordered failover over a fixed pool of upstreams.
///
/// For each upstream in pool order the first client whose `supports` accepts
/// it is used; upstreams no client supports are skipped. The first success
/// wins. Validation errors end the resolution immediately, every other error
/// moves on to the next upstream.
pub struct PoolResolver {
    pool: UpstreamPool,
    clients: Arc<[Arc<dyn UpstreamClient>]>,
}

impl PoolResolver {
    pub fn new(pool: UpstreamPool, clients: Vec<Arc<dyn UpstreamClient>>) -> Self {
        Self {
            pool,
            clients: clients.into(),
        }
    }

    pub fn pool(&self) -> &UpstreamPool {
        &self.pool
    }

    fn client_for(&self, upstream: &UpstreamDescriptor) -> Option<&Arc<dyn UpstreamClient>> {
        self.clients.iter().find(|client| client.supports(upstream))
    }
}

#[async_trait]
impl DnsResolver for PoolResolver {
    async fn resolve(&self, request: &Message) -> Result<Message, DomainError> {
        if self.pool.is_empty() {
            return Err(DomainError::ConfigError(
                "No upstream servers configured".to_string(),
            ));
        }

        let mut attempts = 0usize;
        let mut last_error: Option<DomainError> = None;

        for (index, upstream) in self.pool.iter().enumerate() {
            let Some(client) = self.client_for(upstream) else {
                debug!(upstream = %upstream, position = index, "No transport supports upstream, skipping");
                continue;
            };

            attempts += 1;
            match client.resolve(upstream, request).await {
                Ok(response) => {
                    debug!(
                        upstream = %upstream,
                        transport = client.name(),
                        position = index,
                        rcode = response.header.rcode,
                        "Upstream responded"
                    );
                    return Ok(response);
                }
                Err(e @ DomainError::Validation(_)) => return Err(e),
                Err(e) => {
                    warn!(upstream = %upstream, transport = client.name(), error = %e, position = index, "Failing over");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(last) => Err(DomainError::PoolExhausted {
                attempts,
                last: Box::new(last),
            }),
            None => Err(DomainError::NoEligibleTransport {
                upstreams: self.pool.len(),
            }),
        }
    }
}
