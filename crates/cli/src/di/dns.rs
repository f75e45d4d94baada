use dohgate_application::use_cases::HandleDnsMessageUseCase;
use dohgate_domain::Config;
use dohgate_infrastructure::dns::{create_clients, PoolResolver};
use std::sync::Arc;
use tracing::info;

/// Services shared by the DoH and classic DNS front ends. Built once, never mutated.
pub struct DnsServices {
    pub resolver: Arc<PoolResolver>,
    pub use_case: Arc<HandleDnsMessageUseCase>,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let pool = config.upstream.pool()?;
        for (position, upstream) in pool.iter().enumerate() {
            info!(position, upstream = %upstream, "Configured upstream");
        }

        let clients = create_clients(&config.upstream)?;
        info!(
            transports = ?clients.iter().map(|c| c.name()).collect::<Vec<_>>(),
            timeout_secs = config.upstream.query_timeout,
            "Initializing upstream transports"
        );

        let resolver = Arc::new(PoolResolver::new(pool, clients));
        let use_case = Arc::new(HandleDnsMessageUseCase::new(resolver.clone()));

        Ok(Self { resolver, use_case })
    }
}
