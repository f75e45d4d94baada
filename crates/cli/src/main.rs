use clap::Parser;
use dohgate_api::AppState;
use dohgate_domain::CliOverrides;
use dohgate_infrastructure::dns::DnsServerHandler;
use std::net::SocketAddr;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[derive(Parser, Debug)]
#[command(name = "dohgate")]
#[command(version)]
#[command(about = "dohgate - DNS-over-HTTPS gateway with ordered upstream failover")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Web (DoH) server port
    #[arg(short = 'w', long)]
    web_port: Option<u16>,

    /// Classic DNS (UDP) listener port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Upstream server, repeatable; replaces the configured list
    #[arg(short = 'u', long = "upstream", value_name = "UPSTREAM")]
    upstreams: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            bind_address: self.bind.clone(),
            web_port: self.web_port,
            dns_port: self.dns_port,
            upstreams: self.upstreams.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(cli.config.as_deref(), cli.overrides())?;

    bootstrap::init_logging(&config)?;

    info!("Starting dohgate v{}", env!("CARGO_PKG_VERSION"));

    let services = di::DnsServices::new(&config)?;
    info!(
        upstreams = services.resolver.pool().len(),
        "Upstream pool ready"
    );

    let dns_task = match config.server.dns_port {
        Some(port) => {
            let dns_addr = bootstrap::socket_addr(&config.server.bind_address, port)?;
            let handler = DnsServerHandler::new(services.use_case.clone());
            Some(tokio::spawn(async move {
                if let Err(e) = server::start_dns_server(dns_addr, handler).await {
                    error!(error = %e, "DNS server error");
                }
            }))
        }
        None => None,
    };

    let web_addr: SocketAddr =
        bootstrap::socket_addr(&config.server.bind_address, config.server.web_port)?;
    let app_state = AppState::new(services.use_case.clone());

    server::start_web_server(web_addr, app_state, &config.server.doh_path).await?;

    if let Some(task) = dns_task {
        task.abort();
    }

    info!("Server shutdown complete");
    Ok(())
}
