use anyhow::Context;
use dohgate_domain::{CliOverrides, Config};
use std::net::{IpAddr, SocketAddr};

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

pub fn socket_addr(bind_address: &str, port: u16) -> anyhow::Result<SocketAddr> {
    let ip: IpAddr = bind_address
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", bind_address))?;
    Ok(SocketAddr::new(ip, port))
}
