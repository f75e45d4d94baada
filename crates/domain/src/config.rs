mod errors;
mod logging;
mod root;
mod server;
mod upstream;

pub use errors::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use root::{CliOverrides, Config, CONFIG_SEARCH_PATHS};
pub use server::ServerConfig;
pub use upstream::UpstreamConfig;
