mod dns_server_mock;
mod http_server_mock;
mod mock_clients;

pub use dns_server_mock::{MockBehavior, MockDnsServer};
pub use http_server_mock::{closed_port_url, MockHttpServer};
pub use mock_clients::MockUpstreamClient;
