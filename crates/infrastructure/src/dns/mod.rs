pub mod json_mapper;
pub mod resolver;
pub mod server;
pub mod transport;

pub use resolver::PoolResolver;
pub use server::DnsServerHandler;
pub use transport::{
    create_clients, HttpsClient, JsonApiClient, UdpClient, UpstreamClient,
    DNS_MESSAGE_CONTENT_TYPE,
};
