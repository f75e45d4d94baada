//! dohgate domain layer
//!
//! DNS message model, the RFC 1035 wire codec, upstream descriptors and the
//! configuration types. Nothing in this crate performs I/O.
pub mod config;
pub mod dns_message;
pub mod errors;
pub mod upstream;
pub mod validation;
pub mod wire;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_message::{
    Header, Message, Name, Question, RData, RecordType, ResourceRecord, SectionCounts, Soa,
    CLASS_IN,
};
pub use errors::DomainError;
pub use upstream::{UpstreamDescriptor, UpstreamPool};
pub use wire::DNS_MESSAGE_CONTENT_TYPE;
