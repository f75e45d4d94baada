use async_trait::async_trait;
use dohgate_domain::{DomainError, Message};

#[async_trait]
pub trait DnsResolver: Send + Sync {
    /// Resolves a complete query message into a response message.
    ///
    /// A `DomainError::Validation` must be returned before any network I/O.
    async fn resolve(&self, request: &Message) -> Result<Message, DomainError>;
}
