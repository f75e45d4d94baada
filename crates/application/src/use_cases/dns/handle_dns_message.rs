use crate::ports::DnsResolver;
use dohgate_domain::validation::validate_query;
use dohgate_domain::{DomainError, Message};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

pub struct HandleDnsMessageUseCase {
    resolver: Arc<dyn DnsResolver>,
}

impl HandleDnsMessageUseCase {
    pub fn new(resolver: Arc<dyn DnsResolver>) -> Self {
        Self { resolver }
    }

    /// Validates the query, resolves it and returns a response carrying the
    /// request's transaction id.
    pub async fn execute(&self, request: &Message) -> Result<Message, DomainError> {
        validate_query(request)?;

        let start = Instant::now();
        let mut response = self.resolver.resolve(request).await?;
        response.header.id = request.header.id;

        if let Some(question) = request.first_question() {
            debug!(
                qname = %question.qname,
                qtype = %question.record_type(),
                rcode = response.header.rcode,
                answers = response.answers.len(),
                elapsed_us = start.elapsed().as_micros() as u64,
                "Query resolved"
            );
        }

        Ok(response)
    }
}
