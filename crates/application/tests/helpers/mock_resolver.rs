#![allow(dead_code)]
use async_trait::async_trait;
use dohgate_application::ports::DnsResolver;
use dohgate_domain::{DomainError, Message};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Answers from a table keyed by the first question's name.
pub struct MockDnsResolver {
    responses: Arc<RwLock<HashMap<String, Message>>>,
    errors: Arc<RwLock<HashMap<String, DomainError>>>,
    calls: AtomicUsize,
}

impl MockDnsResolver {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(HashMap::new())),
            errors: Arc::new(RwLock::new(HashMap::new())),
            calls: AtomicUsize::new(0),
        }
    }

    pub async fn set_response(&self, qname: &str, response: Message) {
        self.responses
            .write()
            .await
            .insert(qname.to_string(), response);
    }

    pub async fn set_error(&self, qname: &str, error: DomainError) {
        self.errors.write().await.insert(qname.to_string(), error);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockDnsResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DnsResolver for MockDnsResolver {
    async fn resolve(&self, request: &Message) -> Result<Message, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let qname = request
            .first_question()
            .map(|q| q.qname.to_string())
            .unwrap_or_default();

        if let Some(err) = self.errors.read().await.get(&qname).cloned() {
            return Err(err);
        }

        self.responses
            .read()
            .await
            .get(&qname)
            .cloned()
            .ok_or_else(|| DomainError::ClientRequestFailed {
                upstream: "mock".to_string(),
                reason: format!("No mock response for {}", qname),
            })
    }
}
