#![allow(dead_code)]
use async_trait::async_trait;
use dohgate_domain::{DomainError, Message, UpstreamDescriptor};
use dohgate_infrastructure::dns::UpstreamClient;
use std::collections::HashMap;
use std::sync::Mutex;

/// Scripted client: answers per upstream address, records every call.
pub struct MockUpstreamClient {
    name: &'static str,
    schemes: Vec<Option<String>>,
    results: HashMap<String, Result<Message, DomainError>>,
    calls: Mutex<Vec<String>>,
}

impl MockUpstreamClient {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            schemes: Vec::new(),
            results: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Accept upstreams with this scheme (`None` = no scheme).
    pub fn supporting(mut self, scheme: Option<&str>) -> Self {
        self.schemes.push(scheme.map(str::to_string));
        self
    }

    pub fn respond(mut self, upstream: &str, response: Message) -> Self {
        self.results.insert(upstream.to_string(), Ok(response));
        self
    }

    pub fn fail(mut self, upstream: &str, error: DomainError) -> Self {
        self.results.insert(upstream.to_string(), Err(error));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamClient for MockUpstreamClient {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supports(&self, upstream: &UpstreamDescriptor) -> bool {
        let scheme = upstream.scheme().map(str::to_string);
        self.schemes.contains(&scheme)
    }

    async fn resolve(
        &self,
        upstream: &UpstreamDescriptor,
        request: &Message,
    ) -> Result<Message, DomainError> {
        self.calls.lock().unwrap().push(upstream.address().to_string());
        match self.results.get(upstream.address()) {
            Some(Ok(response)) => {
                let mut response = response.clone();
                response.header.id = request.header.id;
                Ok(response)
            }
            Some(Err(e)) => Err(e.clone()),
            None => Err(DomainError::ClientRequestFailed {
                upstream: upstream.to_string(),
                reason: "no scripted result".to_string(),
            }),
        }
    }
}
