#![allow(dead_code)]
use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use dohgate_api::{create_api_routes, AppState, DNS_MESSAGE_CONTENT_TYPE};
use dohgate_application::{ports::DnsResolver, use_cases::HandleDnsMessageUseCase};
use dohgate_domain::{DomainError, Message, Name, Question, RData, RecordType, ResourceRecord};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const DOH_PATH: &str = "/dns-query";

/// Resolver that answers every query the same way.
pub struct StubResolver {
    outcome: Outcome,
    calls: AtomicUsize,
}

enum Outcome {
    Answer { ttl: i32, addr: Ipv4Addr },
    Fail(DomainError),
}

impl StubResolver {
    pub fn answering(addr: Ipv4Addr, ttl: i32) -> Arc<Self> {
        Arc::new(Self {
            outcome: Outcome::Answer { ttl, addr },
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(error: DomainError) -> Arc<Self> {
        Arc::new(Self {
            outcome: Outcome::Fail(error),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsResolver for StubResolver {
    async fn resolve(&self, request: &Message) -> Result<Message, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Outcome::Answer { ttl, addr } => {
                let mut response = Message::response_to(request);
                // Upstreams pick their own ids; the use case restores ours.
                response.header.id = request.header.id.wrapping_add(1);
                response.header.recursion_available = true;
                if let Some(question) = request.first_question() {
                    response.answers.push(ResourceRecord::new(
                        question.qname.clone(),
                        *ttl,
                        RData::A(*addr),
                    ));
                }
                Ok(response)
            }
            Outcome::Fail(error) => Err(error.clone()),
        }
    }
}

pub fn app(resolver: Arc<dyn DnsResolver>) -> Router {
    app_at(resolver, DOH_PATH)
}

pub fn app_at(resolver: Arc<dyn DnsResolver>, doh_path: &str) -> Router {
    let use_case = Arc::new(HandleDnsMessageUseCase::new(resolver));
    create_api_routes(AppState::new(use_case), doh_path)
}

pub fn query(id: u16, qname: &str, record_type: RecordType) -> Message {
    let name: Name = qname.parse().unwrap();
    Message::query(id, Question::internet(name, record_type))
}

pub fn post_request(path: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", DNS_MESSAGE_CONTENT_TYPE)
        .body(Body::from(body))
        .unwrap()
}

pub fn get_request(path: &str, encoded: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(format!("{}?dns={}", path, encoded))
        .body(Body::empty())
        .unwrap()
}
