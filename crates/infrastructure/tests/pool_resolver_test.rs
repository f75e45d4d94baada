mod helpers;

use dohgate_application::ports::DnsResolver;
use dohgate_domain::{
    DomainError, Message, Question, RData, RecordType, ResourceRecord, UpstreamPool,
};
use dohgate_infrastructure::dns::{PoolResolver, UpstreamClient};
use helpers::MockUpstreamClient;
use std::net::Ipv4Addr;
use std::sync::Arc;

fn request() -> Message {
    Message::query(0x2a2a, Question::internet("example.com".parse().unwrap(), RecordType::A))
}

fn answer(last_octet: u8) -> Message {
    let mut response = Message::response_to(&request());
    response.answers.push(ResourceRecord::new(
        "example.com".parse().unwrap(),
        60,
        RData::A(Ipv4Addr::new(192, 0, 2, last_octet)),
    ));
    response
}

fn send_failure(upstream: &str) -> DomainError {
    DomainError::ClientRequestFailed {
        upstream: upstream.to_string(),
        reason: "connection refused".to_string(),
    }
}

fn resolver(servers: &[&str], clients: Vec<Arc<MockUpstreamClient>>) -> PoolResolver {
    let pool = UpstreamPool::from_addresses(servers).unwrap();
    let clients = clients
        .into_iter()
        .map(|c| c as Arc<dyn UpstreamClient>)
        .collect();
    PoolResolver::new(pool, clients)
}

#[tokio::test]
async fn test_first_upstream_answers() {
    let client = Arc::new(
        MockUpstreamClient::new("udp")
            .supporting(None)
            .respond("10.0.0.1:53", answer(1))
            .respond("10.0.0.2:53", answer(2)),
    );
    let resolver = resolver(&["10.0.0.1:53", "10.0.0.2:53"], vec![client.clone()]);

    let response = resolver.resolve(&request()).await.unwrap();

    assert_eq!(response.answers[0].rdata, RData::A(Ipv4Addr::new(192, 0, 2, 1)));
    assert_eq!(client.calls(), vec!["10.0.0.1:53"]);
}

#[tokio::test]
async fn test_fails_over_to_next_upstream() {
    let client = Arc::new(
        MockUpstreamClient::new("udp")
            .supporting(None)
            .fail("10.0.0.1:53", send_failure("10.0.0.1:53"))
            .respond("10.0.0.2:53", answer(2)),
    );
    let resolver = resolver(&["10.0.0.1:53", "10.0.0.2:53"], vec![client.clone()]);

    let response = resolver.resolve(&request()).await.unwrap();

    assert_eq!(response.answers[0].rdata, RData::A(Ipv4Addr::new(192, 0, 2, 2)));
    assert_eq!(response.header.id, 0x2a2a);
    assert_eq!(client.calls(), vec!["10.0.0.1:53", "10.0.0.2:53"]);
}

#[tokio::test]
async fn test_exhausted_pool_reports_last_error() {
    let timeout = DomainError::TransportTimeout {
        server: "10.0.0.2:53".to_string(),
    };
    let client = Arc::new(
        MockUpstreamClient::new("udp")
            .supporting(None)
            .fail("10.0.0.1:53", send_failure("10.0.0.1:53"))
            .fail("10.0.0.2:53", timeout.clone()),
    );
    let resolver = resolver(&["10.0.0.1:53", "10.0.0.2:53"], vec![client]);

    let result = resolver.resolve(&request()).await;

    match result {
        Err(DomainError::PoolExhausted { attempts, last }) => {
            assert_eq!(attempts, 2);
            assert_eq!(*last, timeout);
        }
        other => panic!("expected PoolExhausted, got {:?}", other),
    }
}

#[tokio::test]
async fn test_mapping_failure_also_fails_over() {
    let client = Arc::new(
        MockUpstreamClient::new("https")
            .supporting(Some("https"))
            .fail(
                "https://a.example/dns-query",
                DomainError::ResponseMappingFailed {
                    upstream: "https://a.example/dns-query".to_string(),
                    reason: "truncated".to_string(),
                },
            )
            .respond("https://b.example/dns-query", answer(7)),
    );
    let resolver = resolver(
        &["https://a.example/dns-query", "https://b.example/dns-query"],
        vec![client],
    );

    assert!(resolver.resolve(&request()).await.is_ok());
}

#[tokio::test]
async fn test_validation_error_is_not_failed_over() {
    let client = Arc::new(
        MockUpstreamClient::new("json")
            .supporting(None)
            .fail(
                "10.0.0.1:53",
                DomainError::Validation("Query type must be in range [1, 65535]".to_string()),
            )
            .respond("10.0.0.2:53", answer(2)),
    );
    let resolver = resolver(&["10.0.0.1:53", "10.0.0.2:53"], vec![client.clone()]);

    let result = resolver.resolve(&request()).await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
    assert_eq!(client.calls(), vec!["10.0.0.1:53"]);
}

#[tokio::test]
async fn test_unsupported_upstreams_are_skipped() {
    let client = Arc::new(
        MockUpstreamClient::new("udp")
            .supporting(None)
            .respond("10.0.0.2:53", answer(2)),
    );
    let resolver = resolver(&["tcp://10.0.0.1:53", "10.0.0.2:53"], vec![client.clone()]);

    let response = resolver.resolve(&request()).await.unwrap();

    assert_eq!(response.answers.len(), 1);
    assert_eq!(client.calls(), vec!["10.0.0.2:53"]);
}

#[tokio::test]
async fn test_skipped_upstreams_are_not_counted_as_attempts() {
    let client = Arc::new(
        MockUpstreamClient::new("udp")
            .supporting(None)
            .fail("10.0.0.2:53", send_failure("10.0.0.2:53")),
    );
    let resolver = resolver(&["tcp://10.0.0.1:53", "10.0.0.2:53"], vec![client]);

    match resolver.resolve(&request()).await {
        Err(DomainError::PoolExhausted { attempts, .. }) => assert_eq!(attempts, 1),
        other => panic!("expected PoolExhausted, got {:?}", other),
    }
}

#[tokio::test]
async fn test_no_eligible_transport() {
    let client = Arc::new(MockUpstreamClient::new("udp").supporting(None));
    let resolver = resolver(&["tcp://10.0.0.1:53", "tls://10.0.0.2:853"], vec![client.clone()]);

    let result = resolver.resolve(&request()).await;

    assert_eq!(result, Err(DomainError::NoEligibleTransport { upstreams: 2 }));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_empty_pool_is_a_configuration_error() {
    let client = Arc::new(MockUpstreamClient::new("udp").supporting(None));
    let resolver = resolver(&[], vec![client]);

    assert!(matches!(
        resolver.resolve(&request()).await,
        Err(DomainError::ConfigError(_))
    ));
}

#[tokio::test]
async fn test_first_supporting_client_wins() {
    let json = Arc::new(
        MockUpstreamClient::new("json")
            .supporting(Some("https"))
            .respond("https://dns.google.com/resolve", answer(1)),
    );
    let doh = Arc::new(
        MockUpstreamClient::new("doh")
            .supporting(Some("https"))
            .respond("https://dns.google.com/resolve", answer(2)),
    );
    let resolver = resolver(&["https://dns.google.com/resolve"], vec![json.clone(), doh.clone()]);

    let response = resolver.resolve(&request()).await.unwrap();

    assert_eq!(response.answers[0].rdata, RData::A(Ipv4Addr::new(192, 0, 2, 1)));
    assert_eq!(json.calls().len(), 1);
    assert!(doh.calls().is_empty());
}
