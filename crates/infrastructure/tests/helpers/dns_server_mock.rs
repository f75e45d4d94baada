#![allow(dead_code)]
use dohgate_domain::{Message, RData, ResourceRecord};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy)]
pub enum MockBehavior {
    /// Echo the question with one A record.
    Answer(Ipv4Addr),
    /// Valid answer carrying the wrong transaction id.
    WrongId,
    /// Two bytes that cannot be a DNS message.
    Garbage,
    /// Never reply.
    Silent,
}

/// Loopback UDP DNS server on an ephemeral port.
pub struct MockDnsServer {
    addr: SocketAddr,
    queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> Self {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = socket.local_addr().unwrap();
        let queries = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let counter = Arc::clone(&queries);
        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            counter.fetch_add(1, Ordering::SeqCst);
                            if let Some(response) = Self::build_response(&buf[..len], behavior) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Self {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Upstream address in `host:port` form.
    pub fn upstream(&self) -> String {
        self.addr.to_string()
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn build_response(query: &[u8], behavior: MockBehavior) -> Option<Vec<u8>> {
        let answer = match behavior {
            MockBehavior::Silent => return None,
            MockBehavior::Garbage => return Some(vec![0xde, 0xad]),
            MockBehavior::Answer(addr) => addr,
            MockBehavior::WrongId => Ipv4Addr::LOCALHOST,
        };

        let request = Message::from_wire(query).ok()?;
        let mut response = Message::response_to(&request);
        response.header.recursion_available = true;
        if let Some(question) = request.first_question() {
            response.answers.push(ResourceRecord::new(
                question.qname.clone(),
                60,
                RData::A(answer),
            ));
        }
        if matches!(behavior, MockBehavior::WrongId) {
            response.header.id = request.header.id.wrapping_add(1);
        }
        response.to_wire().ok()
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
