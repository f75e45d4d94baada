use dohgate_application::use_cases::HandleDnsMessageUseCase;
use dohgate_domain::dns_message::rcode;
use dohgate_domain::{wire, DomainError, Header, Message};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Answers classic wire-format datagrams through the shared use case.
pub struct DnsServerHandler {
    use_case: Arc<HandleDnsMessageUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsMessageUseCase>) -> Self {
        Self { use_case }
    }

    /// Returns the datagram to send back, or `None` when the input is too
    /// short to even carry a transaction id.
    pub async fn handle_raw(&self, packet: &[u8], client: SocketAddr) -> Option<Vec<u8>> {
        let request = match Message::from_wire(packet) {
            Ok(message) => message,
            Err(e) => {
                let id = wire::peek_id(packet)?;
                debug!(client = %client, error = %e, "Undecodable DNS query");
                return encode(&format_error(id));
            }
        };

        if let Some(question) = request.first_question() {
            debug!(client = %client, qname = %question.qname, qtype = %question.record_type(), "DNS query received");
        }

        let response = match self.use_case.execute(&request).await {
            Ok(response) => response,
            Err(e @ DomainError::Validation(_)) => {
                warn!(client = %client, error = %e, "Rejected DNS query");
                Message::error_response(&request, rcode::FORMAT_ERROR)
            }
            Err(e) => {
                error!(client = %client, error = %e, "Query resolution failed");
                Message::error_response(&request, rcode::SERVER_FAILURE)
            }
        };

        encode(&response).or_else(|| {
            // Upstream answer could not be re-encoded; fall back to SERVFAIL.
            encode(&Message::error_response(&request, rcode::SERVER_FAILURE))
        })
    }
}

fn format_error(id: u16) -> Message {
    Message::new(Header {
        id,
        response: true,
        rcode: rcode::FORMAT_ERROR,
        ..Header::default()
    })
}

fn encode(message: &Message) -> Option<Vec<u8>> {
    match message.to_wire() {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            error!(error = %e, "Failed to encode DNS response");
            None
        }
    }
}
