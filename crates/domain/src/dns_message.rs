mod header;
mod name;
mod question;
mod record;
mod record_type;

pub use header::{rcode, Header};
pub use name::{Name, MAX_LABEL_LEN, MAX_NAME_WIRE_LEN};
pub use question::Question;
pub use record::{RData, ResourceRecord, Soa};
pub use record_type::RecordType;

use crate::errors::DomainError;
use crate::wire;

pub const CLASS_IN: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionCounts {
    pub questions: usize,
    pub answers: usize,
    pub authorities: usize,
    pub additionals: usize,
}

/// A DNS message: header plus the four ordered sections.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl Message {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            ..Self::default()
        }
    }

    /// Recursive query for a single question.
    pub fn query(id: u16, question: Question) -> Self {
        Self::new(Header::query(id)).with_question(question)
    }

    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    pub fn with_answer(mut self, record: ResourceRecord) -> Self {
        self.answers.push(record);
        self
    }

    pub fn with_authority(mut self, record: ResourceRecord) -> Self {
        self.authorities.push(record);
        self
    }

    pub fn with_additional(mut self, record: ResourceRecord) -> Self {
        self.additionals.push(record);
        self
    }

    pub fn counts(&self) -> SectionCounts {
        SectionCounts {
            questions: self.questions.len(),
            answers: self.answers.len(),
            authorities: self.authorities.len(),
            additionals: self.additionals.len(),
        }
    }

    pub fn first_question(&self) -> Option<&Question> {
        self.questions.first()
    }

    /// Empty response skeleton for `request`: same id, opcode, RD/CD bits and
    /// question section, QR set.
    pub fn response_to(request: &Message) -> Self {
        let header = Header {
            id: request.header.id,
            response: true,
            opcode: request.header.opcode,
            recursion_desired: request.header.recursion_desired,
            checking_disabled: request.header.checking_disabled,
            ..Header::default()
        };
        Self {
            header,
            questions: request.questions.clone(),
            ..Self::default()
        }
    }

    pub fn error_response(request: &Message, rcode: u8) -> Self {
        let mut response = Self::response_to(request);
        response.header.rcode = rcode;
        response
    }

    /// Smallest TTL in the answer section, negative TTLs counted as zero.
    pub fn min_answer_ttl(&self) -> Option<u32> {
        self.answers
            .iter()
            .map(|record| record.ttl.max(0) as u32)
            .min()
    }

    pub fn to_wire(&self) -> Result<Vec<u8>, DomainError> {
        wire::encode(self)
    }

    pub fn from_wire(bytes: &[u8]) -> Result<Self, DomainError> {
        wire::decode(bytes)
    }
}
