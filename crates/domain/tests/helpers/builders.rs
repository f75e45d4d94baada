#![allow(dead_code)]
use dohgate_domain::{
    Header, Message, Name, Question, RData, RecordType, ResourceRecord, Soa, CLASS_IN,
};
use std::net::{Ipv4Addr, Ipv6Addr};

pub fn name(s: &str) -> Name {
    s.parse().unwrap()
}

pub fn query(id: u16, qname: &str, record_type: RecordType) -> Message {
    Message::query(id, Question::internet(name(qname), record_type))
}

/// Name whose presentation form is exactly `len` characters long.
pub fn name_of_text_len(len: usize) -> Name {
    let mut labels = Vec::new();
    let mut remaining = len;
    while remaining > 0 {
        let label_len = remaining.min(63);
        labels.push(vec![b'a'; label_len]);
        remaining -= label_len;
        // separator
        remaining = remaining.saturating_sub(1);
    }
    Name::from_labels(labels).unwrap()
}

pub struct ResponseBuilder {
    message: Message,
}

impl ResponseBuilder {
    pub fn new(id: u16, qname: &str, record_type: RecordType) -> Self {
        let request = query(id, qname, record_type);
        let mut message = Message::response_to(&request);
        message.header.recursion_available = true;
        Self { message }
    }

    pub fn rcode(mut self, rcode: u8) -> Self {
        self.message.header.rcode = rcode;
        self
    }

    pub fn a(mut self, owner: &str, ttl: i32, addr: [u8; 4]) -> Self {
        self.message.answers.push(ResourceRecord::new(
            name(owner),
            ttl,
            RData::A(Ipv4Addr::from(addr)),
        ));
        self
    }

    pub fn cname(mut self, owner: &str, ttl: i32, target: &str) -> Self {
        self.message
            .answers
            .push(ResourceRecord::new(name(owner), ttl, RData::Cname(name(target))));
        self
    }

    pub fn authority_soa(mut self, zone: &str, ttl: i32) -> Self {
        self.message.authorities.push(ResourceRecord::new(
            name(zone),
            ttl,
            RData::Soa(Soa {
                mname: name(&format!("ns1.{}", zone)),
                rname: name(&format!("hostmaster.{}", zone)),
                serial: 2024010101,
                refresh: 7200,
                retry: 3600,
                expire: 1209600,
                minimum: 300,
            }),
        ));
        self
    }

    pub fn build(self) -> Message {
        self.message
    }
}

/// A response touching every record data variant and most header bits.
pub fn kitchen_sink_response() -> Message {
    let mut header = Header::from_flags(0xBEEF, 0);
    header.response = true;
    header.opcode = 2;
    header.authoritative = true;
    header.recursion_desired = true;
    header.recursion_available = true;
    header.z = true;
    header.authentic_data = true;
    header.checking_disabled = true;
    header.rcode = 3;

    Message::new(header)
        .with_question(Question::internet(name("www.example.com"), RecordType::ANY))
        .with_answer(ResourceRecord::new(
            name("www.example.com"),
            300,
            RData::Cname(name("web.example.com")),
        ))
        .with_answer(ResourceRecord::new(
            name("web.example.com"),
            60,
            RData::A(Ipv4Addr::new(192, 0, 2, 10)),
        ))
        .with_answer(ResourceRecord::new(
            name("web.example.com"),
            60,
            RData::Aaaa(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 0x10)),
        ))
        .with_answer(ResourceRecord::new(
            name("example.com"),
            3600,
            RData::Mx {
                preference: 10,
                exchange: name("mail.example.com"),
            },
        ))
        .with_answer(ResourceRecord::new(
            name("example.com"),
            3600,
            RData::Txt(vec![b"v=spf1 -all".to_vec(), Vec::new(), vec![0, 255, 7]]),
        ))
        .with_answer(ResourceRecord::raw(
            name("_sip._udp.example.com"),
            RecordType::SRV.to_u16(),
            CLASS_IN,
            120,
            vec![0, 10, 0, 5, 0x13, 0xC4, 3, b's', b'i', b'p', 0],
        ))
        .with_authority(ResourceRecord::new(
            name("example.com"),
            86400,
            RData::Ns(name("ns1.example.com")),
        ))
        .with_authority(ResourceRecord::new(
            name("example.com"),
            -1,
            RData::Soa(Soa {
                mname: name("ns1.example.com"),
                rname: name("hostmaster.example.com"),
                serial: 1,
                refresh: 2,
                retry: 3,
                expire: 4,
                minimum: 5,
            }),
        ))
        .with_additional(ResourceRecord::new(
            name("10.2.0.192.in-addr.arpa"),
            30,
            RData::Ptr(name("web.example.com")),
        ))
        .with_additional(ResourceRecord::raw(Name::root(), 41, 4096, 0, Vec::new()))
}
