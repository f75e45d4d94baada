use super::HEADER_LEN;
use crate::dns_message::{Message, Name, Question, RData, RecordType, ResourceRecord, MAX_NAME_WIRE_LEN};
use crate::errors::DomainError;
use rustc_hash::FxHashMap;

/// Largest offset a 14-bit compression pointer can address.
const MAX_POINTER_OFFSET: usize = 0x3FFF;

pub fn encode(message: &Message) -> Result<Vec<u8>, DomainError> {
    let mut encoder = Encoder::with_capacity(512);
    encoder.write_header(message)?;
    for question in &message.questions {
        encoder.write_question(question)?;
    }
    for record in message
        .answers
        .iter()
        .chain(&message.authorities)
        .chain(&message.additionals)
    {
        encoder.write_record(record)?;
    }
    Ok(encoder.buf)
}

fn section_count(len: usize, section: &str) -> Result<u16, DomainError> {
    u16::try_from(len).map_err(|_| {
        DomainError::malformed(format!(
            "{} section has {} entries, the limit is 65535",
            section, len
        ))
    })
}

struct Encoder {
    buf: Vec<u8>,
    /// Label suffix -> offset of its first occurrence.
    suffixes: FxHashMap<Vec<Vec<u8>>, u16>,
}

impl Encoder {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity.max(HEADER_LEN)),
            suffixes: FxHashMap::default(),
        }
    }

    fn put_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    fn write_header(&mut self, message: &Message) -> Result<(), DomainError> {
        let counts = message.counts();
        let qdcount = section_count(counts.questions, "question")?;
        let ancount = section_count(counts.answers, "answer")?;
        let nscount = section_count(counts.authorities, "authority")?;
        let arcount = section_count(counts.additionals, "additional")?;

        self.put_u16(message.header.id);
        self.put_u16(message.header.flags());
        self.put_u16(qdcount);
        self.put_u16(ancount);
        self.put_u16(nscount);
        self.put_u16(arcount);
        Ok(())
    }

    fn write_question(&mut self, question: &Question) -> Result<(), DomainError> {
        self.write_name(&question.qname, true)?;
        self.put_u16(question.qtype);
        self.put_u16(question.qclass);
        Ok(())
    }

    fn write_record(&mut self, record: &ResourceRecord) -> Result<(), DomainError> {
        self.write_name(&record.name, true)?;
        self.put_u16(record.rtype);
        self.put_u16(record.class);
        self.put_u32(record.ttl as u32);

        let length_at = self.buf.len();
        self.put_u16(0);
        let compress = RecordType::from_u16(record.rtype).has_compressible_rdata();
        self.write_rdata(&record.rdata, compress)?;

        let rdlength = self.buf.len() - length_at - 2;
        let rdlength = u16::try_from(rdlength).map_err(|_| {
            DomainError::malformed(format!(
                "record data of {} octets exceeds the 65535 octet limit",
                rdlength
            ))
        })?;
        self.buf[length_at..length_at + 2].copy_from_slice(&rdlength.to_be_bytes());
        Ok(())
    }

    fn write_rdata(&mut self, rdata: &RData, compress: bool) -> Result<(), DomainError> {
        match rdata {
            RData::A(addr) => self.buf.extend_from_slice(&addr.octets()),
            RData::Aaaa(addr) => self.buf.extend_from_slice(&addr.octets()),
            RData::Cname(name) | RData::Ns(name) | RData::Ptr(name) => {
                self.write_name(name, compress)?
            }
            RData::Mx {
                preference,
                exchange,
            } => {
                self.put_u16(*preference);
                self.write_name(exchange, compress)?;
            }
            RData::Txt(strings) => {
                for string in strings {
                    let len = u8::try_from(string.len()).map_err(|_| {
                        DomainError::malformed(format!(
                            "TXT character-string of {} octets exceeds 255",
                            string.len()
                        ))
                    })?;
                    self.buf.push(len);
                    self.buf.extend_from_slice(string);
                }
            }
            RData::Soa(soa) => {
                self.write_name(&soa.mname, compress)?;
                self.write_name(&soa.rname, compress)?;
                for value in [soa.serial, soa.refresh, soa.retry, soa.expire, soa.minimum] {
                    self.put_u32(value);
                }
            }
            RData::Unknown(data) => self.buf.extend_from_slice(data),
        }
        Ok(())
    }

    fn write_name(&mut self, name: &Name, compress: bool) -> Result<(), DomainError> {
        if name.wire_len() > MAX_NAME_WIRE_LEN {
            return Err(DomainError::malformed(format!(
                "domain name '{}' is {} octets on the wire, the limit is {}",
                name,
                name.wire_len(),
                MAX_NAME_WIRE_LEN
            )));
        }

        let labels = name.labels();
        for index in 0..labels.len() {
            let suffix = &labels[index..];
            if compress {
                if let Some(&offset) = self.suffixes.get(suffix) {
                    self.put_u16(0xC000 | offset);
                    return Ok(());
                }
            }

            let offset = self.buf.len();
            if offset <= MAX_POINTER_OFFSET && !self.suffixes.contains_key(suffix) {
                self.suffixes.insert(suffix.to_vec(), offset as u16);
            }
            let label = &labels[index];
            // Name guarantees 1..=63 octets per label.
            self.buf.push(label.len() as u8);
            self.buf.extend_from_slice(label);
        }
        self.buf.push(0);
        Ok(())
    }
}
