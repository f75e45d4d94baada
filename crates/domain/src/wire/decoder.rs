use super::{HEADER_LEN, MAX_POINTER_HOPS};
use crate::dns_message::{
    Header, Message, Name, Question, RData, RecordType, ResourceRecord, Soa, MAX_NAME_WIRE_LEN,
};
use crate::errors::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr};

pub fn decode(bytes: &[u8]) -> Result<Message, DomainError> {
    if bytes.len() < HEADER_LEN {
        return Err(DomainError::malformed(format!(
            "message is {} bytes long, shorter than the {} byte header",
            bytes.len(),
            HEADER_LEN
        )));
    }

    let mut decoder = Decoder { buf: bytes, pos: 0 };
    let id = decoder.read_u16("header")?;
    let flags = decoder.read_u16("header")?;
    let qdcount = decoder.read_u16("header")?;
    let ancount = decoder.read_u16("header")?;
    let nscount = decoder.read_u16("header")?;
    let arcount = decoder.read_u16("header")?;

    let mut questions = Vec::new();
    for _ in 0..qdcount {
        questions.push(decoder.read_question()?);
    }
    let answers = decoder.read_records(ancount)?;
    let authorities = decoder.read_records(nscount)?;
    let additionals = decoder.read_records(arcount)?;

    if decoder.pos != bytes.len() {
        return Err(DomainError::malformed(format!(
            "{} trailing bytes after the last record",
            bytes.len() - decoder.pos
        )));
    }

    Ok(Message {
        header: Header::from_flags(id, flags),
        questions,
        answers,
        authorities,
        additionals,
    })
}

struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn read_bytes(&mut self, len: usize, what: &str) -> Result<&'a [u8], DomainError> {
        if len > self.remaining() {
            return Err(DomainError::malformed(format!(
                "unexpected end of message while reading {}",
                what
            )));
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn read_u8(&mut self, what: &str) -> Result<u8, DomainError> {
        Ok(self.read_bytes(1, what)?[0])
    }

    fn read_u16(&mut self, what: &str) -> Result<u16, DomainError> {
        let bytes = self.read_bytes(2, what)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn read_u32(&mut self, what: &str) -> Result<u32, DomainError> {
        let bytes = self.read_bytes(4, what)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_question(&mut self) -> Result<Question, DomainError> {
        let qname = self.read_name()?;
        let qtype = self.read_u16("question type")?;
        let qclass = self.read_u16("question class")?;
        Ok(Question::new(qname, qtype, qclass))
    }

    fn read_records(&mut self, count: u16) -> Result<Vec<ResourceRecord>, DomainError> {
        let mut records = Vec::new();
        for _ in 0..count {
            records.push(self.read_record()?);
        }
        Ok(records)
    }

    fn read_record(&mut self) -> Result<ResourceRecord, DomainError> {
        let name = self.read_name()?;
        let rtype = self.read_u16("record type")?;
        let class = self.read_u16("record class")?;
        let ttl = self.read_u32("record TTL")? as i32;
        let rdlength = usize::from(self.read_u16("record data length")?);
        if rdlength > self.remaining() {
            return Err(DomainError::malformed(format!(
                "record data length {} exceeds the {} remaining bytes",
                rdlength,
                self.remaining()
            )));
        }
        let rdata = self.read_rdata(rtype, rdlength)?;
        Ok(ResourceRecord {
            name,
            rtype,
            class,
            ttl,
            rdata,
        })
    }

    fn read_rdata(&mut self, rtype: u16, rdlength: usize) -> Result<RData, DomainError> {
        let record_type = RecordType::from_u16(rtype);
        let end = self.pos + rdlength;

        let rdata = match record_type {
            RecordType::A => {
                expect_length(record_type, rdlength, 4)?;
                let b = self.read_bytes(4, "A record")?;
                RData::A(Ipv4Addr::new(b[0], b[1], b[2], b[3]))
            }
            RecordType::AAAA => {
                expect_length(record_type, rdlength, 16)?;
                let mut octets = [0u8; 16];
                octets.copy_from_slice(self.read_bytes(16, "AAAA record")?);
                RData::Aaaa(Ipv6Addr::from(octets))
            }
            RecordType::CNAME => RData::Cname(self.read_name()?),
            RecordType::NS => RData::Ns(self.read_name()?),
            RecordType::PTR => RData::Ptr(self.read_name()?),
            RecordType::MX => RData::Mx {
                preference: self.read_u16("MX preference")?,
                exchange: self.read_name()?,
            },
            RecordType::TXT => {
                let mut strings = Vec::new();
                while self.pos < end {
                    let len = usize::from(self.read_u8("TXT string length")?);
                    strings.push(self.read_bytes(len, "TXT string")?.to_vec());
                }
                RData::Txt(strings)
            }
            RecordType::SOA => RData::Soa(Soa {
                mname: self.read_name()?,
                rname: self.read_name()?,
                serial: self.read_u32("SOA serial")?,
                refresh: self.read_u32("SOA refresh")?,
                retry: self.read_u32("SOA retry")?,
                expire: self.read_u32("SOA expire")?,
                minimum: self.read_u32("SOA minimum")?,
            }),
            _ => RData::Unknown(self.read_bytes(rdlength, "record data")?.to_vec()),
        };

        if self.pos != end {
            return Err(DomainError::malformed(format!(
                "{} record data does not match its declared length {}",
                record_type, rdlength
            )));
        }
        Ok(rdata)
    }

    /// Reads a possibly compressed name starting at the cursor.
    ///
    /// Every pointer must land strictly before the previous jump target (or
    /// before the name itself for the first jump), which rules out loops.
    fn read_name(&mut self) -> Result<Name, DomainError> {
        let mut labels: Vec<Vec<u8>> = Vec::new();
        let mut wire_len = 1usize;
        let mut cursor = self.pos;
        let mut resume_at = None;
        let mut last_target = self.pos;
        let mut hops = 0usize;

        loop {
            let len_byte = *self.buf.get(cursor).ok_or_else(|| {
                DomainError::malformed("domain name runs past the end of the message")
            })?;

            match len_byte & 0xC0 {
                0x00 => {
                    let len = usize::from(len_byte);
                    if len == 0 {
                        cursor += 1;
                        break;
                    }
                    wire_len += len + 1;
                    if wire_len > MAX_NAME_WIRE_LEN {
                        return Err(DomainError::malformed(format!(
                            "domain name exceeds {} octets",
                            MAX_NAME_WIRE_LEN
                        )));
                    }
                    let label = self.buf.get(cursor + 1..cursor + 1 + len).ok_or_else(|| {
                        DomainError::malformed("domain name label runs past the end of the message")
                    })?;
                    labels.push(label.to_vec());
                    cursor += 1 + len;
                }
                0xC0 => {
                    let low = *self.buf.get(cursor + 1).ok_or_else(|| {
                        DomainError::malformed("truncated compression pointer")
                    })?;
                    let target = (usize::from(len_byte & 0x3F) << 8) | usize::from(low);

                    hops += 1;
                    if hops > MAX_POINTER_HOPS {
                        return Err(DomainError::malformed(format!(
                            "more than {} compression pointers in one name",
                            MAX_POINTER_HOPS
                        )));
                    }
                    if target < HEADER_LEN {
                        return Err(DomainError::malformed(format!(
                            "compression pointer to offset {} lands inside the header",
                            target
                        )));
                    }
                    if target >= last_target {
                        return Err(DomainError::malformed(format!(
                            "compression pointer to offset {} does not point backwards",
                            target
                        )));
                    }

                    if resume_at.is_none() {
                        resume_at = Some(cursor + 2);
                    }
                    last_target = target;
                    cursor = target;
                }
                _ => {
                    return Err(DomainError::malformed(format!(
                        "unsupported label type 0x{:02x}",
                        len_byte & 0xC0
                    )))
                }
            }
        }

        self.pos = resume_at.unwrap_or(cursor);
        Name::from_labels(labels).map_err(|e| DomainError::malformed(e.to_string()))
    }
}

fn expect_length(record_type: RecordType, actual: usize, expected: usize) -> Result<(), DomainError> {
    if actual != expected {
        return Err(DomainError::malformed(format!(
            "{} record data must be {} octets, got {}",
            record_type, expected, actual
        )));
    }
    Ok(())
}
