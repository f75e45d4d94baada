//! Maps Google DNS JSON API responses (`application/dns-json`) onto [`Message`].
//!
//! ```json
//! {"Status":0,"TC":false,"RD":true,"RA":true,"AD":false,"CD":false,
//!  "Question":[{"name":"example.com.","type":1}],
//!  "Answer":[{"name":"example.com.","type":1,"TTL":3600,"data":"93.184.216.34"}]}
//! ```

use dohgate_domain::validation::query_type_from;
use dohgate_domain::{
    Header, Message, Name, Question, RData, RecordType, ResourceRecord, Soa, CLASS_IN,
};
use serde::Deserialize;
use std::net::{Ipv4Addr, Ipv6Addr};
use tracing::debug;

const MAX_CHARACTER_STRING: usize = 255;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("response body is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Status {0} is not a DNS response code")]
    InvalidStatus(u32),

    #[error("invalid name '{0}'")]
    InvalidName(String),

    #[error("invalid record type {0}")]
    InvalidType(u32),

    #[error("invalid {rtype} data '{data}'")]
    InvalidData { rtype: RecordType, data: String },
}

#[derive(Debug, Deserialize)]
pub struct JsonResponse {
    #[serde(rename = "Status")]
    pub status: u32,
    #[serde(rename = "TC", default)]
    pub truncated: bool,
    #[serde(rename = "RD", default)]
    pub recursion_desired: bool,
    #[serde(rename = "RA", default)]
    pub recursion_available: bool,
    #[serde(rename = "AD", default)]
    pub authentic_data: bool,
    #[serde(rename = "CD", default)]
    pub checking_disabled: bool,
    #[serde(rename = "Question", default)]
    pub question: Vec<JsonQuestion>,
    #[serde(rename = "Answer", default)]
    pub answer: Vec<JsonRecord>,
    #[serde(rename = "Authority", default)]
    pub authority: Vec<JsonRecord>,
    #[serde(rename = "Additional", default)]
    pub additional: Vec<JsonRecord>,
}

#[derive(Debug, Deserialize)]
pub struct JsonQuestion {
    pub name: String,
    #[serde(rename = "type")]
    pub rtype: u32,
}

#[derive(Debug, Deserialize)]
pub struct JsonRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub rtype: u32,
    #[serde(rename = "TTL", default)]
    pub ttl: i64,
    #[serde(default)]
    pub data: String,
}

/// Builds the response to `request` from a JSON API body. The response keeps
/// the request's id and opcode; everything else comes from the body.
pub fn map_response(body: &[u8], request: &Message) -> Result<Message, MappingError> {
    let json: JsonResponse =
        serde_json::from_slice(body).map_err(|e| MappingError::InvalidJson(e.to_string()))?;

    let rcode = u8::try_from(json.status)
        .ok()
        .filter(|code| *code <= 0x0F)
        .ok_or(MappingError::InvalidStatus(json.status))?;

    let header = Header {
        id: request.header.id,
        response: true,
        opcode: request.header.opcode,
        truncated: json.truncated,
        recursion_desired: json.recursion_desired,
        recursion_available: json.recursion_available,
        authentic_data: json.authentic_data,
        checking_disabled: json.checking_disabled,
        rcode,
        ..Header::default()
    };

    let questions = if json.question.is_empty() {
        request.questions.clone()
    } else {
        json.question
            .iter()
            .map(map_question)
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(Message {
        header,
        questions,
        answers: map_records(&json.answer)?,
        authorities: map_records(&json.authority)?,
        additionals: map_records(&json.additional)?,
    })
}

fn map_question(question: &JsonQuestion) -> Result<Question, MappingError> {
    let qtype = query_type_from(question.rtype).map_err(|_| MappingError::InvalidType(question.rtype))?;
    Ok(Question::new(parse_name(&question.name)?, qtype, CLASS_IN))
}

fn map_records(records: &[JsonRecord]) -> Result<Vec<ResourceRecord>, MappingError> {
    let mut mapped = Vec::with_capacity(records.len());
    for record in records {
        if let Some(record) = map_record(record)? {
            mapped.push(record);
        }
    }
    Ok(mapped)
}

fn map_record(record: &JsonRecord) -> Result<Option<ResourceRecord>, MappingError> {
    let rtype = u16::try_from(record.rtype).map_err(|_| MappingError::InvalidType(record.rtype))?;
    let name = parse_name(&record.name)?;

    let rdata = match parse_data(RecordType::from_u16(rtype), &record.data)? {
        Some(rdata) => rdata,
        None => {
            debug!(name = %record.name, rtype, "Skipping JSON record of unsupported type");
            return Ok(None);
        }
    };

    Ok(Some(ResourceRecord {
        name,
        rtype,
        class: CLASS_IN,
        ttl: record.ttl.clamp(0, i64::from(i32::MAX)) as i32,
        rdata,
    }))
}

fn parse_name(s: &str) -> Result<Name, MappingError> {
    s.parse()
        .map_err(|_| MappingError::InvalidName(s.to_string()))
}

/// `Ok(None)` for types without a textual parser.
fn parse_data(rtype: RecordType, data: &str) -> Result<Option<RData>, MappingError> {
    let invalid = || MappingError::InvalidData {
        rtype,
        data: data.to_string(),
    };
    let data = data.trim();

    if let Some(generic) = data.strip_prefix("\\#") {
        return parse_generic(generic).map(|raw| Some(RData::Unknown(raw))).ok_or_else(invalid);
    }

    let rdata = match rtype {
        RecordType::A => RData::A(data.parse::<Ipv4Addr>().map_err(|_| invalid())?),
        RecordType::AAAA => RData::Aaaa(data.parse::<Ipv6Addr>().map_err(|_| invalid())?),
        RecordType::CNAME => RData::Cname(data.parse().map_err(|_| invalid())?),
        RecordType::NS => RData::Ns(data.parse().map_err(|_| invalid())?),
        RecordType::PTR => RData::Ptr(data.parse().map_err(|_| invalid())?),
        RecordType::MX => {
            let mut fields = data.split_whitespace();
            let (Some(preference), Some(exchange), None) =
                (fields.next(), fields.next(), fields.next())
            else {
                return Err(invalid());
            };
            RData::Mx {
                preference: preference.parse().map_err(|_| invalid())?,
                exchange: exchange.parse().map_err(|_| invalid())?,
            }
        }
        RecordType::TXT => RData::Txt(parse_character_strings(data).ok_or_else(invalid)?),
        RecordType::SOA => {
            let fields: Vec<&str> = data.split_whitespace().collect();
            let [mname, rname, serial, refresh, retry, expire, minimum] = fields[..] else {
                return Err(invalid());
            };
            let number = |s: &str| s.parse::<u32>().map_err(|_| invalid());
            RData::Soa(Soa {
                mname: mname.parse().map_err(|_| invalid())?,
                rname: rname.parse().map_err(|_| invalid())?,
                serial: number(serial)?,
                refresh: number(refresh)?,
                retry: number(retry)?,
                expire: number(expire)?,
                minimum: number(minimum)?,
            })
        }
        _ => return Ok(None),
    };
    Ok(Some(rdata))
}

/// RFC 3597 generic form after the `\#` marker: `<length> <hex>...`.
fn parse_generic(s: &str) -> Option<Vec<u8>> {
    let mut fields = s.split_whitespace();
    let len: usize = fields.next()?.parse().ok()?;
    if len > usize::from(u16::MAX) {
        return None;
    }
    let hex: String = fields.collect();
    if hex.len() != len.checked_mul(2)? {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok())
        .collect()
}

/// TXT presentation data: quoted strings with `\"`, `\\` and `\DDD` escapes,
/// or one unquoted value as Google's API returns it. Strings longer than 255
/// octets are split.
fn parse_character_strings(s: &str) -> Option<Vec<Vec<u8>>> {
    let trimmed = s.trim();
    if !trimmed.starts_with('"') {
        if trimmed.is_empty() {
            return Some(vec![Vec::new()]);
        }
        return Some(
            trimmed
                .as_bytes()
                .chunks(MAX_CHARACTER_STRING)
                .map(<[u8]>::to_vec)
                .collect(),
        );
    }

    let bytes = trimmed.as_bytes();
    let mut strings = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos].is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let quoted = bytes[pos] == b'"';
        if quoted {
            pos += 1;
        }
        let mut current = Vec::new();
        loop {
            let Some(&byte) = bytes.get(pos) else {
                if quoted {
                    return None;
                }
                break;
            };
            match byte {
                b'"' if quoted => {
                    pos += 1;
                    break;
                }
                b if !quoted && b.is_ascii_whitespace() => break,
                b'\\' => {
                    let rest = &bytes[pos + 1..];
                    match rest {
                        [a, b, c, ..] if a.is_ascii_digit() && b.is_ascii_digit() && c.is_ascii_digit() => {
                            let value = u16::from(a - b'0') * 100
                                + u16::from(b - b'0') * 10
                                + u16::from(c - b'0');
                            current.push(u8::try_from(value).ok()?);
                            pos += 4;
                        }
                        [escaped, ..] => {
                            current.push(*escaped);
                            pos += 2;
                        }
                        [] => return None,
                    }
                }
                other => {
                    current.push(other);
                    pos += 1;
                }
            }
        }

        if current.is_empty() {
            strings.push(current);
        } else {
            strings.extend(current.chunks(MAX_CHARACTER_STRING).map(<[u8]>::to_vec));
        }
    }
    Some(strings)
}
