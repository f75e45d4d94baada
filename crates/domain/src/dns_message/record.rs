use super::{Name, RecordType, CLASS_IN};
use std::net::{Ipv4Addr, Ipv6Addr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Soa {
    pub mname: Name,
    pub rname: Name,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

/// Record data, interpreted for the handful of types the gateway needs to
/// understand and kept as raw octets for everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Cname(Name),
    Ns(Name),
    Ptr(Name),
    Mx { preference: u16, exchange: Name },
    /// One entry per character-string.
    Txt(Vec<Vec<u8>>),
    Soa(Soa),
    Unknown(Vec<u8>),
}

impl RData {
    /// The record type this payload is naturally stored under, if it is typed.
    pub fn natural_type(&self) -> Option<RecordType> {
        match self {
            RData::A(_) => Some(RecordType::A),
            RData::Aaaa(_) => Some(RecordType::AAAA),
            RData::Cname(_) => Some(RecordType::CNAME),
            RData::Ns(_) => Some(RecordType::NS),
            RData::Ptr(_) => Some(RecordType::PTR),
            RData::Mx { .. } => Some(RecordType::MX),
            RData::Txt(_) => Some(RecordType::TXT),
            RData::Soa(_) => Some(RecordType::SOA),
            RData::Unknown(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: Name,
    pub rtype: u16,
    pub class: u16,
    /// Signed on purpose: the field is a raw 32-bit quantity and OPT records
    /// reuse it for flags.
    pub ttl: i32,
    pub rdata: RData,
}

impl ResourceRecord {
    /// Builds an IN-class record whose type follows from the payload.
    /// `RData::Unknown` payloads need an explicit type, see [`ResourceRecord::raw`].
    pub fn new(name: Name, ttl: i32, rdata: RData) -> Self {
        let rtype = rdata
            .natural_type()
            .map(|t| t.to_u16())
            .unwrap_or_default();
        Self {
            name,
            rtype,
            class: CLASS_IN,
            ttl,
            rdata,
        }
    }

    pub fn raw(name: Name, rtype: u16, class: u16, ttl: i32, data: Vec<u8>) -> Self {
        Self {
            name,
            rtype,
            class,
            ttl,
            rdata: RData::Unknown(data),
        }
    }

    pub fn record_type(&self) -> RecordType {
        RecordType::from_u16(self.rtype)
    }
}
