use std::fmt;
use std::str::FromStr;

/// Resource record / query type. Codes without a mnemonic here are carried
/// as `Unknown` and keep their numeric value through every conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    NS,
    CNAME,
    SOA,
    PTR,
    HINFO,
    MX,
    TXT,
    AAAA,
    SRV,
    NAPTR,
    DNAME,
    OPT,
    DS,
    RRSIG,
    NSEC,
    DNSKEY,
    SVCB,
    HTTPS,
    ANY,
    CAA,
    Unknown(u16),
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::NS => "NS",
            RecordType::CNAME => "CNAME",
            RecordType::SOA => "SOA",
            RecordType::PTR => "PTR",
            RecordType::HINFO => "HINFO",
            RecordType::MX => "MX",
            RecordType::TXT => "TXT",
            RecordType::AAAA => "AAAA",
            RecordType::SRV => "SRV",
            RecordType::NAPTR => "NAPTR",
            RecordType::DNAME => "DNAME",
            RecordType::OPT => "OPT",
            RecordType::DS => "DS",
            RecordType::RRSIG => "RRSIG",
            RecordType::NSEC => "NSEC",
            RecordType::DNSKEY => "DNSKEY",
            RecordType::SVCB => "SVCB",
            RecordType::HTTPS => "HTTPS",
            RecordType::ANY => "ANY",
            RecordType::CAA => "CAA",
            RecordType::Unknown(_) => "UNKNOWN",
        }
    }

    pub fn to_u16(&self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::NS => 2,
            RecordType::CNAME => 5,
            RecordType::SOA => 6,
            RecordType::PTR => 12,
            RecordType::HINFO => 13,
            RecordType::MX => 15,
            RecordType::TXT => 16,
            RecordType::AAAA => 28,
            RecordType::SRV => 33,
            RecordType::NAPTR => 35,
            RecordType::DNAME => 39,
            RecordType::OPT => 41,
            RecordType::DS => 43,
            RecordType::RRSIG => 46,
            RecordType::NSEC => 47,
            RecordType::DNSKEY => 48,
            RecordType::SVCB => 64,
            RecordType::HTTPS => 65,
            RecordType::ANY => 255,
            RecordType::CAA => 257,
            RecordType::Unknown(code) => *code,
        }
    }

    pub fn from_u16(code: u16) -> Self {
        match code {
            1 => RecordType::A,
            2 => RecordType::NS,
            5 => RecordType::CNAME,
            6 => RecordType::SOA,
            12 => RecordType::PTR,
            13 => RecordType::HINFO,
            15 => RecordType::MX,
            16 => RecordType::TXT,
            28 => RecordType::AAAA,
            33 => RecordType::SRV,
            35 => RecordType::NAPTR,
            39 => RecordType::DNAME,
            41 => RecordType::OPT,
            43 => RecordType::DS,
            46 => RecordType::RRSIG,
            47 => RecordType::NSEC,
            48 => RecordType::DNSKEY,
            64 => RecordType::SVCB,
            65 => RecordType::HTTPS,
            255 => RecordType::ANY,
            257 => RecordType::CAA,
            other => RecordType::Unknown(other),
        }
    }

    /// Types whose rdata embeds domain names that RFC 1035 allows to compress.
    pub fn has_compressible_rdata(&self) -> bool {
        matches!(
            self,
            RecordType::NS | RecordType::CNAME | RecordType::SOA | RecordType::PTR | RecordType::MX
        )
    }
}

impl From<u16> for RecordType {
    fn from(code: u16) -> Self {
        Self::from_u16(code)
    }
}

impl From<RecordType> for u16 {
    fn from(record_type: RecordType) -> Self {
        record_type.to_u16()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::Unknown(code) => write!(f, "TYPE{}", code),
            known => f.write_str(known.as_str()),
        }
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        if let Some(code) = upper.strip_prefix("TYPE") {
            return code
                .parse::<u16>()
                .map(RecordType::from_u16)
                .map_err(|_| format!("Invalid record type: {}", s));
        }
        let record_type = match upper.as_str() {
            "A" => RecordType::A,
            "NS" => RecordType::NS,
            "CNAME" => RecordType::CNAME,
            "SOA" => RecordType::SOA,
            "PTR" => RecordType::PTR,
            "HINFO" => RecordType::HINFO,
            "MX" => RecordType::MX,
            "TXT" => RecordType::TXT,
            "AAAA" => RecordType::AAAA,
            "SRV" => RecordType::SRV,
            "NAPTR" => RecordType::NAPTR,
            "DNAME" => RecordType::DNAME,
            "OPT" => RecordType::OPT,
            "DS" => RecordType::DS,
            "RRSIG" => RecordType::RRSIG,
            "NSEC" => RecordType::NSEC,
            "DNSKEY" => RecordType::DNSKEY,
            "SVCB" => RecordType::SVCB,
            "HTTPS" => RecordType::HTTPS,
            "ANY" => RecordType::ANY,
            "CAA" => RecordType::CAA,
            _ => return Err(format!("Invalid record type: {}", s)),
        };
        Ok(record_type)
    }
}
