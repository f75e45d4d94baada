/// Response codes used by the gateway itself (RFC 1035 §4.1.1).
pub mod rcode {
    pub const NO_ERROR: u8 = 0;
    pub const FORMAT_ERROR: u8 = 1;
    pub const SERVER_FAILURE: u8 = 2;
    pub const NAME_ERROR: u8 = 3;
    pub const NOT_IMPLEMENTED: u8 = 4;
    pub const REFUSED: u8 = 5;
}

const QR_BIT: u16 = 0x8000;
const OPCODE_SHIFT: u16 = 11;
const AA_BIT: u16 = 0x0400;
const TC_BIT: u16 = 0x0200;
const RD_BIT: u16 = 0x0100;
const RA_BIT: u16 = 0x0080;
const Z_BIT: u16 = 0x0040;
const AD_BIT: u16 = 0x0020;
const CD_BIT: u16 = 0x0010;

/// DNS message header.
///
/// Section counts are not stored here: they are always derived from the
/// message sections when encoding (see `Message::counts`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub id: u16,
    /// QR bit: `true` for responses.
    pub response: bool,
    /// 4-bit operation code.
    pub opcode: u8,
    pub authoritative: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    /// Reserved Z bit, carried through untouched.
    pub z: bool,
    pub authentic_data: bool,
    pub checking_disabled: bool,
    /// 4-bit response code.
    pub rcode: u8,
}

impl Header {
    /// A standard recursive query header.
    pub fn query(id: u16) -> Self {
        Self {
            id,
            recursion_desired: true,
            ..Self::default()
        }
    }

    /// Packs every flag into the 16-bit flags word. Opcode and rcode are
    /// truncated to their 4-bit fields.
    pub fn flags(&self) -> u16 {
        let mut flags = (u16::from(self.opcode & 0x0F) << OPCODE_SHIFT) | u16::from(self.rcode & 0x0F);
        for (set, bit) in [
            (self.response, QR_BIT),
            (self.authoritative, AA_BIT),
            (self.truncated, TC_BIT),
            (self.recursion_desired, RD_BIT),
            (self.recursion_available, RA_BIT),
            (self.z, Z_BIT),
            (self.authentic_data, AD_BIT),
            (self.checking_disabled, CD_BIT),
        ] {
            if set {
                flags |= bit;
            }
        }
        flags
    }

    pub fn from_flags(id: u16, flags: u16) -> Self {
        Self {
            id,
            response: flags & QR_BIT != 0,
            opcode: ((flags >> OPCODE_SHIFT) & 0x0F) as u8,
            authoritative: flags & AA_BIT != 0,
            truncated: flags & TC_BIT != 0,
            recursion_desired: flags & RD_BIT != 0,
            recursion_available: flags & RA_BIT != 0,
            z: flags & Z_BIT != 0,
            authentic_data: flags & AD_BIT != 0,
            checking_disabled: flags & CD_BIT != 0,
            rcode: (flags & 0x0F) as u8,
        }
    }
}
