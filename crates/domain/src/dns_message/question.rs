use super::{Name, RecordType, CLASS_IN};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Question {
    pub qname: Name,
    pub qtype: u16,
    pub qclass: u16,
}

impl Question {
    pub fn new(qname: Name, qtype: u16, qclass: u16) -> Self {
        Self {
            qname,
            qtype,
            qclass,
        }
    }

    /// Question in the IN class.
    pub fn internet(qname: Name, record_type: RecordType) -> Self {
        Self::new(qname, record_type.to_u16(), CLASS_IN)
    }

    pub fn record_type(&self) -> RecordType {
        RecordType::from_u16(self.qtype)
    }
}
