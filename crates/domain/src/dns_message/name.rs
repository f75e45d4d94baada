use crate::errors::DomainError;
use std::fmt;
use std::fmt::Write;
use std::str::FromStr;

pub const MAX_LABEL_LEN: usize = 63;
pub const MAX_NAME_WIRE_LEN: usize = 255;

/// A domain name as an ordered list of raw labels, most specific first.
///
/// Labels are kept as octets, so names read off the wire survive a round
/// trip byte for byte. Only the per-label limit is enforced here; the total
/// length is checked by query validation and by the wire codec.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Name {
    labels: Vec<Vec<u8>>,
}

impl Name {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_labels<I, L>(labels: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = L>,
        L: Into<Vec<u8>>,
    {
        let labels: Vec<Vec<u8>> = labels.into_iter().map(Into::into).collect();
        for label in &labels {
            if label.is_empty() {
                return Err(DomainError::InvalidDomainName(
                    "empty label in domain name".to_string(),
                ));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(DomainError::InvalidDomainName(format!(
                    "label of {} octets exceeds the {} octet limit",
                    label.len(),
                    MAX_LABEL_LEN
                )));
            }
        }
        Ok(Self { labels })
    }

    pub fn labels(&self) -> &[Vec<u8>] {
        &self.labels
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    /// Octets this name occupies on the wire without compression.
    pub fn wire_len(&self) -> usize {
        1 + self.labels.iter().map(|l| l.len() + 1).sum::<usize>()
    }

    /// Length of the name in presentation form without the trailing dot.
    /// The root name has length 0.
    pub fn text_len(&self) -> usize {
        if self.labels.is_empty() {
            return 0;
        }
        self.labels.iter().map(Vec::len).sum::<usize>() + self.labels.len() - 1
    }
}

fn parse_escape(rest: &[u8]) -> Option<(u8, usize)> {
    match rest {
        [a, b, c, ..] if a.is_ascii_digit() && b.is_ascii_digit() && c.is_ascii_digit() => {
            let value =
                u16::from(a - b'0') * 100 + u16::from(b - b'0') * 10 + u16::from(c - b'0');
            u8::try_from(value).ok().map(|byte| (byte, 3))
        }
        [a, ..] if !a.is_ascii_digit() => Some((*a, 1)),
        _ => None,
    }
}

impl FromStr for Name {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == "." {
            return Ok(Name::root());
        }

        let bytes = s.as_bytes();
        let mut labels = Vec::new();
        let mut current = Vec::new();
        let mut pos = 0;

        while pos < bytes.len() {
            match bytes[pos] {
                b'.' => {
                    if current.is_empty() {
                        return Err(DomainError::InvalidDomainName(format!(
                            "empty label in '{}'",
                            s
                        )));
                    }
                    labels.push(std::mem::take(&mut current));
                    pos += 1;
                }
                b'\\' => {
                    let (byte, consumed) = parse_escape(&bytes[pos + 1..]).ok_or_else(|| {
                        DomainError::InvalidDomainName(format!("bad escape sequence in '{}'", s))
                    })?;
                    current.push(byte);
                    pos += 1 + consumed;
                }
                other => {
                    current.push(other);
                    pos += 1;
                }
            }
        }
        if !current.is_empty() {
            labels.push(current);
        }

        Name::from_labels(labels)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.labels.is_empty() {
            return f.write_char('.');
        }
        for (index, label) in self.labels.iter().enumerate() {
            if index > 0 {
                f.write_char('.')?;
            }
            for &byte in label {
                match byte {
                    b'.' | b'\\' => write!(f, "\\{}", byte as char)?,
                    0x21..=0x7e => f.write_char(byte as char)?,
                    _ => write!(f, "\\{:03}", byte)?,
                }
            }
        }
        Ok(())
    }
}
