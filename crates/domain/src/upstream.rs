use crate::errors::DomainError;
use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;
use std::sync::Arc;

pub const DEFAULT_DNS_PORT: u16 = 53;
pub const DEFAULT_HTTPS_PORT: u16 = 443;
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// One configured upstream, parsed from `host[:port]` or
/// `scheme://host[:port][/path]`.
///
/// The scheme is stored lowercased; host, port and path are kept as written.
/// IPv6 hosts are stored without brackets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpstreamDescriptor {
    address: Arc<str>,
    scheme: Option<Arc<str>>,
    host: Arc<str>,
    port: Option<u16>,
    path: Option<Arc<str>>,
}

impl UpstreamDescriptor {
    /// The address exactly as configured.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Explicit port, or the default for the scheme.
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(match self.scheme() {
            Some("https") => DEFAULT_HTTPS_PORT,
            Some("http") => DEFAULT_HTTP_PORT,
            _ => DEFAULT_DNS_PORT,
        })
    }

    /// `host:port` suitable for socket address lookup.
    pub fn socket_target(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.effective_port())
        } else {
            format!("{}:{}", self.host, self.effective_port())
        }
    }

    pub fn has_scheme(&self, scheme: &str) -> bool {
        self.scheme()
            .is_some_and(|s| s.eq_ignore_ascii_case(scheme))
    }
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn parse_authority(s: &str) -> Option<(&str, Option<u16>)> {
    if s.is_empty() || s.contains(char::is_whitespace) || s.contains('@') {
        return None;
    }
    if let Some(rest) = s.strip_prefix('[') {
        let end = rest.find(']')?;
        let host = &rest[..end];
        host.parse::<Ipv6Addr>().ok()?;
        let port = match &rest[end + 1..] {
            "" => None,
            after => Some(after.strip_prefix(':')?.parse::<u16>().ok()?),
        };
        return Some((host, port));
    }
    if s.parse::<Ipv6Addr>().is_ok() {
        return Some((s, None));
    }
    match s.rsplit_once(':') {
        Some((host, port_str)) => {
            if host.is_empty() {
                return None;
            }
            Some((host, Some(port_str.parse::<u16>().ok()?)))
        }
        None => Some((s, None)),
    }
}

impl FromStr for UpstreamDescriptor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let address = s.trim();
        if address.is_empty() {
            return Err("Empty upstream address".to_string());
        }

        let (scheme, rest) = match address.split_once("://") {
            Some((scheme, rest)) => {
                if !is_valid_scheme(scheme) {
                    return Err(format!("Invalid scheme '{}' in '{}'", scheme, address));
                }
                (Some(scheme.to_ascii_lowercase()), rest)
            }
            None => (None, address),
        };

        let (authority, path) = match rest.find('/') {
            Some(index) => (&rest[..index], Some(&rest[index..])),
            None => (rest, None),
        };
        if scheme.is_none() && path.is_some() {
            return Err(format!(
                "Invalid upstream '{}'. A path requires a scheme, e.g. 'https://{}'",
                address, rest
            ));
        }

        let (host, port) = parse_authority(authority).ok_or_else(|| {
            format!(
                "Invalid upstream '{}'. Expected HOST[:PORT] or SCHEME://HOST[:PORT][/PATH]",
                address
            )
        })?;

        Ok(Self {
            address: address.into(),
            scheme: scheme.map(Into::into),
            host: host.into(),
            port,
            path: path.map(Into::into),
        })
    }
}

impl fmt::Display for UpstreamDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

/// Ordered, immutable list of upstreams. Cloning shares the list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpstreamPool {
    upstreams: Arc<[UpstreamDescriptor]>,
}

impl UpstreamPool {
    pub fn new(upstreams: Vec<UpstreamDescriptor>) -> Self {
        Self {
            upstreams: upstreams.into(),
        }
    }

    pub fn from_addresses<I, S>(addresses: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let upstreams = addresses
            .into_iter()
            .map(|address| {
                let address = address.as_ref();
                address.parse::<UpstreamDescriptor>().map_err(|e| {
                    DomainError::InvalidUpstream(format!("Invalid upstream '{}': {}", address, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(upstreams))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UpstreamDescriptor> {
        self.upstreams.iter()
    }

    pub fn len(&self) -> usize {
        self.upstreams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upstreams.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&UpstreamDescriptor> {
        self.upstreams.get(index)
    }
}

impl<'a> IntoIterator for &'a UpstreamPool {
    type Item = &'a UpstreamDescriptor;
    type IntoIter = std::slice::Iter<'a, UpstreamDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
