//! dohgate infrastructure: upstream transports, the pool resolver and the
//! classic DNS datagram handler.
pub mod dns;
