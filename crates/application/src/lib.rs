//! dohgate application layer: ports implemented by the infrastructure crate and
//! the query handling use case shared by the DoH and classic DNS front ends.
pub mod ports;
pub mod use_cases;
