//! Blocking PowerDNS client.
//!
//! Reads zones with their rrsets and applies whole-rrset changes through
//! the [`backend::DnsBackend`] trait. [`backend::api::PowerDnsClient`] talks
//! to the HTTP API; [`backend::MockDnsBackend`] keeps zones in memory.

pub mod backend;
pub mod error;
pub mod types;

pub use backend::api::PowerDnsClient;
pub use backend::{DnsBackend, MockCall, MockDnsBackend};
pub use error::{Error, ErrorCategory, Result};
pub use types::{ChangeType, Comment, DEFAULT_TTL, RRSet, RecordEntry, Zone};
