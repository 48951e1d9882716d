//! The uniform record shape every reconciliation step operates on
//!
//! Desired state (from inventory) and actual state (from the DNS backend) are
//! both reduced to [`Record`] tuples so that diffing is plain set arithmetic.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// DNS record types managed by the reconciler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordType {
    A,
    #[serde(rename = "AAAA")]
    Aaaa,
    #[serde(rename = "PTR")]
    Ptr,
}

impl RecordType {
    /// Wire name of the type, as used by the DNS backend
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Ptr => "PTR",
        }
    }

    /// Address record type for an IP address family
    pub fn for_address(addr: &IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => Self::A,
            IpAddr::V6(_) => Self::Aaaa,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::Aaaa),
            "PTR" => Ok(Self::Ptr),
            other => Err(Error::InvalidRecord(format!(
                "unsupported record type '{other}'"
            ))),
        }
    }
}

/// A single DNS record value
///
/// Identity is the whole tuple: two records are the same only if name, type,
/// value and zone all match. The zone is carried for routing the backend call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Record {
    /// Fully-qualified owner name (trailing dot)
    pub name: String,
    /// Record type
    pub rtype: RecordType,
    /// Bare IP address for A/AAAA, fully-qualified target for PTR
    pub value: String,
    /// Fully-qualified zone the record lives in
    pub zone: String,
}

impl Record {
    /// Build a record from parts that are already in canonical form
    pub fn new(
        name: impl Into<String>,
        rtype: RecordType,
        value: impl Into<String>,
        zone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            rtype,
            value: value.into(),
            zone: zone.into(),
        }
    }

    /// A or AAAA record for `name`, type chosen by address family
    pub fn address(name: &str, addr: IpAddr, zone: &str) -> Self {
        Self {
            name: canonicalize(name),
            rtype: RecordType::for_address(&addr),
            value: addr.to_string(),
            zone: canonicalize(zone),
        }
    }

    /// PTR record mapping `addr` back to `target`
    pub fn ptr(addr: IpAddr, target: &str, zone: &str) -> Self {
        Self {
            name: canonicalize(&reverse_pointer(addr)),
            rtype: RecordType::Ptr,
            value: canonicalize(target),
            zone: canonicalize(zone),
        }
    }

    /// The `(name, type)` key used for duplicate detection
    pub fn key(&self) -> RecordKey {
        RecordKey {
            name: self.name.clone(),
            rtype: self.rtype,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} (zone {})",
            self.name, self.rtype, self.value, self.zone
        )
    }
}

/// Owner name plus record type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    pub name: String,
    pub rtype: RecordType,
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.rtype)
    }
}

/// Every value of one name and type in a zone
///
/// This is what the DNS backend replaces or deletes in a single call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordSet {
    pub name: String,
    pub rtype: RecordType,
    pub zone: String,
    pub values: Vec<String>,
}

impl RecordSet {
    /// The empty set `record` belongs to
    pub fn of(record: &Record) -> Self {
        Self {
            name: record.name.clone(),
            rtype: record.rtype,
            zone: record.zone.clone(),
            values: Vec::new(),
        }
    }

    /// Whether `record` belongs to this set, whatever its value
    pub fn holds(&self, record: &Record) -> bool {
        self.name == record.name && self.rtype == record.rtype && self.zone == record.zone
    }

    pub fn key(&self) -> RecordKey {
        RecordKey {
            name: self.name.clone(),
            rtype: self.rtype,
        }
    }
}

impl fmt::Display for RecordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.rtype)?;
        if !self.values.is_empty() {
            write!(f, " {}", self.values.join(", "))?;
        }
        write!(f, " (zone {})", self.zone)
    }
}

/// Put a domain name in fully-qualified form
///
/// Appends a trailing dot when missing. No case folding is done, so names that
/// differ only in case stay distinct.
pub fn canonicalize(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}

/// Reverse-lookup name for an address, without the trailing dot
///
/// IPv4 gives `d.c.b.a.in-addr.arpa`, IPv6 gives 32 reversed nibbles under
/// `ip6.arpa`.
pub fn reverse_pointer(addr: IpAddr) -> String {
    match addr {
        IpAddr::V4(v4) => {
            let [a, b, c, d] = v4.octets();
            format!("{d}.{c}.{b}.{a}.in-addr.arpa")
        }
        IpAddr::V6(v6) => {
            let mut labels: Vec<String> = Vec::with_capacity(34);
            for byte in v6.octets().iter().rev() {
                labels.push(format!("{:x}", byte & 0x0f));
                labels.push(format!("{:x}", byte >> 4));
            }
            labels.push("ip6".to_string());
            labels.push("arpa".to_string());
            labels.join(".")
        }
    }
}

/// Parse an inventory address like `10.0.0.5/24` into a bare IP
///
/// The prefix length, if any, is dropped.
pub fn parse_address(address: &str) -> Result<IpAddr> {
    let bare = address.split('/').next().unwrap_or(address).trim();
    bare.parse()
        .map_err(|_| Error::InvalidRecord(format!("invalid IP address '{address}'")))
}

/// Normalize an address value so textual variants compare equal
pub fn normalize_address(address: &str) -> Result<String> {
    parse_address(address).map(|ip| ip.to_string())
}

fn labels(name: &str) -> Vec<&str> {
    let trimmed = name.strip_suffix('.').unwrap_or(name);
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('.').collect()
    }
}

/// Whether `name` sits strictly below `zone`, compared label by label
///
/// `host.example.com` is below `example.com`; `host.notexample.com` is not,
/// and neither is the apex `example.com` itself.
pub fn is_below_zone(name: &str, zone: &str) -> bool {
    let name_labels = labels(name);
    let zone_labels = labels(zone);
    !zone_labels.is_empty()
        && name_labels.len() > zone_labels.len()
        && name_labels.ends_with(&zone_labels)
}

/// The most specific zone in `zones` that `name` belongs to
pub fn owning_zone<'a, S: AsRef<str>>(name: &str, zones: &'a [S]) -> Option<&'a str> {
    zones
        .iter()
        .map(AsRef::as_ref)
        .filter(|zone| is_below_zone(name, zone))
        .max_by_key(|zone| labels(zone).len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_canonicalize_appends_dot() {
        assert_eq!(canonicalize("example.com"), "example.com.");
        assert_eq!(canonicalize("example.com."), "example.com.");
    }

    #[test]
    fn test_canonicalize_idempotent() {
        for name in ["host.example.com", "host.example.com.", "a", "0.0.10.in-addr.arpa"] {
            let once = canonicalize(name);
            assert_eq!(canonicalize(&once), once);
        }
    }

    #[test]
    fn test_canonicalize_keeps_case() {
        assert_eq!(canonicalize("Host.Example.com"), "Host.Example.com.");
    }

    #[test]
    fn test_record_type_round_trip() {
        assert_eq!("A".parse::<RecordType>().unwrap(), RecordType::A);
        assert_eq!("AAAA".parse::<RecordType>().unwrap(), RecordType::Aaaa);
        assert_eq!("PTR".parse::<RecordType>().unwrap(), RecordType::Ptr);
        assert!("CNAME".parse::<RecordType>().is_err());
        assert_eq!(RecordType::Aaaa.to_string(), "AAAA");
    }

    #[test]
    fn test_reverse_pointer_v4() {
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(reverse_pointer(ip), "1.0.0.10.in-addr.arpa");
    }

    #[test]
    fn test_reverse_pointer_v6() {
        let ip: IpAddr = "2001:db8::567:89ab".parse().unwrap();
        assert_eq!(
            reverse_pointer(ip),
            "b.a.9.8.7.6.5.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.8.b.d.0.1.0.0.2.ip6.arpa"
        );
    }

    #[test]
    fn test_ptr_record_scenario() {
        let record = Record::ptr(
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
            "host.example.com",
            "0.0.10.in-addr.arpa",
        );
        assert_eq!(
            record,
            Record::new(
                "1.0.0.10.in-addr.arpa.",
                RecordType::Ptr,
                "host.example.com.",
                "0.0.10.in-addr.arpa."
            )
        );
    }

    #[test]
    fn test_address_record_picks_family() {
        let v4 = Record::address("host.example.com", "10.0.0.5".parse().unwrap(), "example.com");
        assert_eq!(v4.rtype, RecordType::A);
        assert_eq!(v4.name, "host.example.com.");
        assert_eq!(v4.zone, "example.com.");

        let v6 = Record::address(
            "host.example.com.",
            IpAddr::V6(Ipv6Addr::LOCALHOST),
            "example.com.",
        );
        assert_eq!(v6.rtype, RecordType::Aaaa);
        assert_eq!(v6.value, "::1");
    }

    #[test]
    fn test_parse_address_strips_prefix() {
        assert_eq!(
            parse_address("10.0.0.5/24").unwrap(),
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5))
        );
        assert_eq!(normalize_address("2001:DB8:0:0::1/64").unwrap(), "2001:db8::1");
        assert_eq!(normalize_address("10.0.0.9").unwrap(), "10.0.0.9");
        assert!(parse_address("not-an-ip/24").is_err());
    }

    #[test]
    fn test_is_below_zone_uses_labels() {
        assert!(is_below_zone("host.example.com", "example.com"));
        assert!(is_below_zone("host.example.com.", "example.com"));
        assert!(is_below_zone("a.b.example.com", "example.com."));
        assert!(!is_below_zone("host.notexample.com", "example.com"));
        assert!(!is_below_zone("example.com", "example.com"));
        assert!(!is_below_zone("host.example.com", ""));
    }

    #[test]
    fn test_owning_zone_prefers_longest() {
        let zones = vec!["example.com".to_string(), "lab.example.com".to_string()];
        assert_eq!(owning_zone("a.lab.example.com", &zones), Some("lab.example.com"));
        assert_eq!(owning_zone("b.example.com", &zones), Some("example.com"));
        assert_eq!(owning_zone("c.example.org", &zones), None);
    }

    #[test]
    fn test_record_set_membership_ignores_value() {
        let record = Record::new("host1.example.com.", RecordType::A, "10.0.0.5", "example.com.");
        let mut set = RecordSet::of(&record);
        assert!(set.values.is_empty());
        assert!(set.holds(&Record::new("host1.example.com.", RecordType::A, "10.0.0.6", "example.com.")));
        assert!(!set.holds(&Record::new("host1.example.com.", RecordType::Aaaa, "::1", "example.com.")));

        assert_eq!(set.to_string(), "host1.example.com. A (zone example.com.)");
        set.values = vec!["10.0.0.5".to_string(), "10.0.0.6".to_string()];
        assert_eq!(
            set.to_string(),
            "host1.example.com. A 10.0.0.5, 10.0.0.6 (zone example.com.)"
        );
    }
}
