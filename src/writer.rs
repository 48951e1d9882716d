//! PowerDNS side of an apply

use anyhow::{Context, Result};
use powerdns::{DnsBackend, RRSet};
use reconcile::{RecordSet, RecordWriter};

/// Writes rrsets to PowerDNS carrying the ownership tag
pub struct PowerDnsWriter<'a> {
    backend: &'a dyn DnsBackend,
    tag: &'a str,
    ttl: u32,
}

impl<'a> PowerDnsWriter<'a> {
    pub fn new(backend: &'a dyn DnsBackend, tag: &'a str, ttl: u32) -> Self {
        Self { backend, tag, ttl }
    }

    fn rrset(&self, set: &RecordSet) -> RRSet {
        let values: Vec<&str> = set.values.iter().map(String::as_str).collect();
        RRSet::new(
            set.name.as_str(),
            set.rtype.as_str(),
            self.ttl,
            &values,
            self.tag,
        )
    }
}

impl RecordWriter for PowerDnsWriter<'_> {
    fn replace(&self, rrset: &RecordSet) -> Result<()> {
        self.backend
            .create_rrset(&rrset.zone, &self.rrset(rrset))
            .with_context(|| format!("PowerDNS zone {}", rrset.zone))
    }

    fn delete(&self, rrset: &RecordSet) -> Result<()> {
        self.backend
            .delete_rrset(&rrset.zone, &self.rrset(rrset))
            .with_context(|| format!("PowerDNS zone {}", rrset.zone))
    }
}
