//! Actual state: the records PowerDNS holds under our ownership tag

use anyhow::{Context, Result};
use powerdns::{DnsBackend, RRSet, Zone};
use reconcile::{Record, RecordSet, RecordType, canonicalize, normalize_address};

/// What one zone holds, split by ownership
#[derive(Debug, Default)]
pub struct ZoneRecords {
    /// One record per value of every rrset carrying the tag
    pub tagged: Vec<Record>,
    /// A/AAAA/PTR rrsets without the tag; these are never written
    pub untagged: Vec<RecordSet>,
}

/// Records of a forward zone; a zone missing from PowerDNS has none
pub fn forward_zone_records(backend: &dyn DnsBackend, zone: &str, tag: &str) -> Result<ZoneRecords> {
    let name = canonicalize(zone);
    match fetch_zone(backend, &name)? {
        Some(found) => Ok(split_records(&found, &name, tag)),
        None => {
            log::warn!("Forward zone {name} does not exist in PowerDNS, skipping");
            Ok(ZoneRecords::default())
        }
    }
}

/// Records of a reverse zone, which must exist
pub fn reverse_zone_records(backend: &dyn DnsBackend, zone: &str, tag: &str) -> Result<ZoneRecords> {
    let name = canonicalize(zone);
    let found = fetch_zone(backend, &name)?
        .ok_or_else(|| reconcile::Error::MissingReverseZone(name.clone()))?;
    Ok(split_records(&found, &name, tag))
}

fn fetch_zone(backend: &dyn DnsBackend, name: &str) -> Result<Option<Zone>> {
    backend
        .zone(name)
        .with_context(|| format!("Failed to fetch zone {name} from PowerDNS"))
}

fn split_records(zone: &Zone, zone_name: &str, tag: &str) -> ZoneRecords {
    let mut found = ZoneRecords::default();

    for rrset in &zone.rrsets {
        let managed = rrset.rtype.parse::<RecordType>();
        let tagged = rrset.has_comment(tag);

        match (managed, tagged) {
            (Ok(rtype), true) => found.tagged.extend(
                values(rrset, rtype).map(|value| Record::new(&rrset.name, rtype, value, zone_name)),
            ),
            (Ok(rtype), false) => found.untagged.push(RecordSet {
                name: rrset.name.clone(),
                rtype,
                zone: zone_name.to_string(),
                values: values(rrset, rtype).collect(),
            }),
            (Err(_), true) => log::warn!(
                "Ignoring {} {} in {zone_name}: type is not managed",
                rrset.name,
                rrset.rtype
            ),
            (Err(_), false) => {}
        }
    }

    log::debug!(
        "{} tagged records and {} untagged rrsets in {zone_name}",
        found.tagged.len(),
        found.untagged.len()
    );
    found
}

fn values(rrset: &RRSet, rtype: RecordType) -> impl Iterator<Item = String> + '_ {
    rrset.contents().map(move |content| match rtype {
        RecordType::A | RecordType::Aaaa => {
            normalize_address(content).unwrap_or_else(|_| content.to_string())
        }
        RecordType::Ptr => content.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use powerdns::{Comment, MockDnsBackend, RRSet};

    fn backend_with(zone: &str, rrsets: Vec<RRSet>) -> MockDnsBackend {
        let backend = MockDnsBackend::new();
        let mut z = Zone::new(zone);
        z.rrsets = rrsets;
        backend.add_zone(z);
        backend
    }

    #[test]
    fn test_only_tagged_rrsets() {
        let mut manual = RRSet::new("www.example.com.", "A", 3600, &["10.0.0.80"], "NetBox");
        manual.comments = vec![Comment::new("added by hand")];
        let backend = backend_with(
            "example.com.",
            vec![
                RRSet::new("host1.example.com.", "A", 3600, &["10.0.0.5"], "NetBox"),
                manual,
            ],
        );

        let found = forward_zone_records(&backend, "example.com", "NetBox").unwrap();
        assert_eq!(
            found.tagged,
            vec![Record::new("host1.example.com.", RecordType::A, "10.0.0.5", "example.com.")]
        );
    }

    #[test]
    fn test_untagged_rrsets_kept_apart() {
        let mut manual = RRSet::new("www.example.com.", "A", 3600, &["192.0.2.80"], "NetBox");
        manual.comments = vec![Comment::new("hand-made")];
        let mut mx = RRSet::new("example.com.", "MX", 3600, &["10 mail.example.com."], "NetBox");
        mx.comments.clear();
        let backend = backend_with("example.com.", vec![manual, mx]);

        let found = forward_zone_records(&backend, "example.com", "NetBox").unwrap();
        assert!(found.tagged.is_empty());
        assert_eq!(
            found.untagged,
            vec![RecordSet {
                name: "www.example.com.".to_string(),
                rtype: RecordType::A,
                zone: "example.com.".to_string(),
                values: vec!["192.0.2.80".to_string()],
            }]
        );
    }

    #[test]
    fn test_one_record_per_value() {
        let backend = backend_with(
            "example.com.",
            vec![RRSet::new(
                "multi.example.com.",
                "A",
                3600,
                &["10.0.0.1", "10.0.0.2"],
                "NetBox",
            )],
        );

        let records = forward_zone_records(&backend, "example.com.", "NetBox").unwrap().tagged;
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].value, "10.0.0.2");
    }

    #[test]
    fn test_unmanaged_type_skipped() {
        let backend = backend_with(
            "example.com.",
            vec![RRSet::new(
                "alias.example.com.",
                "CNAME",
                3600,
                &["host1.example.com."],
                "NetBox",
            )],
        );

        let found = forward_zone_records(&backend, "example.com", "NetBox").unwrap();
        assert!(found.tagged.is_empty());
        assert!(found.untagged.is_empty());
    }

    #[test]
    fn test_ipv6_values_normalized() {
        let backend = backend_with(
            "example.com.",
            vec![RRSet::new(
                "host1.example.com.",
                "AAAA",
                3600,
                &["2001:DB8:0:0:0:0:0:5"],
                "NetBox",
            )],
        );

        let records = forward_zone_records(&backend, "example.com", "NetBox").unwrap().tagged;
        assert_eq!(records[0].value, "2001:db8::5");
    }

    #[test]
    fn test_missing_forward_zone_is_empty() {
        let backend = MockDnsBackend::new();
        let found = forward_zone_records(&backend, "example.com", "NetBox").unwrap();
        assert!(found.tagged.is_empty());
    }

    #[test]
    fn test_missing_reverse_zone_is_fatal() {
        let backend = MockDnsBackend::new();
        let err = reverse_zone_records(&backend, "0.0.10.in-addr.arpa", "NetBox").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<reconcile::Error>(),
            Some(reconcile::Error::MissingReverseZone(zone)) if zone == "0.0.10.in-addr.arpa."
        ));
    }

    #[test]
    fn test_reverse_zone_records() {
        let backend = backend_with(
            "0.0.10.in-addr.arpa.",
            vec![RRSet::new(
                "5.0.0.10.in-addr.arpa.",
                "PTR",
                3600,
                &["host1.example.com."],
                "NetBox",
            )],
        );

        let records = reverse_zone_records(&backend, "0.0.10.in-addr.arpa", "NetBox").unwrap();
        assert_eq!(
            records.tagged,
            vec![Record::new(
                "5.0.0.10.in-addr.arpa.",
                RecordType::Ptr,
                "host1.example.com.",
                "0.0.10.in-addr.arpa."
            )]
        );
    }
}
