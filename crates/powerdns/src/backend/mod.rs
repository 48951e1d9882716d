//! DNS backend trait and implementations.
//!
//! [`DnsBackend`] covers the zone read and the two rrset mutations the
//! reconciler uses. [`api::PowerDnsClient`] talks to a live PowerDNS API;
//! [`MockDnsBackend`] keeps zones in memory, applies changes to them and
//! records every mutation, for tests.
//!
//! ```
//! use powerdns::backend::{DnsBackend, MockDnsBackend};
//! use powerdns::{RRSet, Zone};
//!
//! let mock = MockDnsBackend::new();
//! mock.add_zone(Zone::new("example.com."));
//!
//! let rrset = RRSet::new("host1.example.com.", "A", 3600, &["10.0.0.5"], "NetBox");
//! mock.create_rrset("example.com.", &rrset).unwrap();
//!
//! let zone = mock.zone("example.com.").unwrap().unwrap();
//! assert_eq!(zone.rrsets.len(), 1);
//! ```

pub mod api;

use crate::error::{Error, Result};
use crate::types::{ChangeType, RRSet, Zone};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Zone-scoped access to an authoritative DNS backend.
pub trait DnsBackend: Send + Sync {
    /// Fetch a zone with all its rrsets, `None` if it does not exist.
    fn zone(&self, name: &str) -> Result<Option<Zone>>;

    /// Create `rrset` in `zone`, replacing any rrset of the same name and type.
    fn create_rrset(&self, zone: &str, rrset: &RRSet) -> Result<()>;

    /// Delete the rrset with `rrset`'s name and type from `zone`.
    fn delete_rrset(&self, zone: &str, rrset: &RRSet) -> Result<()>;
}

/// A mutation seen by [`MockDnsBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub zone: String,
    pub change: ChangeType,
    pub rrset: RRSet,
}

/// In-memory DNS backend for testing without network access.
#[derive(Debug, Clone, Default)]
pub struct MockDnsBackend {
    zones: Arc<Mutex<BTreeMap<String, Zone>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
    fail_on: Arc<Mutex<Option<String>>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockDnsBackend {
    /// Create a new backend with no zones.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a zone.
    pub fn add_zone(&self, zone: Zone) {
        locked(&self.zones).insert(zone.name.clone(), zone);
    }

    /// Add an rrset to an existing zone, bypassing the call log.
    pub fn seed_rrset(&self, zone: &str, rrset: RRSet) {
        if let Some(z) = locked(&self.zones).get_mut(zone) {
            z.rrsets.push(rrset);
        }
    }

    /// Make mutations of rrsets named `name` fail.
    pub fn fail_on(&self, name: impl Into<String>) {
        *locked(&self.fail_on) = Some(name.into());
    }

    /// Mutations made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        locked(&self.calls).clone()
    }

    /// Forget recorded mutations.
    pub fn clear_calls(&self) {
        locked(&self.calls).clear();
    }

    fn mutate(&self, zone: &str, rrset: &RRSet, change: ChangeType) -> Result<()> {
        if locked(&self.fail_on).as_deref() == Some(rrset.name.as_str()) {
            return Err(Error::http("HTTP 500", Some(500)));
        }

        let mut zones = locked(&self.zones);
        let target = zones
            .get_mut(zone)
            .ok_or_else(|| Error::ZoneNotFound(zone.to_string()))?;

        target.rrsets.retain(|r| !r.same_set(rrset));
        if change == ChangeType::Replace {
            let mut stored = rrset.clone();
            stored.changetype = None;
            target.rrsets.push(stored);
        }

        locked(&self.calls).push(MockCall {
            zone: zone.to_string(),
            change,
            rrset: rrset.clone(),
        });
        Ok(())
    }
}

impl DnsBackend for MockDnsBackend {
    fn zone(&self, name: &str) -> Result<Option<Zone>> {
        Ok(locked(&self.zones).get(name).cloned())
    }

    fn create_rrset(&self, zone: &str, rrset: &RRSet) -> Result<()> {
        self.mutate(zone, rrset, ChangeType::Replace)
    }

    fn delete_rrset(&self, zone: &str, rrset: &RRSet) -> Result<()> {
        self.mutate(zone, rrset, ChangeType::Delete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rrset(name: &str, content: &str) -> RRSet {
        RRSet::new(name, "A", 3600, &[content], "NetBox")
    }

    #[test]
    fn test_mock_missing_zone() {
        let mock = MockDnsBackend::new();
        assert!(mock.zone("example.com.").unwrap().is_none());

        let err = mock
            .create_rrset("example.com.", &rrset("a.example.com.", "10.0.0.1"))
            .unwrap_err();
        assert!(matches!(err, Error::ZoneNotFound(_)));
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_mock_create_replaces_same_set() {
        let mock = MockDnsBackend::new();
        mock.add_zone(Zone::new("example.com."));
        mock.create_rrset("example.com.", &rrset("a.example.com.", "10.0.0.1"))
            .unwrap();
        mock.create_rrset("example.com.", &rrset("a.example.com.", "10.0.0.2"))
            .unwrap();

        let zone = mock.zone("example.com.").unwrap().unwrap();
        assert_eq!(zone.rrsets.len(), 1);
        assert_eq!(zone.rrsets[0].records[0].content, "10.0.0.2");
        assert_eq!(mock.calls().len(), 2);
    }

    #[test]
    fn test_mock_delete_removes_whole_set() {
        let mock = MockDnsBackend::new();
        mock.add_zone(Zone::new("example.com."));
        mock.seed_rrset(
            "example.com.",
            RRSet::new("a.example.com.", "A", 3600, &["10.0.0.1", "10.0.0.2"], "NetBox"),
        );

        mock.delete_rrset("example.com.", &rrset("a.example.com.", "10.0.0.1"))
            .unwrap();

        let zone = mock.zone("example.com.").unwrap().unwrap();
        assert!(zone.rrsets.is_empty());
        assert_eq!(mock.calls()[0].change, ChangeType::Delete);
    }

    #[test]
    fn test_mock_failure() {
        let mock = MockDnsBackend::new();
        mock.add_zone(Zone::new("example.com."));
        mock.fail_on("bad.example.com.");

        assert!(
            mock.create_rrset("example.com.", &rrset("bad.example.com.", "10.0.0.1"))
                .is_err()
        );
        assert!(
            mock.create_rrset("example.com.", &rrset("good.example.com.", "10.0.0.2"))
                .is_ok()
        );
        assert_eq!(mock.calls().len(), 1);
    }
}
