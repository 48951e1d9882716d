//! Duplicate detection and diff computation over record sets

use crate::error::{Error, Result};
use crate::record::{Record, RecordKey, RecordSet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Records to create and delete to make actual state match desired state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changeset {
    /// In desired state but not in the backend
    pub to_create: BTreeSet<Record>,
    /// Tagged in the backend but no longer desired
    pub to_delete: BTreeSet<Record>,
    /// Desired and already present, in an rrset that has other changes
    ///
    /// The backend rewrites whole rrsets, so these values must be written
    /// again alongside the creates and deletes of their rrset.
    #[serde(default)]
    pub retained: BTreeSet<Record>,
}

impl Changeset {
    /// Total number of changes
    pub fn len(&self) -> usize {
        self.to_create.len() + self.to_delete.len()
    }

    /// Check if there are any changes
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty()
    }

    /// Count summary of this changeset
    pub fn summary(&self) -> ChangeSummary {
        ChangeSummary {
            creates: self.to_create.len(),
            deletes: self.to_delete.len(),
        }
    }
}

/// Diff summary statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub creates: usize,
    pub deletes: usize,
}

impl ChangeSummary {
    pub fn total(&self) -> usize {
        self.creates + self.deletes
    }

    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}

/// Keys claimed by more than one desired record
///
/// Identical tuples count too: a record reported twice is still ambiguous
/// about where it came from.
pub fn find_duplicates(desired: &[Record]) -> BTreeSet<RecordKey> {
    let mut counts: BTreeMap<RecordKey, usize> = BTreeMap::new();
    for record in desired {
        *counts.entry(record.key()).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(key, _)| key)
        .collect()
}

/// Refuse desired state that names the same record twice
///
/// Every duplicate key is logged at error level before returning
/// [`Error::DuplicateRecords`].
pub fn guard_duplicates(desired: &[Record]) -> Result<()> {
    let duplicates = find_duplicates(desired);
    if duplicates.is_empty() {
        return Ok(());
    }

    for key in &duplicates {
        log::error!(
            "Detected duplicate record from NetBox {} of type {}. \
             Not continuing execution. Please resolve the duplicate.",
            key.name,
            key.rtype
        );
    }
    Err(Error::DuplicateRecords(duplicates.into_iter().collect()))
}

/// Refuse to write over rrsets that exist without the ownership tag
///
/// Creating a record replaces its whole rrset, so a create whose name, type
/// and zone match an untagged rrset would take it over. Every conflict is
/// logged at error level before returning [`Error::UnmanagedConflict`].
pub fn guard_unmanaged(changeset: &Changeset, unmanaged: &[RecordSet]) -> Result<()> {
    let conflicts: Vec<RecordSet> = unmanaged
        .iter()
        .filter(|set| changeset.to_create.iter().any(|r| set.holds(r)))
        .cloned()
        .collect();
    if conflicts.is_empty() {
        return Ok(());
    }

    for set in &conflicts {
        log::error!(
            "Record {set} exists in PowerDNS without the ownership tag. \
             Not continuing execution. Remove it or tag it to let NetBox manage it."
        );
    }
    Err(Error::UnmanagedConflict(conflicts))
}

/// Set difference in both directions
pub fn diff(desired: &[Record], actual: &[Record]) -> Changeset {
    let desired: BTreeSet<&Record> = desired.iter().collect();
    let actual: BTreeSet<&Record> = actual.iter().collect();

    let to_create: BTreeSet<Record> = desired.difference(&actual).map(|r| (*r).clone()).collect();
    let to_delete: BTreeSet<Record> = actual.difference(&desired).map(|r| (*r).clone()).collect();

    let touched: BTreeSet<RecordSet> = to_create.iter().chain(&to_delete).map(RecordSet::of).collect();
    let retained = desired
        .intersection(&actual)
        .filter(|r| touched.contains(&RecordSet::of(r)))
        .map(|r| (*r).clone())
        .collect();

    Changeset {
        to_create,
        to_delete,
        retained,
    }
}

/// Guard against duplicates and untagged rrsets, then diff
pub fn plan(desired: &[Record], actual: &[Record], unmanaged: &[RecordSet]) -> Result<Changeset> {
    guard_duplicates(desired)?;
    let changeset = diff(desired, actual);
    guard_unmanaged(&changeset, unmanaged)?;
    Ok(changeset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordType;

    fn a(name: &str, value: &str) -> Record {
        Record::new(name, RecordType::A, value, "example.com.")
    }

    #[test]
    fn test_diff_create_only() {
        let desired = vec![a("host1.example.com.", "10.0.0.5")];
        let changes = diff(&desired, &[]);
        assert_eq!(changes.to_create.len(), 1);
        assert!(changes.to_create.contains(&desired[0]));
        assert!(changes.to_delete.is_empty());
    }

    #[test]
    fn test_diff_delete_only() {
        let actual = vec![a("stale.example.com.", "10.0.0.9")];
        let changes = diff(&[], &actual);
        assert!(changes.to_create.is_empty());
        assert_eq!(changes.to_delete.len(), 1);
        assert!(changes.to_delete.contains(&actual[0]));
    }

    #[test]
    fn test_diff_in_sync_is_empty() {
        let records = vec![a("host1.example.com.", "10.0.0.5"), a("host2.example.com.", "10.0.0.6")];
        let changes = diff(&records, &records);
        assert!(changes.is_empty());
        assert!(!changes.summary().has_changes());
    }

    #[test]
    fn test_diff_is_disjoint() {
        let desired = vec![
            a("host1.example.com.", "10.0.0.5"),
            a("host2.example.com.", "10.0.0.6"),
            a("moved.example.com.", "10.0.0.8"),
        ];
        let actual = vec![
            a("host2.example.com.", "10.0.0.6"),
            a("moved.example.com.", "10.0.0.7"),
            a("stale.example.com.", "10.0.0.9"),
        ];
        let changes = diff(&desired, &actual);
        assert!(changes.to_create.is_disjoint(&changes.to_delete));
        assert_eq!(changes.summary(), ChangeSummary { creates: 2, deletes: 2 });
    }

    #[test]
    fn test_diff_zone_is_part_of_identity() {
        let desired = vec![Record::new("h.example.com.", RecordType::A, "10.0.0.1", "example.com.")];
        let actual = vec![Record::new("h.example.com.", RecordType::A, "10.0.0.1", "other.")];
        let changes = diff(&desired, &actual);
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn test_find_duplicates() {
        let desired = vec![
            a("dup.example.com.", "10.0.0.1"),
            a("dup.example.com.", "10.0.0.2"),
            a("ok.example.com.", "10.0.0.3"),
            Record::new("ok.example.com.", RecordType::Aaaa, "::1", "example.com."),
        ];
        let dups = find_duplicates(&desired);
        assert_eq!(dups.len(), 1);
        assert!(dups.contains(&RecordKey {
            name: "dup.example.com.".to_string(),
            rtype: RecordType::A,
        }));
    }

    #[test]
    fn test_plan_refuses_duplicates() {
        let desired = vec![a("dup.example.com.", "10.0.0.1"), a("dup.example.com.", "10.0.0.2")];
        let err = plan(&desired, &[], &[]).unwrap_err();
        assert!(err.is_duplicate_abort());
    }

    #[test]
    fn test_plan_passes_clean_state() {
        let desired = vec![a("host1.example.com.", "10.0.0.5")];
        let changes = plan(&desired, &[], &[]).unwrap();
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn test_diff_retains_surviving_values_of_touched_rrsets() {
        let kept = a("host1.example.com.", "10.0.0.5");
        let stale = a("host1.example.com.", "10.0.0.6");
        let other = a("host2.example.com.", "10.0.0.7");
        let desired = vec![kept.clone(), other.clone()];
        let actual = vec![kept.clone(), stale.clone(), other];

        let changes = diff(&desired, &actual);
        assert!(changes.to_create.is_empty());
        assert_eq!(changes.to_delete, BTreeSet::from([stale]));
        assert_eq!(changes.retained, BTreeSet::from([kept]));
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn test_plan_refuses_create_over_untagged_rrset() {
        let desired = vec![a("www.example.com.", "10.0.0.5"), a("host1.example.com.", "10.0.0.6")];
        let mut hand_made = RecordSet::of(&desired[0]);
        hand_made.values = vec!["192.0.2.80".to_string()];

        let err = plan(&desired, &[], std::slice::from_ref(&hand_made)).unwrap_err();
        match err {
            Error::UnmanagedConflict(sets) => assert_eq!(sets, vec![hand_made]),
            other => panic!("Expected Error::UnmanagedConflict, got {other:?}"),
        }
    }

    #[test]
    fn test_untagged_rrset_of_other_type_is_no_conflict() {
        let desired = vec![a("www.example.com.", "10.0.0.5")];
        let aaaa = RecordSet {
            name: "www.example.com.".to_string(),
            rtype: RecordType::Aaaa,
            zone: "example.com.".to_string(),
            values: vec!["2001:db8::80".to_string()],
        };
        assert!(plan(&desired, &[], &[aaaa]).is_ok());
    }
}
