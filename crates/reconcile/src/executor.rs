//! Apply engine - turns a changeset into backend calls
//!
//! The DNS backend writes whole rrsets, so record changes are grouped by
//! zone, name and type first. An rrset that still has desired values is
//! replaced with exactly those values. Only an rrset with none left is
//! deleted. Calls run strictly one after another, deletes first.

use crate::context::RecordWriter;
use crate::diff::Changeset;
use crate::error::{Error, Result};
use crate::record::RecordSet;
use crate::types::{ApplyOptions, ApplySummary, ChangeKind};
use std::collections::BTreeMap;

/// Log the full plan: counts and every record, creates then deletes
pub fn log_plan(changeset: &Changeset) {
    log::info!("{} records to create", changeset.to_create.len());
    for record in &changeset.to_create {
        log::info!("Will create record {record}");
    }

    log::info!("{} records to delete", changeset.to_delete.len());
    for record in &changeset.to_delete {
        log::info!("Will delete record {record}");
    }
}

/// One backend call per rrset touched by `changeset`, deletes first
pub fn rrset_changes(changeset: &Changeset) -> Vec<(ChangeKind, RecordSet)> {
    let mut sets: BTreeMap<RecordSet, Vec<String>> = BTreeMap::new();

    for record in &changeset.to_delete {
        sets.entry(RecordSet::of(record)).or_default();
    }
    for record in changeset.to_create.iter().chain(&changeset.retained) {
        sets.entry(RecordSet::of(record))
            .or_default()
            .push(record.value.clone());
    }

    let (deletes, replaces): (Vec<_>, Vec<_>) = sets
        .into_iter()
        .map(|(mut rrset, values)| {
            rrset.values = values;
            rrset.values.sort();
            rrset
        })
        .partition(|rrset| rrset.values.is_empty());

    deletes
        .into_iter()
        .map(|rrset| (ChangeKind::Delete, rrset))
        .chain(replaces.into_iter().map(|rrset| (ChangeKind::Replace, rrset)))
        .collect()
}

/// Apply a changeset through `writer`
///
/// The plan is always logged first. In dry-run mode nothing else happens.
/// The first failing call aborts the pass; changes already made stay.
pub fn apply<W: RecordWriter + ?Sized>(
    changeset: &Changeset,
    writer: &W,
    opts: &ApplyOptions,
) -> Result<ApplySummary> {
    log_plan(changeset);
    let changes = rrset_changes(changeset);

    if opts.dry_run {
        log::info!("Skipping create/delete due to dry run");
        return Ok(ApplySummary {
            skipped: changes.len(),
            ..Default::default()
        });
    }

    let mut summary = ApplySummary::default();

    for (kind, rrset) in &changes {
        match kind {
            ChangeKind::Delete => log::info!("Now deleting {rrset}"),
            ChangeKind::Replace => log::info!("Now writing {rrset}"),
        }
        apply_one(writer, *kind, rrset)?;
        summary.add(*kind);
    }

    Ok(summary)
}

fn apply_one<W: RecordWriter + ?Sized>(writer: &W, kind: ChangeKind, rrset: &RecordSet) -> Result<()> {
    let outcome = match kind {
        ChangeKind::Replace => writer.replace(rrset),
        ChangeKind::Delete => writer.delete(rrset),
    };

    outcome.map_err(|e| {
        log::error!("Failed to {kind} {rrset}: {e:#}");
        Error::Apply {
            kind,
            rrset: rrset.clone(),
            message: format!("{e:#}"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{RecordingWriter, WriterCall};
    use crate::diff::diff;
    use crate::record::{Record, RecordType};

    fn a(name: &str, value: &str) -> Record {
        Record::new(name, RecordType::A, value, "example.com.")
    }

    fn set(name: &str, values: &[&str]) -> RecordSet {
        RecordSet {
            name: name.to_string(),
            rtype: RecordType::A,
            zone: "example.com.".to_string(),
            values: values.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_apply_empty_changeset() {
        let writer = RecordingWriter::new();
        let summary = apply(&Changeset::default(), &writer, &ApplyOptions::default()).unwrap();
        assert_eq!(summary.total_changes(), 0);
        assert!(writer.calls().is_empty());
    }

    #[test]
    fn test_apply_dry_run_makes_no_calls() {
        let changes = diff(&[a("new.example.com.", "10.0.0.1")], &[a("old.example.com.", "10.0.0.2")]);
        let writer = RecordingWriter::new();
        let summary = apply(&changes, &writer, &ApplyOptions { dry_run: true }).unwrap();

        assert!(writer.calls().is_empty());
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.total_changes(), 0);
    }

    #[test]
    fn test_apply_changed_address_is_one_replace() {
        let old = a("moved.example.com.", "10.0.0.7");
        let new = a("moved.example.com.", "10.0.0.8");
        let changes = diff(std::slice::from_ref(&new), std::slice::from_ref(&old));

        let writer = RecordingWriter::new();
        let summary = apply(&changes, &writer, &ApplyOptions::default()).unwrap();

        assert_eq!(
            writer.calls(),
            vec![WriterCall::Replace(set("moved.example.com.", &["10.0.0.8"]))]
        );
        assert_eq!((summary.replaced, summary.deleted), (1, 0));
    }

    #[test]
    fn test_apply_partial_delete_keeps_desired_values() {
        let kept = a("host1.example.com.", "10.0.0.5");
        let stale = a("host1.example.com.", "10.0.0.6");
        let changes = diff(std::slice::from_ref(&kept), &[kept.clone(), stale]);

        let writer = RecordingWriter::new();
        apply(&changes, &writer, &ApplyOptions::default()).unwrap();

        assert_eq!(
            writer.calls(),
            vec![WriterCall::Replace(set("host1.example.com.", &["10.0.0.5"]))]
        );
    }

    #[test]
    fn test_apply_delete_path_never_creates() {
        let changes = diff(
            &[],
            &[a("stale.example.com.", "10.0.0.9"), a("stale.example.com.", "10.0.0.10")],
        );
        let writer = RecordingWriter::new();
        apply(&changes, &writer, &ApplyOptions::default()).unwrap();
        assert_eq!(
            writer.calls(),
            vec![WriterCall::Delete(set("stale.example.com.", &[]))]
        );
    }

    #[test]
    fn test_rrset_changes_deletes_first() {
        let changes = diff(&[a("a.example.com.", "10.0.0.1")], &[a("z.example.com.", "10.0.0.2")]);
        let kinds: Vec<ChangeKind> = rrset_changes(&changes).into_iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![ChangeKind::Delete, ChangeKind::Replace]);
    }

    #[test]
    fn test_apply_stops_on_first_failure() {
        let changes = diff(
            &[
                a("a.example.com.", "10.0.0.1"),
                a("b.example.com.", "10.0.0.2"),
                a("c.example.com.", "10.0.0.3"),
            ],
            &[],
        );

        let writer = RecordingWriter::failing_on("b.example.com.");
        let err = apply(&changes, &writer, &ApplyOptions::default()).unwrap_err();

        match err {
            Error::Apply { kind, rrset, .. } => {
                assert_eq!(kind, ChangeKind::Replace);
                assert_eq!(rrset, set("b.example.com.", &["10.0.0.2"]));
            }
            other => panic!("Expected Error::Apply, got {other:?}"),
        }
        assert_eq!(
            writer.calls(),
            vec![WriterCall::Replace(set("a.example.com.", &["10.0.0.1"]))]
        );
    }
}
