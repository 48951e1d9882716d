//! Error types for reconciliation

use crate::record::{RecordKey, RecordSet};
use crate::types::ChangeKind;
use thiserror::Error;

/// Errors that stop a reconciliation run
#[derive(Error, Debug)]
pub enum Error {
    /// Inventory claims more than one record for the same name and type
    #[error("duplicate desired records: {}", join_keys(.0))]
    DuplicateRecords(Vec<RecordKey>),

    /// A configured reverse zone is not provisioned in the DNS backend
    #[error("reverse zone {0} does not exist in the DNS backend")]
    MissingReverseZone(String),

    /// Records would be created over rrsets that lack the ownership tag
    #[error("untagged records in the DNS backend block changes: {}", join_sets(.0))]
    UnmanagedConflict(Vec<RecordSet>),

    /// A replace or delete call against the DNS backend failed
    #[error("failed to {kind} {rrset}: {message}")]
    Apply {
        kind: ChangeKind,
        rrset: RecordSet,
        message: String,
    },

    /// A record could not be built from backend data
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

impl Error {
    /// Whether this is the deliberate duplicate-abort rather than a failure
    pub fn is_duplicate_abort(&self) -> bool {
        matches!(self, Self::DuplicateRecords(_))
    }
}

fn join_keys(keys: &[RecordKey]) -> String {
    keys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_sets(sets: &[RecordSet]) -> String {
    sets.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;
