//! # Reconcile
//!
//! One-way reconciliation of DNS record sets.
//!
//! Desired state and actual state are both reduced to [`Record`] tuples. The
//! crate then guards against ambiguous desired state, computes what to create
//! and delete, and applies the result through a [`RecordWriter`].
//!
//! ## Core Concepts
//!
//! - **Record**: `(name, type, value, zone)`, compared as a whole tuple
//! - **Duplicate guard**: desired state may claim each `(name, type)` once
//! - **Changeset**: `desired - actual` to create, `actual - desired` to delete
//! - **Unmanaged guard**: never create over an rrset that lacks the ownership tag
//! - **Apply**: one replace or delete per touched rrset, or a logged plan on dry run
//!
//! ## Example
//!
//! ```ignore
//! use reconcile::{apply, plan, ApplyOptions, Record, RecordType, RecordingWriter};
//!
//! let desired = vec![Record::new(
//!     "host1.example.com.", RecordType::A, "10.0.0.5", "example.com.",
//! )];
//! let changes = plan(&desired, &[], &[])?;
//! let summary = apply(&changes, &RecordingWriter::new(), &ApplyOptions::default())?;
//! assert_eq!(summary.replaced, 1);
//! ```
//!
//! Nothing here does network I/O. Backend clients plug in by implementing
//! [`RecordWriter`] and by producing [`Record`]s for the collectors.

pub mod context;
pub mod diff;
pub mod error;
pub mod executor;
pub mod record;
pub mod types;

// Re-export main types at crate root
pub use context::{RecordWriter, RecordingWriter, WriterCall};
pub use diff::{
    diff, find_duplicates, guard_duplicates, guard_unmanaged, plan, ChangeSummary, Changeset,
};
pub use error::{Error, Result};
pub use executor::{apply, log_plan, rrset_changes};
pub use record::{
    canonicalize, is_below_zone, normalize_address, owning_zone, parse_address,
    reverse_pointer, Record, RecordKey, RecordSet, RecordType,
};
pub use types::{ApplyOptions, ApplySummary, ChangeKind};
