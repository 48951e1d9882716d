//! Core types for applying a changeset

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two rrset mutations the reconciler ever performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    /// Write the full set of desired values
    Replace,
    /// Remove an rrset with no desired values left
    Delete,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace => f.write_str("replace"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

/// Options for applying a changeset
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Report the plan but make no backend calls
    pub dry_run: bool,
}

/// Summary of an apply pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplySummary {
    pub replaced: usize,
    pub deleted: usize,
    /// Rrset changes that were planned but not applied (dry run)
    pub skipped: usize,
}

impl ApplySummary {
    /// Total number of backend mutations made
    pub fn total_changes(&self) -> usize {
        self.replaced + self.deleted
    }

    /// Record one applied change
    pub fn add(&mut self, kind: ChangeKind) {
        match kind {
            ChangeKind::Replace => self.replaced += 1,
            ChangeKind::Delete => self.deleted += 1,
        }
    }
}
