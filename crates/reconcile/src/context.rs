//! Writer trait for the DNS side of an apply
//!
//! This keeps the reconciler free of any particular DNS backend client.

use crate::record::RecordSet;
use anyhow::Result;
use std::cell::RefCell;

/// Performs rrset mutations against a DNS backend
///
/// Each call handles exactly one rrset. The writer is responsible for
/// attaching the ownership tag on replace.
pub trait RecordWriter {
    /// Make `rrset.values` the only values of the rrset
    fn replace(&self, rrset: &RecordSet) -> Result<()>;

    /// Remove the rrset with `rrset`'s name and type
    fn delete(&self, rrset: &RecordSet) -> Result<()>;
}

/// A single call seen by [`RecordingWriter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriterCall {
    Replace(RecordSet),
    Delete(RecordSet),
}

/// In-memory writer that records every call, optionally failing on one name
///
/// Useful for exercising apply without a backend.
#[derive(Debug, Default)]
pub struct RecordingWriter {
    calls: RefCell<Vec<WriterCall>>,
    fail_on: Option<String>,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer that errors when asked to touch the rrset named `name`
    pub fn failing_on(name: impl Into<String>) -> Self {
        Self {
            calls: RefCell::default(),
            fail_on: Some(name.into()),
        }
    }

    /// Calls made so far, in order
    pub fn calls(&self) -> Vec<WriterCall> {
        self.calls.borrow().clone()
    }

    fn check(&self, rrset: &RecordSet) -> Result<()> {
        if self.fail_on.as_deref() == Some(rrset.name.as_str()) {
            anyhow::bail!("backend rejected {}", rrset.name);
        }
        Ok(())
    }
}

impl RecordWriter for RecordingWriter {
    fn replace(&self, rrset: &RecordSet) -> Result<()> {
        self.check(rrset)?;
        self.calls.borrow_mut().push(WriterCall::Replace(rrset.clone()));
        Ok(())
    }

    fn delete(&self, rrset: &RecordSet) -> Result<()> {
        self.check(rrset)?;
        self.calls.borrow_mut().push(WriterCall::Delete(rrset.clone()));
        Ok(())
    }
}
