//! Zone and rrset types, shaped like the PowerDNS API objects.

use serde::{Deserialize, Serialize};

/// Default TTL for rrsets created by this client.
pub const DEFAULT_TTL: u32 = 3600;

/// An authoritative zone with its rrsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Canonical zone name (trailing dot).
    pub name: String,
    #[serde(default)]
    pub rrsets: Vec<RRSet>,
}

impl Zone {
    /// Create an empty zone.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rrsets: Vec::new(),
        }
    }
}

/// How a PATCH changes an rrset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    /// Replace every record of the rrset.
    Replace,
    /// Remove the whole rrset.
    Delete,
}

/// All records of one name and type, plus their comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RRSet {
    pub name: String,
    #[serde(rename = "type")]
    pub rtype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(default)]
    pub records: Vec<RecordEntry>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changetype: Option<ChangeType>,
}

impl RRSet {
    /// Enabled records for `contents`, commented with `comment`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        rtype: impl Into<String>,
        ttl: u32,
        contents: &[&str],
        comment: &str,
    ) -> Self {
        Self {
            name: name.into(),
            rtype: rtype.into(),
            ttl: Some(ttl),
            records: contents
                .iter()
                .map(|c| RecordEntry {
                    content: (*c).to_string(),
                    disabled: false,
                })
                .collect(),
            comments: vec![Comment::new(comment)],
            changetype: None,
        }
    }

    /// Whether any comment's content is exactly `tag`.
    #[must_use]
    pub fn has_comment(&self, tag: &str) -> bool {
        self.comments.iter().any(|c| c.content == tag)
    }

    /// Record contents, one per value.
    pub fn contents(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.content.as_str())
    }

    /// Same name and type as `other`.
    #[must_use]
    pub fn same_set(&self, other: &RRSet) -> bool {
        self.name == other.name && self.rtype == other.rtype
    }
}

/// A single record value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEntry {
    pub content: String,
    #[serde(default)]
    pub disabled: bool,
}

/// An rrset comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub content: String,
    #[serde(default)]
    pub account: String,
}

impl Comment {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            account: String::new(),
        }
    }
}

/// PATCH request body.
#[derive(Debug, Serialize)]
pub(crate) struct RRSetPatch<'a> {
    pub rrsets: Vec<&'a RRSet>,
}
