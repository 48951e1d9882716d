//! Inventory objects and query filters.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// IP address family as reported by NetBox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    /// Family from NetBox's numeric `family.value`.
    #[must_use]
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            4 => Some(Self::V4),
            6 => Some(Self::V6),
            _ => None,
        }
    }
}

/// An IPAM IP address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpAddress {
    pub id: u64,
    /// Address with prefix length, e.g. `10.0.0.5/24`.
    pub address: String,
    pub family: AddressFamily,
    /// Associated DNS name, empty when unset.
    pub dns_name: String,
    pub status: String,
    #[serde(default)]
    pub custom_fields: HashMap<String, Value>,
}

impl IpAddress {
    /// Address without the prefix length.
    #[must_use]
    pub fn bare_address(&self) -> &str {
        self.address.split('/').next().unwrap_or(&self.address)
    }
}

/// A device or virtual machine.
///
/// Both carry the same fields the reconciler needs, so one type serves both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub id: u64,
    pub name: String,
    pub status: String,
    /// Primary IPv4 address with prefix length.
    pub primary_ip4: Option<String>,
    /// Primary IPv6 address with prefix length.
    pub primary_ip6: Option<String>,
}

/// Filter for IP address queries.
///
/// Unset fields do not constrain the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressQuery {
    /// Case-insensitive suffix of `dns_name` (`dns_name__iew`).
    pub dns_name_suffix: Option<String>,
    /// Parent prefix the address must fall within (`parent`).
    pub parent: Option<String>,
    /// Allowed status values (`status`, repeated).
    pub statuses: Vec<String>,
    /// Boolean custom field that must be `false` (`cf_<name>=false`).
    pub custom_flag_false: Option<String>,
}

impl AddressQuery {
    /// Query parameters in NetBox filter syntax.
    #[must_use]
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(suffix) = &self.dns_name_suffix {
            params.push(("dns_name__iew".to_string(), suffix.clone()));
        }
        if let Some(parent) = &self.parent {
            params.push(("parent".to_string(), parent.clone()));
        }
        for status in &self.statuses {
            params.push(("status".to_string(), status.clone()));
        }
        if let Some(field) = &self.custom_flag_false {
            params.push((format!("cf_{field}"), "false".to_string()));
        }
        params
    }
}

/// Filter for device and virtual machine queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostQuery {
    /// Case-insensitive suffix of the name (`name__iew`).
    pub name_suffix: Option<String>,
    /// Allowed status values (`status`, repeated).
    pub statuses: Vec<String>,
}

impl HostQuery {
    /// Query parameters in NetBox filter syntax.
    #[must_use]
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(suffix) = &self.name_suffix {
            params.push(("name__iew".to_string(), suffix.clone()));
        }
        for status in &self.statuses {
            params.push(("status".to_string(), status.clone()));
        }
        params
    }
}
