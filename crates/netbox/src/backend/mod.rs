//! Inventory trait and implementations.
//!
//! [`Inventory`] is the read-only view of NetBox that the reconciler needs.
//! [`api::NetBoxClient`] talks to a live instance; [`MockInventory`] holds
//! objects in memory and applies the same filters, for tests.
//!
//! ```
//! use netbox::backend::{Inventory, MockInventory};
//! use netbox::{AddressFamily, HostQuery, IpAddress};
//!
//! let mut mock = MockInventory::new();
//! mock.add_address(IpAddress {
//!     id: 1,
//!     address: "10.0.0.5/24".to_string(),
//!     family: AddressFamily::V4,
//!     dns_name: "host1.example.com".to_string(),
//!     status: "active".to_string(),
//!     custom_fields: Default::default(),
//! });
//!
//! let hosts = mock.devices(&HostQuery::default()).unwrap();
//! assert!(hosts.is_empty());
//! ```

pub mod api;

use crate::error::{Error, Result};
use crate::types::{AddressQuery, Host, HostQuery, IpAddress};
use ipnet::IpNet;
use serde_json::Value;
use std::net::IpAddr;

/// Read access to the inventory source.
pub trait Inventory: Send + Sync {
    /// IP addresses matching `query`, across all pages.
    fn ip_addresses(&self, query: &AddressQuery) -> Result<Vec<IpAddress>>;

    /// Devices matching `query`, across all pages.
    fn devices(&self, query: &HostQuery) -> Result<Vec<Host>>;

    /// Virtual machines matching `query`, across all pages.
    fn virtual_machines(&self, query: &HostQuery) -> Result<Vec<Host>>;
}

/// In-memory inventory for testing without network access.
#[derive(Debug, Clone, Default)]
pub struct MockInventory {
    addresses: Vec<IpAddress>,
    devices: Vec<Host>,
    virtual_machines: Vec<Host>,
    fail_status: Option<u16>,
}

impl MockInventory {
    /// Create a new empty mock inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_address(&mut self, address: IpAddress) {
        self.addresses.push(address);
    }

    pub fn add_device(&mut self, device: Host) {
        self.devices.push(device);
    }

    pub fn add_virtual_machine(&mut self, vm: Host) {
        self.virtual_machines.push(vm);
    }

    /// Make every query fail with the given HTTP status.
    pub fn fail_with_status(&mut self, status: u16) {
        self.fail_status = Some(status);
    }

    /// Remove all addresses matching `predicate`.
    pub fn remove_addresses<F: Fn(&IpAddress) -> bool>(&mut self, predicate: F) {
        self.addresses.retain(|a| !predicate(a));
    }

    fn check_failure(&self) -> Result<()> {
        match self.fail_status {
            Some(status) => Err(Error::http(format!("HTTP {status}"), Some(status))),
            None => Ok(()),
        }
    }
}

fn ends_with_ignore_case(value: &str, suffix: &str) -> bool {
    value.to_lowercase().ends_with(&suffix.to_lowercase())
}

fn status_allowed(status: &str, statuses: &[String]) -> bool {
    statuses.is_empty() || statuses.iter().any(|s| s == status)
}

fn address_matches(address: &IpAddress, query: &AddressQuery, parent: Option<&IpNet>) -> bool {
    if let Some(suffix) = &query.dns_name_suffix
        && !ends_with_ignore_case(&address.dns_name, suffix)
    {
        return false;
    }

    if let Some(net) = parent {
        match address.bare_address().parse::<IpAddr>() {
            Ok(ip) if net.contains(&ip) => {}
            _ => return false,
        }
    }

    if !status_allowed(&address.status, &query.statuses) {
        return false;
    }

    // NetBox only matches an explicit false, never an unset field
    if let Some(field) = &query.custom_flag_false
        && address.custom_fields.get(field) != Some(&Value::Bool(false))
    {
        return false;
    }

    true
}

fn host_matches(host: &Host, query: &HostQuery) -> bool {
    if let Some(suffix) = &query.name_suffix
        && !ends_with_ignore_case(&host.name, suffix)
    {
        return false;
    }
    status_allowed(&host.status, &query.statuses)
}

impl Inventory for MockInventory {
    fn ip_addresses(&self, query: &AddressQuery) -> Result<Vec<IpAddress>> {
        self.check_failure()?;

        let parent = query
            .parent
            .as_deref()
            .map(|p| {
                p.parse::<IpNet>()
                    .map_err(|e| Error::InvalidQuery(format!("parent '{p}': {e}")))
            })
            .transpose()?;

        Ok(self
            .addresses
            .iter()
            .filter(|a| address_matches(a, query, parent.as_ref()))
            .cloned()
            .collect())
    }

    fn devices(&self, query: &HostQuery) -> Result<Vec<Host>> {
        self.check_failure()?;
        Ok(self
            .devices
            .iter()
            .filter(|h| host_matches(h, query))
            .cloned()
            .collect())
    }

    fn virtual_machines(&self, query: &HostQuery) -> Result<Vec<Host>> {
        self.check_failure()?;
        Ok(self
            .virtual_machines
            .iter()
            .filter(|h| host_matches(h, query))
            .cloned()
            .collect())
    }
}
