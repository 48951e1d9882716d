//! Blocking NetBox client.
//!
//! Reads the inventory objects that carry DNS information:
//!
//! - IPAM IP addresses, with their `dns_name`, family and status
//! - DCIM devices and virtualization VMs, with their primary addresses
//!
//! Access goes through the [`backend::Inventory`] trait so callers can swap
//! the live [`backend::api::NetBoxClient`] for [`backend::MockInventory`].

pub mod backend;
pub mod error;
pub mod types;

pub use backend::api::NetBoxClient;
pub use backend::{Inventory, MockInventory};
pub use error::{Error, ErrorCategory, Result};
pub use types::{AddressFamily, AddressQuery, Host, HostQuery, IpAddress};
