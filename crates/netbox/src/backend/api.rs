//! NetBox REST API backend.
//!
//! This module provides [`NetBoxClient`], a blocking client for the parts of
//! the NetBox API the reconciler reads: IPAM IP addresses, DCIM devices and
//! virtualization virtual machines.
//!
//! # Pagination
//!
//! List endpoints return pages of `limit` objects with a `next` link. The
//! client follows `next` until it is null, so callers always see the full
//! result set.

use crate::backend::Inventory;
use crate::error::{Error, Result};
use crate::types::{AddressFamily, AddressQuery, Host, HostQuery, IpAddress};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Default number of objects requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// NetBox API client.
///
/// # Example
///
/// ```no_run
/// use netbox::backend::api::NetBoxClient;
/// use netbox::backend::Inventory;
/// use netbox::HostQuery;
///
/// let client = NetBoxClient::new("https://netbox.example.com", "0123456789abcdef");
/// let devices = client.devices(&HostQuery::default()).unwrap();
/// println!("Found {} devices", devices.len());
/// ```
pub struct NetBoxClient {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// Base URL without the `/api` suffix.
    base_url: String,
    /// API token.
    token: String,
    /// Objects per page.
    page_size: u32,
}

impl NetBoxClient {
    /// Create a new client for the NetBox instance at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Bound every request by `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        self.agent = config.into();
        self
    }

    /// Request `page_size` objects per page.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the URL for an API list endpoint such as `ipam/ip-addresses`.
    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/api/{}/", self.base_url, endpoint)
    }

    fn authorization(&self) -> String {
        format!("Token {}", self.token)
    }

    /// Fetch every object of a list endpoint, following `next` links.
    fn fetch_all<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<Vec<T>> {
        let url = self.endpoint_url(endpoint);
        log::debug!("GET {url} {params:?}");

        let mut request = self
            .agent
            .get(&url)
            .header("Authorization", self.authorization())
            .header("Accept", "application/json")
            .query("limit", self.page_size.to_string());
        for (key, value) in params {
            request = request.query(key, value);
        }

        let mut page: Page<T> = request.call()?.body_mut().read_json()?;
        let mut results = std::mem::take(&mut page.results);

        while let Some(next) = page.next.take() {
            log::debug!("GET {next}");
            page = self
                .agent
                .get(&next)
                .header("Authorization", self.authorization())
                .header("Accept", "application/json")
                .call()?
                .body_mut()
                .read_json()?;
            results.append(&mut page.results);
        }

        if let Some(count) = page.count
            && count != results.len() as u64
        {
            log::warn!(
                "NetBox reported {count} {endpoint} objects but returned {}",
                results.len()
            );
        }

        Ok(results)
    }

    fn fetch_hosts(&self, endpoint: &str, query: &HostQuery) -> Result<Vec<Host>> {
        let hosts: Vec<NetBoxHost> = self.fetch_all(endpoint, &query.to_params())?;
        Ok(hosts.into_iter().filter_map(into_host).collect())
    }
}

impl Inventory for NetBoxClient {
    fn ip_addresses(&self, query: &AddressQuery) -> Result<Vec<IpAddress>> {
        let addresses: Vec<NetBoxIpAddress> =
            self.fetch_all("ipam/ip-addresses", &query.to_params())?;
        addresses.into_iter().map(IpAddress::try_from).collect()
    }

    fn devices(&self, query: &HostQuery) -> Result<Vec<Host>> {
        self.fetch_hosts("dcim/devices", query)
    }

    fn virtual_machines(&self, query: &HostQuery) -> Result<Vec<Host>> {
        self.fetch_hosts("virtualization/virtual-machines", query)
    }
}

// =============================================================================
// NetBox API response types
// =============================================================================

#[derive(Debug, Deserialize)]
struct Page<T> {
    count: Option<u64>,
    next: Option<String>,
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ChoiceValue<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct NestedIpAddress {
    address: String,
}

#[derive(Debug, Deserialize)]
struct NetBoxIpAddress {
    id: u64,
    address: String,
    family: ChoiceValue<u8>,
    #[serde(default)]
    dns_name: Option<String>,
    status: ChoiceValue<String>,
    #[serde(default)]
    custom_fields: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct NetBoxHost {
    id: u64,
    name: Option<String>,
    status: ChoiceValue<String>,
    primary_ip4: Option<NestedIpAddress>,
    primary_ip6: Option<NestedIpAddress>,
}

impl TryFrom<NetBoxIpAddress> for IpAddress {
    type Error = Error;

    fn try_from(ip: NetBoxIpAddress) -> Result<Self> {
        let family = AddressFamily::from_value(ip.family.value).ok_or_else(|| {
            Error::InvalidResponse(format!(
                "IP address {} has unknown family {}",
                ip.id, ip.family.value
            ))
        })?;

        Ok(Self {
            id: ip.id,
            address: ip.address,
            family,
            dns_name: ip.dns_name.unwrap_or_default(),
            status: ip.status.value,
            custom_fields: ip.custom_fields,
        })
    }
}

/// Unnamed devices cannot carry DNS names and are dropped.
fn into_host(host: NetBoxHost) -> Option<Host> {
    let Some(name) = host.name.filter(|n| !n.is_empty()) else {
        log::debug!("Skipping unnamed host {}", host.id);
        return None;
    };

    Some(Host {
        id: host.id,
        name,
        status: host.status.value,
        primary_ip4: host.primary_ip4.map(|ip| ip.address),
        primary_ip6: host.primary_ip6.map(|ip| ip.address),
    })
}
