//! PowerDNS HTTP API backend.
//!
//! [`PowerDnsClient`] reads zones with `GET {api}/servers/{server}/zones/{zone}`
//! and changes rrsets with `PATCH` on the same URL, where `{api}` is the API
//! endpoint such as `http://127.0.0.1:8081/api/v1`. Each change is sent as
//! its own request so a failure can be tied to the record that caused it.

use crate::backend::DnsBackend;
use crate::error::{Error, Result};
use crate::types::{ChangeType, RRSet, RRSetPatch, Zone};
use std::time::Duration;

/// Server id used by stock PowerDNS installations.
pub const DEFAULT_SERVER_ID: &str = "localhost";

/// PowerDNS API client.
///
/// # Example
///
/// ```no_run
/// use powerdns::backend::api::PowerDnsClient;
/// use powerdns::backend::DnsBackend;
///
/// let client = PowerDnsClient::new("http://127.0.0.1:8081/api/v1", "secret");
/// if let Some(zone) = client.zone("example.com.").unwrap() {
///     println!("{} has {} rrsets", zone.name, zone.rrsets.len());
/// }
/// ```
pub struct PowerDnsClient {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
    server_id: String,
}

impl PowerDnsClient {
    /// Create a new client for the API endpoint at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            server_id: DEFAULT_SERVER_ID.to_string(),
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

    /// Target a server other than `localhost`.
    #[must_use]
    pub fn with_server_id(mut self, server_id: impl Into<String>) -> Self {
        self.server_id = server_id.into();
        self
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn zone_url(&self, zone: &str) -> String {
        format!(
            "{}/servers/{}/zones/{}",
            self.base_url,
            self.server_id,
            zone_id(zone)
        )
    }

    fn patch(&self, zone: &str, rrset: &RRSet, change: ChangeType) -> Result<()> {
        let mut rrset = rrset.clone();
        rrset.changetype = Some(change);
        let body = RRSetPatch {
            rrsets: vec![&rrset],
        };

        let url = self.zone_url(zone);
        log::debug!("PATCH {url} {change:?} {} {}", rrset.name, rrset.rtype);

        match self
            .agent
            .patch(&url)
            .header("X-API-Key", self.api_key.as_str())
            .header("Accept", "application/json")
            .send_json(&body)
        {
            Ok(_) => Ok(()),
            Err(ureq::Error::StatusCode(404)) => Err(Error::ZoneNotFound(zone.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

impl DnsBackend for PowerDnsClient {
    fn zone(&self, name: &str) -> Result<Option<Zone>> {
        let url = self.zone_url(name);
        log::debug!("GET {url}");

        let response = self
            .agent
            .get(&url)
            .header("X-API-Key", self.api_key.as_str())
            .header("Accept", "application/json")
            .call();

        match response {
            Ok(mut resp) => Ok(Some(resp.body_mut().read_json()?)),
            // PowerDNS answers 422 for some unknown zone ids instead of 404
            Err(ureq::Error::StatusCode(404 | 422)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn create_rrset(&self, zone: &str, rrset: &RRSet) -> Result<()> {
        self.patch(zone, rrset, ChangeType::Replace)
    }

    fn delete_rrset(&self, zone: &str, rrset: &RRSet) -> Result<()> {
        self.patch(zone, rrset, ChangeType::Delete)
    }
}

/// URL path id of a zone. PowerDNS encodes `/` in zone ids as `=2F`.
fn zone_id(zone: &str) -> String {
    zone.replace('/', "=2F")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_url() {
        let client = PowerDnsClient::new("http://127.0.0.1:8081/api/v1/", "key");
        assert_eq!(client.base_url(), "http://127.0.0.1:8081/api/v1");
        assert_eq!(
            client.zone_url("example.com."),
            "http://127.0.0.1:8081/api/v1/servers/localhost/zones/example.com."
        );
    }

    #[test]
    fn test_zone_url_custom_server() {
        let client = PowerDnsClient::new("http://pdns/api/v1", "key").with_server_id("ns1");
        assert_eq!(
            client.zone_url("0.0.10.in-addr.arpa."),
            "http://pdns/api/v1/servers/ns1/zones/0.0.10.in-addr.arpa."
        );
    }

    #[test]
    fn test_zone_id_escapes_slash() {
        assert_eq!(zone_id("0/26.2.0.192.in-addr.arpa."), "0=2F26.2.0.192.in-addr.arpa.");
        assert_eq!(zone_id("example.com."), "example.com.");
    }
}
