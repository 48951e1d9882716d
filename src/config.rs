//! Configuration file schema and loading
//!
//! The config is a single TOML file. Secrets may come from the environment
//! instead of the file: `NETBOX_TOKEN` and `PDNS_API_KEY` replace the file
//! values when set.

use anyhow::{Context, Result};
use ipnet::IpNet;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding `netbox.token`
pub const ENV_NETBOX_TOKEN: &str = "NETBOX_TOKEN";

/// Environment variable overriding `powerdns.api_key`
pub const ENV_PDNS_API_KEY: &str = "PDNS_API_KEY";

/// Comment content that marks an rrset as managed by this tool
pub const DEFAULT_OWNERSHIP_TAG: &str = "NetBox";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Log the plan without touching PowerDNS
    #[serde(default)]
    pub dry_run: bool,

    #[serde(default = "default_ownership_tag")]
    pub ownership_tag: String,

    /// Zones whose A/AAAA records are managed, without trailing dot
    #[serde(default)]
    pub forward_zones: Vec<String>,

    pub netbox: NetBoxConfig,

    pub powerdns: PowerDnsConfig,

    #[serde(default)]
    pub sources: SourcesConfig,

    #[serde(default)]
    pub statuses: StatusesConfig,

    #[serde(default)]
    pub reverse_zones: Vec<ReverseZone>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetBoxConfig {
    pub url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PowerDnsConfig {
    /// API endpoint, e.g. `http://127.0.0.1:8081/api/v1`
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_server_id")]
    pub server_id: String,
    /// TTL for created rrsets
    #[serde(default = "default_ttl")]
    pub ttl: u32,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Which inventory objects provide forward records
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourcesConfig {
    /// DNS names attached to IP addresses
    #[serde(default = "default_true")]
    pub ip: bool,
    /// Device names with their primary addresses
    #[serde(default)]
    pub device: bool,
    /// VM names with their primary addresses
    #[serde(default)]
    pub vm: bool,
    /// Boolean custom field marking addresses that only get a PTR
    #[serde(default)]
    pub ptr_only_field: Option<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            ip: true,
            device: false,
            vm: false,
            ptr_only_field: None,
        }
    }
}

impl SourcesConfig {
    pub fn any_forward(&self) -> bool {
        self.ip || self.device || self.vm
    }
}

/// Inventory status allow-lists
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusesConfig {
    #[serde(default = "default_address_statuses")]
    pub addresses: Vec<String>,
    #[serde(default = "default_host_statuses")]
    pub hosts: Vec<String>,
}

impl Default for StatusesConfig {
    fn default() -> Self {
        Self {
            addresses: default_address_statuses(),
            hosts: default_host_statuses(),
        }
    }
}

/// A reverse zone fed from the addresses of one prefix
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReverseZone {
    pub prefix: String,
    pub zone: String,
}

fn default_ownership_tag() -> String {
    DEFAULT_OWNERSHIP_TAG.to_string()
}

fn default_page_size() -> u32 {
    netbox::backend::api::DEFAULT_PAGE_SIZE
}

fn default_server_id() -> String {
    powerdns::backend::api::DEFAULT_SERVER_ID.to_string()
}

fn default_ttl() -> u32 {
    powerdns::DEFAULT_TTL
}

fn default_true() -> bool {
    true
}

fn default_address_statuses() -> Vec<String> {
    ["active", "dhcp", "slaac"].map(String::from).to_vec()
}

fn default_host_statuses() -> Vec<String> {
    ["active", "failed", "offline", "staged"]
        .map(String::from)
        .to_vec()
}

impl Config {
    /// Load the config at `path`, apply environment overrides and validate
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let mut config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;

        config.apply_overrides(
            std::env::var(ENV_NETBOX_TOKEN).ok(),
            std::env::var(ENV_PDNS_API_KEY).ok(),
        );
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid TOML")
    }

    /// Replace secrets with values taken from the environment
    pub fn apply_overrides(&mut self, netbox_token: Option<String>, pdns_api_key: Option<String>) {
        if let Some(token) = netbox_token.filter(|t| !t.is_empty()) {
            log::debug!("Using NetBox token from {ENV_NETBOX_TOKEN}");
            self.netbox.token = token;
        }
        if let Some(key) = pdns_api_key.filter(|k| !k.is_empty()) {
            log::debug!("Using PowerDNS API key from {ENV_PDNS_API_KEY}");
            self.powerdns.api_key = key;
        }
    }

    /// Check the config for mistakes that would make a run meaningless
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.netbox.url.trim().is_empty() {
            problems.push("netbox.url is empty".to_string());
        }
        if self.netbox.token.is_empty() {
            problems.push(format!("netbox.token is empty (set it or {ENV_NETBOX_TOKEN})"));
        }
        if self.netbox.page_size == 0 {
            problems.push("netbox.page_size must be at least 1".to_string());
        }
        if self.powerdns.url.trim().is_empty() {
            problems.push("powerdns.url is empty".to_string());
        }
        if self.powerdns.api_key.is_empty() {
            problems.push(format!("powerdns.api_key is empty (set it or {ENV_PDNS_API_KEY})"));
        }
        if self.ownership_tag.is_empty() {
            problems.push("ownership_tag is empty".to_string());
        }

        for zone in &self.forward_zones {
            if zone.trim_end_matches('.').is_empty() {
                problems.push("forward_zones contains an empty zone name".to_string());
            }
        }
        if !self.forward_zones.is_empty() && !self.sources.any_forward() {
            problems.push("forward_zones are set but every source is disabled".to_string());
        }

        for reverse in &self.reverse_zones {
            if let Err(e) = reverse.prefix.parse::<IpNet>() {
                problems.push(format!("reverse zone prefix '{}': {e}", reverse.prefix));
            }
            if reverse.zone.trim_end_matches('.').is_empty() {
                problems.push(format!("reverse zone for {} has no zone name", reverse.prefix));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            anyhow::bail!("Invalid configuration:\n  {}", problems.join("\n  "))
        }
    }

    pub fn netbox_timeout(&self) -> Option<Duration> {
        self.netbox.timeout_secs.map(Duration::from_secs)
    }

    pub fn powerdns_timeout(&self) -> Option<Duration> {
        self.powerdns.timeout_secs.map(Duration::from_secs)
    }
}
