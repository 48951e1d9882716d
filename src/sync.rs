//! One reconciliation run: collect, guard, diff, apply
//!
//! Everything is read before anything is written, so any collection error
//! ends the run with PowerDNS untouched. The same holds when NetBox wants a
//! record where PowerDNS already has an rrset without the ownership tag.

use anyhow::Result;
use netbox::{Inventory, NetBoxClient};
use powerdns::{DnsBackend, PowerDnsClient};
use reconcile::{ApplyOptions, ApplySummary, Changeset, Record, RecordKey, RecordSet};

use crate::collect::{actual, desired};
use crate::config::Config;
use crate::writer::PowerDnsWriter;

/// Both sides of the comparison
#[derive(Debug, Default)]
pub struct State {
    pub desired: Vec<Record>,
    pub actual: Vec<Record>,
    /// Managed-type rrsets in PowerDNS that lack the ownership tag
    pub unmanaged: Vec<RecordSet>,
}

/// What the diff phase decided
#[derive(Debug)]
pub enum Plan {
    /// Changes to apply, possibly none
    Ready(Changeset),
    /// NetBox claims some records twice; nothing may be changed
    Duplicates(Vec<RecordKey>),
}

/// How a run ended
#[derive(Debug)]
pub enum Outcome {
    Applied(ApplySummary),
    DuplicateAbort(Vec<RecordKey>),
}

/// Build the live clients from the config
pub fn clients(config: &Config) -> (NetBoxClient, PowerDnsClient) {
    let mut netbox = NetBoxClient::new(&config.netbox.url, &config.netbox.token)
        .with_page_size(config.netbox.page_size);
    if let Some(timeout) = config.netbox_timeout() {
        netbox = netbox.with_timeout(timeout);
    }

    let mut powerdns = PowerDnsClient::new(&config.powerdns.url, &config.powerdns.api_key)
        .with_server_id(&config.powerdns.server_id);
    if let Some(timeout) = config.powerdns_timeout() {
        powerdns = powerdns.with_timeout(timeout);
    }

    (netbox, powerdns)
}

/// Read desired and actual records for every configured zone
pub fn collect(
    inventory: &dyn Inventory,
    backend: &dyn DnsBackend,
    config: &Config,
) -> Result<State> {
    let tag = config.ownership_tag.as_str();
    let mut state = State::default();

    for zone in &config.forward_zones {
        state
            .desired
            .extend(desired::forward_zone_records(inventory, config, zone)?);
        let found = actual::forward_zone_records(backend, zone, tag)?;
        state.actual.extend(found.tagged);
        state.unmanaged.extend(found.untagged);
    }

    for reverse in &config.reverse_zones {
        state
            .desired
            .extend(desired::reverse_zone_records(inventory, config, reverse)?);
        let found = actual::reverse_zone_records(backend, &reverse.zone, tag)?;
        state.actual.extend(found.tagged);
        state.unmanaged.extend(found.untagged);
    }

    log::debug!(
        "Collected {} desired and {} tagged records",
        state.desired.len(),
        state.actual.len()
    );
    Ok(state)
}

/// Collect both sides and compute the changes
///
/// Creating over an untagged rrset is an error, so nothing gets applied.
pub fn plan(inventory: &dyn Inventory, backend: &dyn DnsBackend, config: &Config) -> Result<Plan> {
    let state = collect(inventory, backend, config)?;
    match reconcile::plan(&state.desired, &state.actual, &state.unmanaged) {
        Ok(changeset) => Ok(Plan::Ready(changeset)),
        Err(reconcile::Error::DuplicateRecords(keys)) => Ok(Plan::Duplicates(keys)),
        Err(e) => Err(e.into()),
    }
}

/// Full run. A duplicate abort is a clean outcome, not an error.
pub fn run(
    inventory: &dyn Inventory,
    backend: &dyn DnsBackend,
    config: &Config,
    dry_run: bool,
) -> Result<Outcome> {
    let changeset = match plan(inventory, backend, config)? {
        Plan::Ready(changeset) => changeset,
        Plan::Duplicates(keys) => return Ok(Outcome::DuplicateAbort(keys)),
    };

    let writer = PowerDnsWriter::new(backend, &config.ownership_tag, config.powerdns.ttl);
    let summary = reconcile::apply(&changeset, &writer, &ApplyOptions { dry_run })?;
    Ok(Outcome::Applied(summary))
}
