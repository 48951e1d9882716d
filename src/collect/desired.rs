//! Desired state: the records NetBox says should exist

use anyhow::{Context, Result};
use netbox::{AddressQuery, Host, HostQuery, Inventory};
use reconcile::{Record, canonicalize, owning_zone, parse_address};

use crate::config::{Config, ReverseZone};

/// A/AAAA records for `zone` from every enabled source
///
/// A name counts for `zone` only if `zone` is the most specific configured
/// forward zone it sits below.
pub fn forward_zone_records(
    inventory: &dyn Inventory,
    config: &Config,
    zone: &str,
) -> Result<Vec<Record>> {
    let suffix = zone.trim_end_matches('.');
    let mut records = Vec::new();

    if config.sources.ip {
        let query = AddressQuery {
            dns_name_suffix: Some(suffix.to_string()),
            statuses: config.statuses.addresses.clone(),
            custom_flag_false: config.sources.ptr_only_field.clone(),
            ..Default::default()
        };
        let addresses = inventory
            .ip_addresses(&query)
            .with_context(|| format!("Failed to query IP addresses for {zone}"))?;

        for ip in addresses {
            if !belongs_to(&ip.dns_name, zone, &config.forward_zones) {
                continue;
            }
            let addr = parse_address(&ip.address)
                .with_context(|| format!("NetBox IP address {}", ip.id))?;
            records.push(Record::address(&ip.dns_name, addr, zone));
        }
    }

    let host_query = HostQuery {
        name_suffix: Some(suffix.to_string()),
        statuses: config.statuses.hosts.clone(),
    };

    if config.sources.device {
        let devices = inventory
            .devices(&host_query)
            .with_context(|| format!("Failed to query devices for {zone}"))?;
        host_records(&devices, zone, &config.forward_zones, &mut records)?;
    }

    if config.sources.vm {
        let vms = inventory
            .virtual_machines(&host_query)
            .with_context(|| format!("Failed to query virtual machines for {zone}"))?;
        host_records(&vms, zone, &config.forward_zones, &mut records)?;
    }

    log::debug!("{} desired records in {zone}", records.len());
    Ok(records)
}

/// PTR records for the addresses inside a reverse zone's prefix
pub fn reverse_zone_records(
    inventory: &dyn Inventory,
    config: &Config,
    reverse: &ReverseZone,
) -> Result<Vec<Record>> {
    let query = AddressQuery {
        parent: Some(reverse.prefix.clone()),
        statuses: config.statuses.addresses.clone(),
        ..Default::default()
    };
    let addresses = inventory
        .ip_addresses(&query)
        .with_context(|| format!("Failed to query IP addresses in {}", reverse.prefix))?;

    let mut records = Vec::new();
    for ip in addresses {
        if ip.dns_name.is_empty() {
            continue;
        }
        let addr =
            parse_address(&ip.address).with_context(|| format!("NetBox IP address {}", ip.id))?;
        records.push(Record::ptr(addr, &ip.dns_name, &reverse.zone));
    }

    log::debug!(
        "{} desired records in {} ({})",
        records.len(),
        canonicalize(&reverse.zone),
        reverse.prefix
    );
    Ok(records)
}

fn host_records(
    hosts: &[Host],
    zone: &str,
    forward_zones: &[String],
    records: &mut Vec<Record>,
) -> Result<()> {
    for host in hosts {
        if !belongs_to(&host.name, zone, forward_zones) {
            continue;
        }
        if host.primary_ip4.is_none() && host.primary_ip6.is_none() {
            log::debug!("Skipping {}: no primary address", host.name);
            continue;
        }
        for address in [&host.primary_ip4, &host.primary_ip6].into_iter().flatten() {
            let addr = parse_address(address)
                .with_context(|| format!("Primary address of {}", host.name))?;
            records.push(Record::address(&host.name, addr, zone));
        }
    }
    Ok(())
}

fn belongs_to(name: &str, zone: &str, forward_zones: &[String]) -> bool {
    owning_zone(name, forward_zones).is_some_and(|owner| canonicalize(owner) == canonicalize(zone))
}
