use anyhow::Result;

use crate::Context;
use crate::ui;

pub fn run(ctx: &Context) -> Result<()> {
    let (path, config) = ctx.load_config()?;

    ui::header("Configuration");
    ui::kv("File", &path.display().to_string());
    ui::kv("NetBox", &config.netbox.url);
    ui::kv(
        "PowerDNS",
        &format!("{} (server {})", config.powerdns.url, config.powerdns.server_id),
    );
    ui::kv("Ownership tag", &config.ownership_tag);
    ui::kv("TTL", &config.powerdns.ttl.to_string());
    if config.dry_run {
        ui::kv("Dry run", "yes");
    }

    let sources: Vec<&str> = [
        ("ip", config.sources.ip),
        ("device", config.sources.device),
        ("vm", config.sources.vm),
    ]
    .into_iter()
    .filter_map(|(name, enabled)| enabled.then_some(name))
    .collect();
    ui::kv("Sources", &sources.join(", "));
    if let Some(field) = &config.sources.ptr_only_field {
        ui::kv("PTR-only field", field);
    }

    ui::section(&format!("Forward zones ({})", config.forward_zones.len()));
    for zone in &config.forward_zones {
        ui::dim(zone);
    }

    ui::section(&format!("Reverse zones ({})", config.reverse_zones.len()));
    for reverse in &config.reverse_zones {
        ui::dim(&format!("{} <- {}", reverse.zone, reverse.prefix));
    }

    println!();
    ui::success("Configuration is valid");
    Ok(())
}
