use anyhow::Result;

use crate::Context;
use crate::sync::{self, Plan};
use crate::ui;

pub fn run(ctx: &Context) -> Result<()> {
    let (_, config) = ctx.load_config()?;
    let (netbox, powerdns) = sync::clients(&config);

    ui::header("PowerDNS vs NetBox");

    match sync::plan(&netbox, &powerdns, &config)? {
        Plan::Ready(changeset) => ui::changeset(&changeset),
        Plan::Duplicates(keys) => ui::duplicates(&keys),
    }

    Ok(())
}
