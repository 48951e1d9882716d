use anyhow::Result;

use crate::Context;
use crate::sync::{self, Outcome};
use crate::ui;

pub fn run(ctx: &Context, dry_run: bool) -> Result<()> {
    let (_, config) = ctx.load_config()?;
    let dry_run = dry_run || config.dry_run;
    let (netbox, powerdns) = sync::clients(&config);

    match sync::run(&netbox, &powerdns, &config, dry_run)? {
        Outcome::Applied(summary) if dry_run => {
            if !ctx.quiet {
                ui::warn(&format!("Dry run: {} rrset change(s) not applied", summary.skipped));
            }
        }
        Outcome::Applied(summary) => {
            if !ctx.quiet {
                ui::success(&format!(
                    "{} rrset(s) written, {} deleted",
                    summary.replaced, summary.deleted
                ));
            }
        }
        Outcome::DuplicateAbort(keys) => ui::duplicates(&keys),
    }

    Ok(())
}
