mod cli;
mod collect;
mod commands;
mod config;
mod logging;
mod paths;
mod sync;
mod ui;
mod writer;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use config::Config;
use std::io;
use std::path::PathBuf;

/// Global context for the application
pub struct Context {
    pub config: Option<String>,
    pub quiet: bool,
}

impl Context {
    /// Resolve, load and validate the config file
    pub fn load_config(&self) -> Result<(PathBuf, Config)> {
        let path = paths::config_file(self.config.as_deref())?;
        let config = Config::load(&path)?;
        Ok((path, config))
    }
}

fn main() {
    if let Err(e) = run() {
        ui::error(&format!("{e:#}"));
        if let Some(hint) = hint(&e) {
            ui::dim(&hint);
        }
        std::process::exit(1);
    }
}

/// Advice for errors that came from one of the backends
fn hint(err: &anyhow::Error) -> Option<String> {
    if let Some(e) = err.downcast_ref::<netbox::Error>() {
        let category = e.category();
        return Some(format!("{category}. {}", category.advice()));
    }
    if let Some(e) = err.downcast_ref::<powerdns::Error>() {
        let category = e.category();
        return Some(format!("{category}. {}", category.advice()));
    }
    None
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.level_filter(), cli.journal_filter())?;

    let ctx = Context {
        config: cli.config,
        quiet: cli.quiet,
    };

    match cli.command {
        Command::Sync(args) => commands::sync::run(&ctx, args.dry_run),
        Command::Diff => commands::diff::run(&ctx),
        Command::Validate => commands::validate::run(&ctx),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "netbox-dns-sync", &mut io::stdout());
            Ok(())
        }
    }
}
