use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "netbox-dns-sync")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Sync PowerDNS A/AAAA/PTR records from NetBox", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: ~/.config/netbox-dns-sync/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log level, overrides -v and -q
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Also log to the systemd journal at this level
    #[arg(short, long, value_enum, global = true)]
    pub journal_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Reconcile PowerDNS with NetBox and apply the changes
    Sync(SyncArgs),

    /// Show what sync would change, without changing anything
    Diff,

    /// Load and check the config file
    Validate,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct SyncArgs {
    /// Log the plan but make no changes
    #[arg(short, long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => Self::Off,
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}

impl Cli {
    /// Effective log level. Defaults to info so the plan is always visible.
    pub fn level_filter(&self) -> LevelFilter {
        if let Some(level) = self.log_level {
            return level.into();
        }
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Journal level, `None` when journal logging is off
    pub fn journal_filter(&self) -> Option<LevelFilter> {
        self.journal_level.map(Into::into)
    }
}
