//! Log setup: stderr always, the systemd journal on request
//!
//! Each sink filters at its own level.

use anyhow::{Context, Result};
use log::{LevelFilter, Log, Metadata, Record};
use systemd_journal_logger::JournalLog;

const SYSLOG_IDENTIFIER: &str = "netbox-dns-sync";

struct Logger {
    stderr: env_logger::Logger,
    journal: Option<(JournalLog, LevelFilter)>,
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.stderr.enabled(metadata)
            || self
                .journal
                .as_ref()
                .is_some_and(|(_, level)| metadata.level() <= *level)
    }

    fn log(&self, record: &Record) {
        self.stderr.log(record);
        if let Some((journal, level)) = &self.journal
            && record.level() <= *level
        {
            journal.log(record);
        }
    }

    fn flush(&self) {
        self.stderr.flush();
        if let Some((journal, _)) = &self.journal {
            journal.flush();
        }
    }
}

/// Install the global logger
///
/// `journal` of `None` or `Off` leaves the journal alone. Connecting to it
/// is only attempted when a level is given.
pub fn init(stderr: LevelFilter, journal: Option<LevelFilter>) -> Result<()> {
    let stderr = env_logger::Builder::new()
        .filter_level(stderr)
        .format_timestamp_secs()
        .build();

    let journal = match journal {
        Some(level) if level != LevelFilter::Off => {
            let log = JournalLog::new()
                .context("Failed to connect to the systemd journal")?
                .with_syslog_identifier(SYSLOG_IDENTIFIER.to_string());
            Some((log, level))
        }
        _ => None,
    };

    let max = max_level(stderr.filter(), journal.as_ref().map(|(_, level)| *level));
    log::set_boxed_logger(Box::new(Logger { stderr, journal }))
        .context("Logger was already initialized")?;
    log::set_max_level(max);
    Ok(())
}

/// The most verbose level any sink wants
fn max_level(stderr: LevelFilter, journal: Option<LevelFilter>) -> LevelFilter {
    journal.map_or(stderr, |journal| stderr.max(journal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_level_takes_most_verbose_sink() {
        assert_eq!(max_level(LevelFilter::Warn, None), LevelFilter::Warn);
        assert_eq!(
            max_level(LevelFilter::Warn, Some(LevelFilter::Debug)),
            LevelFilter::Debug
        );
        assert_eq!(
            max_level(LevelFilter::Trace, Some(LevelFilter::Error)),
            LevelFilter::Trace
        );
    }

    #[test]
    fn test_stderr_level_without_journal() {
        let logger = Logger {
            stderr: env_logger::Builder::new().filter_level(LevelFilter::Error).build(),
            journal: None,
        };
        let info = Metadata::builder().level(log::Level::Info).build();
        let error = Metadata::builder().level(log::Level::Error).build();
        assert!(!logger.enabled(&info));
        assert!(logger.enabled(&error));
    }
}
