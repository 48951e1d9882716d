//! Config file location
//!
//! # Path Resolution Priority
//!
//! 1. `--config` flag
//! 2. `NETBOX_DNS_SYNC_CONFIG` environment variable
//! 3. `XDG_CONFIG_HOME/netbox-dns-sync/config.toml` (if set)
//! 4. `~/.config/netbox-dns-sync/config.toml`
//!
//! `~` and `$VARS` are expanded in the flag and the env var.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable for the config file override
pub const ENV_CONFIG: &str = "NETBOX_DNS_SYNC_CONFIG";

const APP_DIR: &str = "netbox-dns-sync";
const CONFIG_FILE: &str = "config.toml";

/// Resolve the config file path from the flag and the environment
pub fn config_file(flag: Option<&str>) -> Result<PathBuf> {
    let env = std::env::var(ENV_CONFIG).ok();
    let xdg = std::env::var("XDG_CONFIG_HOME").ok();
    resolve_config_file(flag, env.as_deref(), xdg.as_deref(), dirs::home_dir().as_deref())
}

fn resolve_config_file(
    flag: Option<&str>,
    env: Option<&str>,
    xdg_config_home: Option<&str>,
    home: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(path) = flag {
        let path = expand(path);
        log::debug!("Using config from --config: {}", path.display());
        return Ok(path);
    }

    if let Some(path) = env.filter(|p| !p.is_empty()) {
        let path = expand(path);
        log::debug!("Using config from {ENV_CONFIG}: {}", path.display());
        return Ok(path);
    }

    if let Some(xdg) = xdg_config_home.filter(|p| !p.is_empty()) {
        let path = PathBuf::from(xdg).join(APP_DIR).join(CONFIG_FILE);
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    let home = home.context("Could not determine home directory")?;
    let path = home.join(".config").join(APP_DIR).join(CONFIG_FILE);
    log::debug!("Using default config: {}", path.display());
    Ok(path)
}

/// Expand `~` and environment variables in a path
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}
