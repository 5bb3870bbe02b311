//! Preference store and executable overrides.
//!
//! Two files live in the config directory (`~/.config/browser-picker/` by default):
//! - `browser-picker.toml`: user preferences written by the application
//!   (timeout, last used profile, per-profile enabled/name/order)
//! - `browser-picker.yaml`: optional hand-written overrides for browser
//!   executable paths and enabled state, never written except by
//!   [`deploy_defaults`]
//!
//! Both locations can be redirected with `BROWSER_PICKER_CONFIG` and
//! `BROWSER_PICKER_YAML`.

mod overrides;
mod store;

pub use overrides::BrowserOverrides;
pub use store::{ConfigStore, GeneralSettings, LastUsed, Preferences, ProfileSettings};

use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_TIMEOUT: u32 = 10;
pub const MIN_TIMEOUT: u32 = 5;
pub const MAX_TIMEOUT: u32 = 60;

/// Order assigned to profiles the user has not positioned
pub const DEFAULT_ORDER: i32 = 999;

pub const CONFIG_VERSION: u32 = 2;

pub const CONFIG_ENV: &str = "BROWSER_PICKER_CONFIG";
pub const OVERRIDES_ENV: &str = "BROWSER_PICKER_YAML";

const APP_DIR: &str = "browser-picker";

const OVERRIDES_TEMPLATE: &str = "\
# browser-picker executable overrides
#
# Each browser may be given either an inline executable path or a mapping
# with `path` and/or `enabled`. Paths that are not executable files are
# ignored. `enabled: false` hides the browser even if it is installed.
#
# browsers:
#   firefox: /usr/bin/firefox
#   chrome:
#     path: /opt/google/chrome/google-chrome
#     enabled: true
#   chromium:
#     enabled: false

browsers: {}
";

/// Directory holding both config files
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or(Error::NoConfigDir)
}

pub fn preferences_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    Ok(config_dir()?.join(format!("{}.toml", APP_DIR)))
}

pub fn overrides_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(OVERRIDES_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    Ok(config_dir()?.join(format!("{}.yaml", APP_DIR)))
}

/// Deploy default config files to their default locations
pub fn deploy_defaults(force: bool) -> Result<bool> {
    deploy_defaults_at(&preferences_path()?, &overrides_path()?, force)
}

/// Create the preferences file and override template if missing.
///
/// With `force`, the override template is rewritten even if present. The
/// preferences file is never overwritten. Returns whether anything was written.
pub fn deploy_defaults_at(preferences: &Path, overrides: &Path, force: bool) -> Result<bool> {
    let mut changed = false;

    if !preferences.exists() {
        ConfigStore::open(preferences)?;
        tracing::info!("Wrote default preferences to {}", preferences.display());
        changed = true;
    }

    if force || !overrides.exists() {
        if let Some(parent) = overrides.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(overrides, OVERRIDES_TEMPLATE)?;
        tracing::info!("Wrote override template to {}", overrides.display());
        changed = true;
    }

    Ok(changed)
}
