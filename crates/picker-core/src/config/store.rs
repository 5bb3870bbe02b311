use super::{CONFIG_VERSION, DEFAULT_ORDER, DEFAULT_TIMEOUT, MAX_TIMEOUT, MIN_TIMEOUT};
use crate::{BrowserId, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything persisted in the preferences file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub general: GeneralSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used: Option<LastUsed>,
    /// browser id -> profile id -> settings
    pub browsers: BTreeMap<String, BTreeMap<String, ProfileSettings>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    pub default_timeout: u32,
    pub remember_last_used: bool,
    pub show_tray_icon: bool,
    #[serde(default = "legacy_config_version")]
    pub config_version: u32,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_TIMEOUT,
            remember_last_used: true,
            show_tray_icon: false,
            config_version: CONFIG_VERSION,
        }
    }
}

fn legacy_config_version() -> u32 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LastUsed {
    pub browser: String,
    pub profile: String,
}

/// Per-profile user settings; unset fields fall back to defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

/// File-backed preference store. Every setter flushes to disk before returning.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    prefs: Preferences,
}

impl ConfigStore {
    /// Open the store at the default location
    pub fn open_default() -> Result<Self> {
        Self::open(super::preferences_path()?)
    }

    /// Load the store at `path` without touching the disk. A missing file reads as defaults.
    pub fn read(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self {
                path,
                prefs: Preferences::default(),
            });
        }

        let contents = fs::read_to_string(&path)?;
        let prefs = toml::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!("Using default preferences, {}: {}", path.display(), e);
            Preferences::default()
        });
        Ok(Self { path, prefs })
    }

    /// Open the store at `path`, creating it with defaults if missing.
    /// An unparseable file is read as defaults.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            let store = Self {
                path,
                prefs: Preferences::default(),
            };
            store.flush()?;
            tracing::debug!("Created new preferences file at {}", store.path.display());
            return Ok(store);
        }

        let contents = fs::read_to_string(&path)?;
        let prefs = match toml::from_str::<Preferences>(&contents) {
            Ok(prefs) => prefs,
            Err(e) => {
                // Left on disk as is until the next setter rewrites it
                tracing::warn!("Using default preferences, {}: {}", path.display(), e);
                return Ok(Self {
                    path,
                    prefs: Preferences::default(),
                });
            }
        };
        let mut store = Self { path, prefs };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&mut self) -> Result<()> {
        let version = self.prefs.general.config_version;
        if version < CONFIG_VERSION {
            self.prefs.general.config_version = CONFIG_VERSION;
            self.flush()?;
            tracing::info!("Migrated preferences from version {} to {}", version, CONFIG_VERSION);
        }
        Ok(())
    }

    /// Write the preferences to disk (temp file + rename)
    pub fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(&self.prefs)?;
        let temp_path = self.path.with_extension("toml.tmp");
        fs::write(&temp_path, contents)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file is present on disk
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn default_timeout(&self) -> u32 {
        self.prefs.general.default_timeout
    }

    /// Set the auto-select timeout, clamped to the supported range
    pub fn set_default_timeout(&mut self, seconds: u32) -> Result<()> {
        self.prefs.general.default_timeout = seconds.clamp(MIN_TIMEOUT, MAX_TIMEOUT);
        self.flush()
    }

    pub fn remember_last_used(&self) -> bool {
        self.prefs.general.remember_last_used
    }

    pub fn set_remember_last_used(&mut self, remember: bool) -> Result<()> {
        self.prefs.general.remember_last_used = remember;
        self.flush()
    }

    pub fn show_tray_icon(&self) -> bool {
        self.prefs.general.show_tray_icon
    }

    pub fn set_show_tray_icon(&mut self, show: bool) -> Result<()> {
        self.prefs.general.show_tray_icon = show;
        self.flush()
    }

    fn profile_settings(&self, browser: BrowserId, profile: &str) -> Option<&ProfileSettings> {
        self.prefs.browsers.get(browser.as_str())?.get(profile)
    }

    fn profile_settings_mut(&mut self, browser: BrowserId, profile: &str) -> &mut ProfileSettings {
        self.prefs
            .browsers
            .entry(browser.as_str().to_string())
            .or_default()
            .entry(profile.to_string())
            .or_default()
    }

    /// Whether any setting has been stored for this profile
    pub fn has_profile_settings(&self, browser: BrowserId, profile: &str) -> bool {
        self.profile_settings(browser, profile).is_some()
    }

    pub fn is_profile_enabled(&self, browser: BrowserId, profile: &str) -> bool {
        self.profile_settings(browser, profile)
            .and_then(|s| s.enabled)
            .unwrap_or(true)
    }

    pub fn set_profile_enabled(&mut self, browser: BrowserId, profile: &str, enabled: bool) -> Result<()> {
        self.profile_settings_mut(browser, profile).enabled = Some(enabled);
        self.flush()
    }

    /// Custom display name, if one has been set
    pub fn profile_display_name(&self, browser: BrowserId, profile: &str) -> Option<&str> {
        self.profile_settings(browser, profile)
            .and_then(|s| s.display_name.as_deref())
    }

    /// Set a custom display name; an empty name or one equal to the profile id clears it
    pub fn set_profile_display_name(&mut self, browser: BrowserId, profile: &str, name: &str) -> Result<()> {
        let name = name.trim();
        let value = if name.is_empty() || name == profile {
            None
        } else {
            Some(name.to_string())
        };
        self.profile_settings_mut(browser, profile).display_name = value;
        self.flush()
    }

    pub fn profile_order(&self, browser: BrowserId, profile: &str) -> i32 {
        self.profile_settings(browser, profile)
            .and_then(|s| s.order)
            .unwrap_or(DEFAULT_ORDER)
    }

    pub fn set_profile_order(&mut self, browser: BrowserId, profile: &str, order: i32) -> Result<()> {
        self.profile_settings_mut(browser, profile).order = Some(order);
        self.flush()
    }

    /// The last launched (browser, profile) pair, if one is recorded and the browser id is known
    pub fn last_used(&self) -> Option<(BrowserId, String)> {
        let last = self.prefs.last_used.as_ref()?;
        if last.profile.is_empty() {
            return None;
        }
        let browser = last.browser.parse().ok()?;
        Some((browser, last.profile.clone()))
    }

    /// Record the last launched profile. No-op when remember-last-used is off.
    pub fn set_last_used(&mut self, browser: BrowserId, profile: &str) -> Result<()> {
        if !self.remember_last_used() {
            return Ok(());
        }

        self.prefs.last_used = Some(LastUsed {
            browser: browser.as_str().to_string(),
            profile: profile.to_string(),
        });
        self.flush()
    }
}
