//! The flat, ordered list of launchable profiles the picker shows.
//!
//! The registry joins what discovery found on disk with the user's stored
//! preferences (enabled flag, display name, order), keeps the result sorted
//! and notifies subscribers when it changes.

use crate::discovery::{Discovery, Inventory};
use crate::error::LaunchError;
use crate::launcher::{DetachedSpawner, ProcessSpawner, SecureLauncher};
use crate::sanitize::sanitize_profile_name;
use chrono::{DateTime, Utc};
use picker_core::{BrowserId, ConfigStore};
use serde::Serialize;
use std::cmp::Ordering;
use std::path::PathBuf;

/// A single browser profile as presented to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileEntry {
    pub browser: BrowserId,
    pub browser_name: String,
    pub profile_id: String,
    pub display_name: String,
    pub icon_path: PathBuf,
    pub last_used: Option<DateTime<Utc>>,
    pub enabled: bool,
    pub is_default: bool,
    pub order: i32,
}

impl ProfileEntry {
    /// Order value, then browser id, then display name, then profile id
    pub fn sort_key(&self) -> (i32, &str, &str, &str) {
        (
            self.order,
            self.browser.as_str(),
            self.display_name.as_str(),
            self.profile_id.as_str(),
        )
    }

    fn is(&self, browser: BrowserId, profile: &str) -> bool {
        self.browser == browser && self.profile_id == profile
    }
}

/// Sort entries into picker order
pub fn sort_entries(entries: &mut [ProfileEntry]) {
    entries.sort_by(compare_entries);
}

fn compare_entries(a: &ProfileEntry, b: &ProfileEntry) -> Ordering {
    a.sort_key().cmp(&b.sort_key())
}

/// Notifications delivered to registry subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEvent {
    Refreshed,
    Launched { browser: BrowserId, profile: String },
    LaunchFailed(String),
    ProfileSettingsChanged { browser: BrowserId, profile: String },
}

type Observer = Box<dyn Fn(&RegistryEvent)>;

/// Discovered profiles merged with user preferences
pub struct ProfileRegistry<S = DetachedSpawner> {
    store: ConfigStore,
    discovery: Discovery,
    launcher: SecureLauncher<S>,
    entries: Vec<ProfileEntry>,
    observers: Vec<Observer>,
}

impl ProfileRegistry<DetachedSpawner> {
    /// Registry that launches browsers as detached processes
    pub fn detached(store: ConfigStore, discovery: Discovery) -> Self {
        Self::new(store, discovery, SecureLauncher::default())
    }
}

impl<S: ProcessSpawner> ProfileRegistry<S> {
    /// Build the registry and populate it with an initial scan
    pub fn new(store: ConfigStore, discovery: Discovery, launcher: SecureLauncher<S>) -> Self {
        let mut registry = Self {
            store,
            discovery,
            launcher,
            entries: Vec::new(),
            observers: Vec::new(),
        };
        registry.refresh();
        registry
    }

    pub fn subscribe(&mut self, observer: impl Fn(&RegistryEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn emit(&self, event: RegistryEvent) {
        for observer in &self.observers {
            observer(&event);
        }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn launcher(&self) -> &SecureLauncher<S> {
        &self.launcher
    }

    /// Rescan browsers and rebuild the entry list
    pub fn refresh(&mut self) {
        let inventory = self.discovery.discover();
        let mut entries = build_entries(inventory, &self.store);
        sort_entries(&mut entries);

        self.entries = entries;
        tracing::debug!("Registry holds {} profile(s)", self.entries.len());
        self.emit(RegistryEvent::Refreshed);
    }

    /// All entries in picker order
    pub fn all_profiles(&self, enabled_only: bool) -> Vec<&ProfileEntry> {
        self.entries
            .iter()
            .filter(|e| !enabled_only || e.enabled)
            .collect()
    }

    pub fn profiles_for_browser(&self, browser: BrowserId, enabled_only: bool) -> Vec<&ProfileEntry> {
        self.entries
            .iter()
            .filter(|e| e.browser == browser && (!enabled_only || e.enabled))
            .collect()
    }

    pub fn get_profile(&self, browser: BrowserId, profile: &str) -> Option<&ProfileEntry> {
        self.entries.iter().find(|e| e.is(browser, profile))
    }

    pub fn has_profile(&self, browser: BrowserId, profile: &str) -> bool {
        self.get_profile(browser, profile).is_some()
    }

    /// The entry the picker preselects.
    ///
    /// The remembered last-used profile wins if it is still present and
    /// enabled; otherwise the first enabled entry.
    pub fn default_profile(&self) -> Option<&ProfileEntry> {
        if let Some((browser, profile)) = self.store.last_used() {
            if let Some(entry) = self.get_profile(browser, &profile).filter(|e| e.enabled) {
                return Some(entry);
            }
        }
        self.entries.iter().find(|e| e.enabled)
    }

    /// Launch and report success; failures are broadcast as events
    pub fn launch(&mut self, browser: BrowserId, profile: &str, url: &str) -> bool {
        self.try_launch(browser, profile, url).is_ok()
    }

    /// Launch, returning the spawned pid or the reason it was refused
    pub fn try_launch(&mut self, browser: BrowserId, profile: &str, url: &str) -> Result<u32, LaunchError> {
        let inventory = self.discovery.latest();
        let result = self.launcher.launch(inventory, browser, profile, url);

        match result {
            Ok(pid) => {
                let profile = sanitize_profile_name(profile);
                if let Err(e) = self.store.set_last_used(browser, &profile) {
                    tracing::warn!("Failed to remember last used profile: {}", e);
                }
                self.emit(RegistryEvent::Launched { browser, profile });
                Ok(pid)
            }
            Err(e) => {
                tracing::warn!("{}", e);
                self.emit(RegistryEvent::LaunchFailed(e.to_string()));
                Err(e)
            }
        }
    }

    pub fn set_profile_enabled(&mut self, browser: BrowserId, profile: &str, enabled: bool) -> picker_core::Result<()> {
        self.store.set_profile_enabled(browser, profile, enabled)?;
        if let Some(entry) = self.entry_mut(browser, profile) {
            entry.enabled = enabled;
        }
        self.settings_changed(browser, profile);
        Ok(())
    }

    /// Rename a profile for display; an empty name restores the browser's own name
    pub fn set_profile_display_name(&mut self, browser: BrowserId, profile: &str, name: &str) -> picker_core::Result<()> {
        self.store.set_profile_display_name(browser, profile, name)?;

        let display_name = match self.store.profile_display_name(browser, profile) {
            Some(custom) => custom.to_string(),
            None => reported_display_name(self.discovery.latest(), browser, profile),
        };
        if let Some(entry) = self.entry_mut(browser, profile) {
            entry.display_name = display_name;
        }
        sort_entries(&mut self.entries);
        self.settings_changed(browser, profile);
        Ok(())
    }

    pub fn set_profile_order(&mut self, browser: BrowserId, profile: &str, order: i32) -> picker_core::Result<()> {
        self.store.set_profile_order(browser, profile, order)?;
        if let Some(entry) = self.entry_mut(browser, profile) {
            entry.order = order;
        }
        sort_entries(&mut self.entries);
        self.settings_changed(browser, profile);
        Ok(())
    }

    /// Swap order values with the previous entry. Returns false when there is none.
    pub fn move_up(&mut self, browser: BrowserId, profile: &str) -> picker_core::Result<bool> {
        match self.position(browser, profile) {
            Some(index) if index > 0 => {
                self.swap_order(index, index - 1)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Swap order values with the next entry. Returns false when there is none.
    pub fn move_down(&mut self, browser: BrowserId, profile: &str) -> picker_core::Result<bool> {
        match self.position(browser, profile) {
            Some(index) if index + 1 < self.entries.len() => {
                self.swap_order(index, index + 1)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn swap_order(&mut self, a: usize, b: usize) -> picker_core::Result<()> {
        let (first, second) = (self.entries[a].clone(), self.entries[b].clone());

        self.store
            .set_profile_order(first.browser, &first.profile_id, second.order)?;
        self.store
            .set_profile_order(second.browser, &second.profile_id, first.order)?;
        self.entries[a].order = second.order;
        self.entries[b].order = first.order;
        sort_entries(&mut self.entries);

        self.settings_changed(first.browser, &first.profile_id);
        self.settings_changed(second.browser, &second.profile_id);
        Ok(())
    }

    fn position(&self, browser: BrowserId, profile: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.is(browser, profile))
    }

    fn entry_mut(&mut self, browser: BrowserId, profile: &str) -> Option<&mut ProfileEntry> {
        self.entries.iter_mut().find(|e| e.is(browser, profile))
    }

    fn settings_changed(&self, browser: BrowserId, profile: &str) {
        self.emit(RegistryEvent::ProfileSettingsChanged {
            browser,
            profile: profile.to_string(),
        });
    }
}

fn reported_display_name(inventory: &Inventory, browser: BrowserId, profile: &str) -> String {
    inventory
        .get(&browser)
        .and_then(|b| b.profiles.get(profile))
        .map(|r| r.display_name.clone())
        .unwrap_or_else(|| profile.to_string())
}

/// Flatten an inventory into entries with stored preferences applied
fn build_entries(inventory: &Inventory, store: &ConfigStore) -> Vec<ProfileEntry> {
    let mut entries: Vec<ProfileEntry> = inventory
        .values()
        .flat_map(|browser| {
            browser.profiles.values().map(move |record| ProfileEntry {
                browser: browser.id,
                browser_name: browser.name.clone(),
                profile_id: record.id.clone(),
                display_name: store
                    .profile_display_name(browser.id, &record.id)
                    .map(str::to_string)
                    .unwrap_or_else(|| record.display_name.clone()),
                icon_path: browser.icon_path.clone(),
                last_used: record.last_used,
                enabled: store.is_profile_enabled(browser.id, &record.id),
                is_default: record.is_default,
                order: store.profile_order(browser.id, &record.id),
            })
        })
        .collect();

    // A remembered profile that still exists replaces the browsers' own defaults
    if let Some((browser, profile)) = store.last_used() {
        if entries.iter().any(|e| e.is(browser, &profile)) {
            for entry in &mut entries {
                entry.is_default = entry.is(browser, &profile);
            }
        }
    }

    entries
}
