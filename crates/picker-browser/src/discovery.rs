use crate::family::BrowserFamily;
use crate::finder::{ExecutableFinder, SystemLayout};
use crate::profiles::ProfileMap;
use picker_core::{BrowserId, BrowserOverrides};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// How long a discovery result is reused before rescanning
pub const CACHE_TTL: Duration = Duration::from_secs(5);

/// An installed browser and its profiles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowserDescriptor {
    pub id: BrowserId,
    pub name: String,
    pub executable: PathBuf,
    pub icon_path: PathBuf,
    pub family: BrowserFamily,
    pub profiles: ProfileMap,
}

/// Installed browsers keyed by id
pub type Inventory = BTreeMap<BrowserId, BrowserDescriptor>;

/// Scan for installed browsers and their profiles.
///
/// Never fails: a browser that is disabled, missing or unreadable is simply
/// absent (or has no profiles).
pub fn discover(layout: &SystemLayout, overrides: &BrowserOverrides) -> Inventory {
    let mut inventory = Inventory::new();

    for id in BrowserId::ALL {
        if !overrides.is_enabled(id) {
            tracing::debug!("{} disabled by override", id);
            continue;
        }

        let finder = ExecutableFinder::new(layout, overrides.executable(id));
        let Some(executable) = finder.find(id) else {
            continue;
        };

        let family = BrowserFamily::of(id);
        let profiles = family.read_profiles(&id.profile_root(layout.home()));
        tracing::debug!(
            "Detected {} at {} with {} profile(s)",
            id,
            executable.display(),
            profiles.len()
        );

        inventory.insert(
            id,
            BrowserDescriptor {
                id,
                name: id.display_name().to_string(),
                executable,
                icon_path: id.icon_path(),
                family,
                profiles,
            },
        );
    }

    inventory
}

#[derive(Debug)]
struct Snapshot {
    inventory: Inventory,
    taken_at: Instant,
}

impl Snapshot {
    fn take(layout: &SystemLayout, overrides: &BrowserOverrides) -> Self {
        Self {
            inventory: discover(layout, overrides),
            taken_at: Instant::now(),
        }
    }
}

/// Discovery with a short-lived in-memory cache
#[derive(Debug)]
pub struct Discovery {
    layout: SystemLayout,
    overrides: BrowserOverrides,
    ttl: Duration,
    snapshot: Option<Snapshot>,
}

impl Discovery {
    pub fn new(layout: SystemLayout, overrides: BrowserOverrides) -> Self {
        Self {
            layout,
            overrides,
            ttl: CACHE_TTL,
            snapshot: None,
        }
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Replace the overrides and drop any cached result
    pub fn set_overrides(&mut self, overrides: BrowserOverrides) {
        self.overrides = overrides;
        self.invalidate();
    }

    /// Current inventory, rescanning only if the cache is older than the TTL
    pub fn discover(&mut self) -> &Inventory {
        let expired = self
            .snapshot
            .as_ref()
            .is_some_and(|s| s.taken_at.elapsed() >= self.ttl);

        if expired {
            self.snapshot = None;
        }
        self.latest()
    }

    /// Most recent inventory regardless of age, scanning once if there is none
    pub fn latest(&mut self) -> &Inventory {
        let (layout, overrides) = (&self.layout, &self.overrides);
        &self
            .snapshot
            .get_or_insert_with(|| Snapshot::take(layout, overrides))
            .inventory
    }

    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    /// Whether the browser is installed and not disabled
    pub fn is_installed(&self, browser: BrowserId) -> bool {
        self.overrides.is_enabled(browser)
            && ExecutableFinder::new(&self.layout, self.overrides.executable(browser))
                .find(browser)
                .is_some()
    }

    /// Icon of a browser from the last scan
    pub fn icon_path(&self, browser: BrowserId) -> Option<&PathBuf> {
        self.snapshot
            .as_ref()?
            .inventory
            .get(&browser)
            .map(|b| &b.icon_path)
    }
}
