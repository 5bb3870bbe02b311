pub mod completion;
pub mod config;
pub mod init;
pub mod list;
pub mod open;
pub mod profile;
pub mod register;

use anyhow::Result;
use picker_browser::{Discovery, ProfileRegistry, SystemLayout};
use picker_core::{BrowserOverrides, ConfigStore};

/// Registry over the user's preferences, overrides and installed browsers
pub fn open_registry() -> Result<ProfileRegistry> {
    let store = ConfigStore::open_default()?;
    let overrides = BrowserOverrides::load_default();
    let discovery = Discovery::new(SystemLayout::detect(), overrides);

    Ok(ProfileRegistry::detached(store, discovery))
}
