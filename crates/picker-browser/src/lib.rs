//! Browser and profile discovery, the ordered profile registry and the
//! launcher that opens URLs in a chosen profile.

pub mod discovery;
mod error;
pub mod family;
pub mod finder;
pub mod launcher;
pub mod profiles;
pub mod registry;
pub mod sanitize;

pub use discovery::{BrowserDescriptor, Discovery, Inventory, discover};
pub use error::{Error, LaunchError, Result};
pub use family::BrowserFamily;
pub use finder::{ExecutableFinder, SystemLayout};
pub use launcher::{DetachedSpawner, ProcessSpawner, SecureLauncher};
pub use profiles::{ProfileMap, ProfileRecord};
pub use registry::{ProfileEntry, ProfileRegistry, RegistryEvent};
