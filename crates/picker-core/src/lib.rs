pub mod browser;
pub mod config;
pub mod error;
pub mod executable;

pub use browser::BrowserId;
pub use config::{BrowserOverrides, ConfigStore};
pub use error::{Error, Result};
