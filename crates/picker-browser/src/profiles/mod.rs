//! On-disk profile stores.
//!
//! Firefox keeps its profile list in `profiles.ini`; Chrome and Chromium keep
//! theirs in the JSON `Local State` file. Both parsers absorb failures and
//! return an empty map, so a broken profile store only hides that browser's
//! profiles.

pub mod chromium;
pub mod firefox;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One profile as reported by the browser's own metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileRecord {
    /// Stable identifier: the Firefox profile name or the Chromium profile directory
    pub id: String,
    pub display_name: String,
    pub path: PathBuf,
    pub last_used: Option<DateTime<Utc>>,
    /// The browser itself considers this its default profile
    pub is_default: bool,
}

impl ProfileRecord {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            path: path.into(),
            last_used: None,
            is_default: false,
        }
    }
}

/// Profiles of one browser keyed by profile id
pub type ProfileMap = BTreeMap<String, ProfileRecord>;

/// Modification time of `path`, if it can be read
pub(crate) fn modified_time(path: &Path) -> Option<DateTime<Utc>> {
    let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(DateTime::<Utc>::from(modified))
}
