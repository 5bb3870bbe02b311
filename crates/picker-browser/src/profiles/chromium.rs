use super::{ProfileMap, ProfileRecord, modified_time};
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const LOCAL_STATE: &str = "Local State";
pub const DEFAULT_PROFILE: &str = "Default";
const PREFERENCES: &str = "Preferences";

#[derive(Debug, Default, Deserialize)]
struct LocalState {
    #[serde(default)]
    profile: ProfileSection,
}

#[derive(Debug, Default, Deserialize)]
struct ProfileSection {
    #[serde(default)]
    info_cache: BTreeMap<String, InfoCacheEntry>,
    #[serde(default)]
    last_used: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct InfoCacheEntry {
    #[serde(default)]
    name: Option<String>,
}

/// Read Chrome/Chromium profiles from `<root>/Local State`
pub fn read_profiles(root: &Path) -> ProfileMap {
    let state_path = root.join(LOCAL_STATE);
    if !state_path.exists() {
        tracing::debug!("Local State not found at {}", state_path.display());
        return ProfileMap::new();
    }

    match parse_local_state(&state_path, root) {
        Ok(profiles) => profiles,
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", state_path.display(), e);
            ProfileMap::new()
        }
    }
}

fn parse_local_state(state_path: &Path, root: &Path) -> Result<ProfileMap> {
    let contents = std::fs::read_to_string(state_path)?;
    let state: LocalState = serde_json::from_str(&contents)?;

    let mut profiles = ProfileMap::new();

    // Chromium always has a Default profile, whether or not it is cached
    profiles.insert(
        DEFAULT_PROFILE.to_string(),
        ProfileRecord::new(DEFAULT_PROFILE, root.join(DEFAULT_PROFILE)),
    );

    for (dir_name, info) in state.profile.info_cache {
        let path = root.join(&dir_name);
        if !path.is_dir() {
            tracing::debug!("Skipping cached profile '{}' without a directory", dir_name);
            continue;
        }

        let mut record = ProfileRecord::new(dir_name.as_str(), path);
        if let Some(name) = info.name.filter(|n| !n.trim().is_empty()) {
            record.display_name = name;
        }
        profiles.insert(dir_name, record);
    }

    let default_dir = state
        .profile
        .last_used
        .filter(|dir| profiles.contains_key(dir))
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string());

    for record in profiles.values_mut() {
        record.is_default = record.id == default_dir;
        record.last_used = last_used(&record.path);
    }

    Ok(profiles)
}

/// Preferences mtime, falling back to the directory's mtime
fn last_used(profile_dir: &Path) -> Option<DateTime<Utc>> {
    let prefs = profile_dir.join(PREFERENCES);
    if prefs.exists() {
        return modified_time(&prefs);
    }
    modified_time(profile_dir)
}
