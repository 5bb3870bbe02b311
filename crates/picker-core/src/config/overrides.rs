use crate::executable::is_executable_file;
use crate::{BrowserId, Result};
use serde::Deserialize;
use serde_yaml_ng::{Mapping, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Executable-path and enabled overrides declared in the YAML override file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowserOverrides {
    executables: HashMap<BrowserId, PathBuf>,
    enabled: HashMap<BrowserId, bool>,
}

#[derive(Debug, Default, Deserialize)]
struct OverridesFile {
    #[serde(default)]
    browsers: Option<Mapping>,
}

/// The `{path, enabled}` form of a browser entry
#[derive(Debug, Default, Deserialize)]
struct OverrideEntry {
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    enabled: Option<bool>,
}

impl OverrideEntry {
    /// Interpret one browser's value. `None` means there is nothing to apply.
    fn from_value(browser: BrowserId, value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(path) => Some(Self {
                path: Some(path),
                enabled: None,
            }),
            value @ Value::Mapping(_) => match serde_yaml_ng::from_value(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Ignoring malformed override for {}: {}", browser, e);
                    None
                }
            },
            other => {
                tracing::warn!(
                    "Ignoring override for {}: expected a path or a mapping, got {:?}",
                    browser,
                    other
                );
                None
            }
        }
    }
}

impl BrowserOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load overrides from the default location. Missing or malformed files yield no overrides.
    pub fn load_default() -> Self {
        match super::overrides_path() {
            Ok(path) => Self::load(&path),
            Err(e) => {
                tracing::debug!("No override file location: {}", e);
                Self::default()
            }
        }
    }

    /// Load overrides from `path`, absorbing any failure as "no overrides"
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("Override file not found at {}", path.display());
            return Self::default();
        }

        match fs::read_to_string(path)
            .map_err(crate::Error::from)
            .and_then(|contents| Self::parse(&contents))
        {
            Ok(overrides) => overrides,
            Err(e) => {
                tracing::warn!("Ignoring override file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse override YAML. Unknown browsers and unusable paths are dropped.
    pub fn parse(contents: &str) -> Result<Self> {
        let value: Value = serde_yaml_ng::from_str(contents)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        let file: OverridesFile = serde_yaml_ng::from_value(value)?;

        let mut overrides = Self::default();
        for (key, value) in file.browsers.unwrap_or_default() {
            let Some(browser) = key.as_str().and_then(|k| k.parse::<BrowserId>().ok()) else {
                tracing::debug!("Ignoring override for unknown browser {:?}", key);
                continue;
            };
            let Some(entry) = OverrideEntry::from_value(browser, value) else {
                continue;
            };

            if let Some(path) = entry.path.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()) {
                overrides = overrides.with_executable(browser, path);
            }
            if let Some(enabled) = entry.enabled {
                overrides.enabled.insert(browser, enabled);
            }
        }

        Ok(overrides)
    }

    /// Add an executable override; paths that are not executable regular files are ignored
    pub fn with_executable(mut self, browser: BrowserId, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if is_executable_file(&path) {
            self.executables.insert(browser, path);
        } else {
            tracing::debug!(
                "Ignoring {} override, not an executable file: {}",
                browser,
                path.display()
            );
        }
        self
    }

    pub fn with_enabled(mut self, browser: BrowserId, enabled: bool) -> Self {
        self.enabled.insert(browser, enabled);
        self
    }

    pub fn executable(&self, browser: BrowserId) -> Option<&Path> {
        self.executables.get(&browser).map(PathBuf::as_path)
    }

    /// False only when the browser is explicitly disabled
    pub fn is_enabled(&self, browser: BrowserId) -> bool {
        self.enabled.get(&browser).copied().unwrap_or(true)
    }

    pub fn is_empty(&self) -> bool {
        self.executables.is_empty() && self.enabled.is_empty()
    }
}
