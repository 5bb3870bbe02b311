use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The browsers browser-picker knows how to discover and launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserId {
    Firefox,
    Chrome,
    Chromium,
}

impl BrowserId {
    pub const ALL: [BrowserId; 3] = [BrowserId::Firefox, BrowserId::Chrome, BrowserId::Chromium];

    /// Stable identifier used in config keys and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserId::Firefox => "firefox",
            BrowserId::Chrome => "chrome",
            BrowserId::Chromium => "chromium",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BrowserId::Firefox => "Firefox",
            BrowserId::Chrome => "Google Chrome",
            BrowserId::Chromium => "Chromium",
        }
    }

    /// Binary names to look for, in priority order
    pub fn binary_names(&self) -> &'static [&'static str] {
        match self {
            BrowserId::Firefox => &["firefox"],
            // Distributions ship Chrome under different channel names
            BrowserId::Chrome => &[
                "google-chrome",
                "google-chrome-stable",
                "google-chrome-beta",
                "google-chrome-unstable",
            ],
            BrowserId::Chromium => &["chromium", "chromium-browser"],
        }
    }

    pub fn icon_path(&self) -> PathBuf {
        let file = match self {
            BrowserId::Firefox => "firefox.png",
            BrowserId::Chrome => "google-chrome.png",
            BrowserId::Chromium => "chromium.png",
        };
        PathBuf::from("/usr/share/icons/hicolor/48x48/apps").join(file)
    }

    /// Directory holding the browser's profile store, relative to a home directory
    pub fn profile_root(&self, home: &Path) -> PathBuf {
        match self {
            BrowserId::Firefox => home.join(".mozilla").join("firefox"),
            BrowserId::Chrome => home.join(".config").join("google-chrome"),
            BrowserId::Chromium => home.join(".config").join("chromium"),
        }
    }
}

impl fmt::Display for BrowserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserId {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "firefox" => Ok(BrowserId::Firefox),
            "chrome" => Ok(BrowserId::Chrome),
            "chromium" => Ok(BrowserId::Chromium),
            other => Err(crate::Error::UnknownBrowser(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_id_round_trips_through_str() {
        for id in BrowserId::ALL {
            assert_eq!(id.as_str().parse::<BrowserId>().unwrap(), id);
        }
    }

    #[test]
    fn test_unknown_browser_id_is_rejected() {
        let err = "edge".parse::<BrowserId>().unwrap_err();
        assert!(err.to_string().contains("edge"));
        assert!("Firefox".parse::<BrowserId>().is_err());
    }

    #[test]
    fn test_chrome_binary_variants_in_priority_order() {
        let names = BrowserId::Chrome.binary_names();
        assert_eq!(names[0], "google-chrome");
        assert_eq!(names[1], "google-chrome-stable");
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn test_profile_roots() {
        let home = Path::new("/home/alice");
        assert_eq!(
            BrowserId::Firefox.profile_root(home),
            PathBuf::from("/home/alice/.mozilla/firefox")
        );
        assert_eq!(
            BrowserId::Chrome.profile_root(home),
            PathBuf::from("/home/alice/.config/google-chrome")
        );
        assert_eq!(
            BrowserId::Chromium.profile_root(home),
            PathBuf::from("/home/alice/.config/chromium")
        );
    }
}
