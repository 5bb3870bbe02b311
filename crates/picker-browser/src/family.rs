use crate::profiles::{self, ProfileMap};
use picker_core::BrowserId;
use serde::Serialize;
use std::path::Path;

/// Profile-store format and command-line shape shared by a group of browsers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserFamily {
    Firefox,
    Chromium,
}

impl BrowserFamily {
    pub fn of(browser: BrowserId) -> Self {
        match browser {
            BrowserId::Firefox => BrowserFamily::Firefox,
            BrowserId::Chrome | BrowserId::Chromium => BrowserFamily::Chromium,
        }
    }

    /// Enumerate the profiles stored under `root`
    pub fn read_profiles(&self, root: &Path) -> ProfileMap {
        match self {
            BrowserFamily::Firefox => profiles::firefox::read_profiles(root),
            BrowserFamily::Chromium => profiles::chromium::read_profiles(root),
        }
    }

    /// Arguments opening `url` in `profile`, one argv entry each
    pub fn launch_args(&self, profile: &str, url: &str) -> Vec<String> {
        match self {
            BrowserFamily::Firefox => vec!["-P".to_string(), profile.to_string(), url.to_string()],
            BrowserFamily::Chromium => vec![format!("--profile-directory={}", profile), url.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_mapping() {
        assert_eq!(BrowserFamily::of(BrowserId::Firefox), BrowserFamily::Firefox);
        assert_eq!(BrowserFamily::of(BrowserId::Chrome), BrowserFamily::Chromium);
        assert_eq!(BrowserFamily::of(BrowserId::Chromium), BrowserFamily::Chromium);
    }

    #[test]
    fn test_firefox_args_are_separate_entries() {
        let args = BrowserFamily::Firefox.launch_args("My Work", "https://example.com");
        assert_eq!(args, vec!["-P", "My Work", "https://example.com"]);
    }

    #[test]
    fn test_chromium_args_embed_profile_directory() {
        let args = BrowserFamily::Chromium.launch_args("Profile 1", "https://example.com");
        assert_eq!(args, vec!["--profile-directory=Profile 1", "https://example.com"]);
    }
}
