use picker_core::BrowserId;
use picker_core::executable::is_executable_file;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Where discovery looks: the user's home, the executable search path and
/// the common install prefixes
#[derive(Debug, Clone)]
pub struct SystemLayout {
    home: PathBuf,
    search_path: Option<OsString>,
    prefix_dirs: Vec<PathBuf>,
    opt_root: Option<PathBuf>,
}

impl SystemLayout {
    /// Layout of the running system: `$HOME`, `$PATH` and the usual prefixes
    pub fn detect() -> Self {
        Self {
            home: dirs::home_dir().unwrap_or_else(|| PathBuf::from("/")),
            search_path: std::env::var_os("PATH"),
            prefix_dirs: vec![PathBuf::from("/usr/bin"), PathBuf::from("/usr/local/bin")],
            opt_root: Some(PathBuf::from("/opt")),
        }
    }

    /// Layout rooted entirely at `home`, ignoring system install prefixes
    pub fn isolated(home: impl Into<PathBuf>, search_path: Option<OsString>) -> Self {
        Self {
            home: home.into(),
            search_path,
            prefix_dirs: Vec::new(),
            opt_root: None,
        }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Fixed install locations checked after the search path
    fn fallback_candidates(&self, name: &str) -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> = self.prefix_dirs.iter().map(|dir| dir.join(name)).collect();
        if let Some(opt) = &self.opt_root {
            candidates.push(opt.join(name).join(name));
        }
        candidates.push(self.home.join(".local").join("bin").join(name));
        candidates
    }
}

/// Locates a browser executable, checking an override path first
pub struct ExecutableFinder<'a> {
    layout: &'a SystemLayout,
    custom_path: Option<&'a Path>,
}

impl<'a> ExecutableFinder<'a> {
    pub fn new(layout: &'a SystemLayout, custom_path: Option<&'a Path>) -> Self {
        Self { layout, custom_path }
    }

    /// Find the browser's executable. Absence is `None`, never an error.
    pub fn find(&self, browser: BrowserId) -> Option<PathBuf> {
        if let Some(path) = self.custom_path {
            if is_executable_file(path) {
                return Some(path.to_path_buf());
            }
            tracing::debug!(
                "Override for {} is not an executable file, searching instead: {}",
                browser,
                path.display()
            );
        }

        // First binary name that resolves wins
        let found = browser
            .binary_names()
            .iter()
            .find_map(|name| self.find_binary(name));

        if found.is_none() {
            tracing::debug!("{} not found (tried {})", browser, browser.binary_names().join(", "));
        }
        found
    }

    fn find_binary(&self, name: &str) -> Option<PathBuf> {
        if let Some(search_path) = &self.layout.search_path {
            if let Ok(path) = which::which_in(name, Some(search_path), self.layout.home()) {
                return Some(path);
            }
        }

        self.layout
            .fallback_candidates(name)
            .into_iter()
            .find(|candidate| is_executable_file(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::tests::fake_executable;

    #[test]
    fn test_finder_prefers_custom_path() {
        let temp = tempfile::tempdir().unwrap();
        let bin = temp.path().join("bin");
        fake_executable(&bin, "firefox");
        let custom = fake_executable(&temp.path().join("custom"), "my-firefox");

        let layout = SystemLayout::isolated(temp.path(), Some(bin.into_os_string()));
        let finder = ExecutableFinder::new(&layout, Some(&custom));

        assert_eq!(finder.find(BrowserId::Firefox), Some(custom));
    }

    #[test]
    fn test_invalid_custom_path_falls_back_to_search() {
        let temp = tempfile::tempdir().unwrap();
        let bin = temp.path().join("bin");
        let firefox = fake_executable(&bin, "firefox");

        let layout = SystemLayout::isolated(temp.path(), Some(bin.into_os_string()));
        let bogus = PathBuf::from("/nonexistent/firefox");
        let finder = ExecutableFinder::new(&layout, Some(&bogus));

        assert_eq!(finder.find(BrowserId::Firefox), Some(firefox));
    }

    #[test]
    fn test_chrome_variants_first_match_wins() {
        let temp = tempfile::tempdir().unwrap();
        let bin = temp.path().join("bin");
        fake_executable(&bin, "google-chrome-unstable");
        let stable = fake_executable(&bin, "google-chrome-stable");

        let layout = SystemLayout::isolated(temp.path(), Some(bin.into_os_string()));
        let finder = ExecutableFinder::new(&layout, None);

        assert_eq!(finder.find(BrowserId::Chrome), Some(stable));
    }

    #[test]
    fn test_local_bin_is_checked_without_search_path() {
        let temp = tempfile::tempdir().unwrap();
        let chromium = fake_executable(&temp.path().join(".local").join("bin"), "chromium");

        let layout = SystemLayout::isolated(temp.path(), None);
        let finder = ExecutableFinder::new(&layout, None);

        assert_eq!(finder.find(BrowserId::Chromium), Some(chromium));
    }

    #[test]
    fn test_finder_returns_none_when_not_found() {
        let temp = tempfile::tempdir().unwrap();
        let layout = SystemLayout::isolated(temp.path(), Some(temp.path().as_os_str().to_owned()));
        let finder = ExecutableFinder::new(&layout, None);

        assert!(finder.find(BrowserId::Firefox).is_none());
    }
}
