use crate::discovery::Inventory;
use crate::error::LaunchError;
use crate::sanitize::{is_valid_profile_name, is_valid_url, sanitize_profile_name, sanitize_url};
use picker_core::BrowserId;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Starts a program without keeping any handle to it
pub trait ProcessSpawner {
    /// Spawn `program` with `args` as separate argv entries and return its pid
    fn spawn_detached(&self, program: &Path, args: &[String]) -> io::Result<u32>;
}

/// Spawns into a new process group with all stdio redirected to null
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedSpawner;

impl ProcessSpawner for DetachedSpawner {
    fn spawn_detached(&self, program: &Path, args: &[String]) -> io::Result<u32> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        // The child handle is dropped on return; nothing waits on the browser
        let child = command.spawn()?;
        Ok(child.id())
    }
}

/// Validates launch requests and hands them to a [`ProcessSpawner`]
#[derive(Debug, Clone, Default)]
pub struct SecureLauncher<S = DetachedSpawner> {
    spawner: S,
}

impl<S: ProcessSpawner> SecureLauncher<S> {
    pub fn new(spawner: S) -> Self {
        Self { spawner }
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    /// Open `url` in `profile` of `browser`, returning the spawned pid.
    ///
    /// Inputs are sanitized and validated before the inventory is consulted;
    /// nothing is spawned unless every check passes.
    pub fn launch(
        &self,
        inventory: &Inventory,
        browser: BrowserId,
        profile: &str,
        url: &str,
    ) -> Result<u32, LaunchError> {
        let url = sanitize_url(url);
        let profile = sanitize_profile_name(profile);

        if !is_valid_url(&url) {
            tracing::warn!("Rejected URL: {}", url);
            return Err(LaunchError::InvalidUrl(url));
        }
        if !is_valid_profile_name(&profile) {
            tracing::warn!("Rejected profile name: {}", profile);
            return Err(LaunchError::InvalidProfileName(profile));
        }

        let descriptor = inventory
            .get(&browser)
            .ok_or(LaunchError::BrowserNotFound(browser))?;
        if !descriptor.profiles.contains_key(&profile) {
            return Err(LaunchError::ProfileNotFound { browser, profile });
        }

        let args = descriptor.family.launch_args(&profile, &url);
        tracing::debug!("Launching {} {:?}", descriptor.executable.display(), args);

        let pid = self
            .spawner
            .spawn_detached(&descriptor.executable, &args)
            .map_err(|source| LaunchError::Spawn { browser, source })?;

        tracing::info!("Opened {} in {} profile '{}' (pid {})", url, browser, profile, pid);
        Ok(pid)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::discovery::BrowserDescriptor;
    use crate::family::BrowserFamily;
    use crate::profiles::{ProfileMap, ProfileRecord};
    use std::cell::RefCell;
    use std::path::PathBuf;

    /// Records spawn requests instead of starting processes
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSpawner {
        pub calls: RefCell<Vec<(PathBuf, Vec<String>)>>,
        pub fail: bool,
    }

    impl ProcessSpawner for RecordingSpawner {
        fn spawn_detached(&self, program: &Path, args: &[String]) -> io::Result<u32> {
            if self.fail {
                return Err(io::Error::from(io::ErrorKind::PermissionDenied));
            }
            let mut calls = self.calls.borrow_mut();
            calls.push((program.to_path_buf(), args.to_vec()));
            Ok(4000 + calls.len() as u32)
        }
    }

    pub(crate) fn descriptor(id: BrowserId, profiles: &[&str]) -> BrowserDescriptor {
        let profiles: ProfileMap = profiles
            .iter()
            .map(|name| (name.to_string(), ProfileRecord::new(*name, format!("/profiles/{}", name))))
            .collect();

        BrowserDescriptor {
            id,
            name: id.display_name().to_string(),
            executable: PathBuf::from(format!("/usr/bin/{}", id)),
            icon_path: id.icon_path(),
            family: BrowserFamily::of(id),
            profiles,
        }
    }

    fn inventory() -> Inventory {
        let mut inventory = Inventory::new();
        inventory.insert(BrowserId::Firefox, descriptor(BrowserId::Firefox, &["Default", "Work"]));
        inventory.insert(BrowserId::Chrome, descriptor(BrowserId::Chrome, &["Default", "Profile 1"]));
        inventory
    }

    #[test]
    fn test_firefox_launch_argv() {
        let launcher = SecureLauncher::new(RecordingSpawner::default());

        let pid = launcher
            .launch(&inventory(), BrowserId::Firefox, "Work", "https://example.com")
            .unwrap();

        assert_eq!(pid, 4001);
        let calls = launcher.spawner().calls.borrow();
        assert_eq!(calls[0].0, PathBuf::from("/usr/bin/firefox"));
        assert_eq!(calls[0].1, vec!["-P", "Work", "https://example.com"]);
    }

    #[test]
    fn test_chrome_launch_argv_after_sanitizing() {
        let launcher = SecureLauncher::new(RecordingSpawner::default());

        launcher
            .launch(&inventory(), BrowserId::Chrome, " Profile 1\0 ", "  about:blank\n")
            .unwrap();

        let calls = launcher.spawner().calls.borrow();
        assert_eq!(calls[0].1, vec!["--profile-directory=Profile 1", "about:blank"]);
    }

    #[test]
    fn test_javascript_url_spawns_nothing() {
        let launcher = SecureLauncher::new(RecordingSpawner::default());

        let err = launcher
            .launch(&inventory(), BrowserId::Firefox, "Work", "javascript:alert(1)")
            .unwrap_err();

        assert!(matches!(err, LaunchError::InvalidUrl(_)));
        assert!(launcher.spawner().calls.borrow().is_empty());
    }

    #[test]
    fn test_invalid_profile_name_is_rejected() {
        let launcher = SecureLauncher::new(RecordingSpawner::default());

        let err = launcher
            .launch(&inventory(), BrowserId::Firefox, "Work; rm -rf /", "https://example.com")
            .unwrap_err();

        assert!(matches!(err, LaunchError::InvalidProfileName(_)));
        assert!(launcher.spawner().calls.borrow().is_empty());
    }

    #[test]
    fn test_unknown_browser_and_profile() {
        let launcher = SecureLauncher::new(RecordingSpawner::default());

        let err = launcher
            .launch(&inventory(), BrowserId::Chromium, "Default", "https://example.com")
            .unwrap_err();
        assert_eq!(err.to_string(), "Browser chromium not found");

        let err = launcher
            .launch(&inventory(), BrowserId::Firefox, "Missing", "https://example.com")
            .unwrap_err();
        assert_eq!(err.to_string(), "Profile Missing not found for browser firefox");
        assert!(launcher.spawner().calls.borrow().is_empty());
    }

    #[test]
    fn test_spawn_failure_carries_os_error() {
        let launcher = SecureLauncher::new(RecordingSpawner {
            fail: true,
            ..Default::default()
        });

        let err = launcher
            .launch(&inventory(), BrowserId::Firefox, "Work", "https://example.com")
            .unwrap_err();

        match err {
            LaunchError::Spawn { browser, source } => {
                assert_eq!(browser, BrowserId::Firefox);
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_detached_spawner_returns_pid() {
        let pid = DetachedSpawner
            .spawn_detached(Path::new("/bin/sh"), &["-c".to_string(), "exit 0".to_string()])
            .unwrap();
        assert!(pid > 0);
    }

    #[test]
    fn test_detached_spawner_missing_program() {
        let err = DetachedSpawner
            .spawn_detached(Path::new("/nonexistent/browser-binary"), &[])
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
