use anyhow::{Result, anyhow, bail};
use console::style;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const DESKTOP_FILE: &str = "browser-picker.desktop";

const MIME_TYPES: &str =
    "text/html;text/xml;application/xhtml+xml;x-scheme-handler/http;x-scheme-handler/https;";

/// Desktop entry that hands links to `exec`
pub fn desktop_entry(exec: &Path) -> String {
    format!(
        "[Desktop Entry]\n\
         Version=1.0\n\
         Type=Application\n\
         Name=Browser Picker\n\
         GenericName=Browser Profile Selector\n\
         Comment=Select browser and profile for opening links\n\
         Exec=\"{}\" %u\n\
         Icon=web-browser\n\
         Terminal=true\n\
         Categories=Network;WebBrowser;\n\
         MimeType={}\n\
         StartupNotify=true\n",
        exec.display(),
        MIME_TYPES
    )
}

fn applications_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("applications"))
        .ok_or_else(|| anyhow!("Could not determine the user data directory"))
}

/// Write the desktop entry and make it the default web browser
pub fn execute() -> Result<()> {
    let applications = applications_dir()?;
    fs::create_dir_all(&applications)?;

    let desktop_path = applications.join(DESKTOP_FILE);
    fs::write(&desktop_path, desktop_entry(&std::env::current_exe()?))?;
    println!("{} Wrote {}", style("✅").green(), desktop_path.display());

    let xdg_settings = which::which("xdg-settings")
        .map_err(|_| anyhow!("xdg-settings not found. Install xdg-utils to register the default browser."))?;

    let status = Command::new(xdg_settings)
        .args(["set", "default-web-browser", DESKTOP_FILE])
        .status()?;
    if !status.success() {
        bail!("Failed to register as default browser (xdg-settings {})", status);
    }

    println!("{} Registered as default browser", style("✅").green());
    Ok(())
}

/// Whether xdg-settings reports browser-picker as the default browser.
/// `None` when that cannot be determined.
pub fn is_registered() -> Option<bool> {
    let xdg_settings = which::which("xdg-settings").ok()?;
    let output = Command::new(xdg_settings)
        .args(["get", "default-web-browser"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim() == DESKTOP_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_entry_handles_web_links() {
        let entry = desktop_entry(Path::new("/home/user/.cargo/bin/browser-picker"));

        assert!(entry.starts_with("[Desktop Entry]\n"));
        assert!(entry.contains("Exec=\"/home/user/.cargo/bin/browser-picker\" %u\n"));
        assert!(entry.contains("x-scheme-handler/http;"));
        assert!(entry.contains("x-scheme-handler/https;"));
        assert!(entry.contains("Categories=Network;WebBrowser;\n"));
    }
}
