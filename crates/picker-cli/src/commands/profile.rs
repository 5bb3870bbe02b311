//! Per-profile settings: visibility, display name and position in the picker.
//!
//! ```bash
//! browser-picker profile disable firefox default-release
//! browser-picker profile rename chrome "Profile 1" Work
//! browser-picker profile move-up chrome "Profile 1"
//! ```

use super::open_registry;
use anyhow::{Result, anyhow};
use console::style;
use picker_browser::ProfileRegistry;
use picker_core::BrowserId;

fn registry_with_profile(browser: BrowserId, profile: &str) -> Result<ProfileRegistry> {
    let registry = open_registry()?;
    if !registry.has_profile(browser, profile) {
        return Err(anyhow!(
            "Profile '{}' not found for browser {}",
            profile,
            browser
        ));
    }
    Ok(registry)
}

pub fn set_enabled(browser: BrowserId, profile: &str, enabled: bool) -> Result<()> {
    let mut registry = registry_with_profile(browser, profile)?;
    registry.set_profile_enabled(browser, profile, enabled)?;

    let state = if enabled { "enabled" } else { "disabled" };
    println!("{} {} profile '{}' {}", style("✅").green(), browser.display_name(), profile, state);
    Ok(())
}

/// Set a display name; no name restores the one the browser reports
pub fn rename(browser: BrowserId, profile: &str, name: Option<&str>) -> Result<()> {
    let mut registry = registry_with_profile(browser, profile)?;
    registry.set_profile_display_name(browser, profile, name.unwrap_or(""))?;

    let shown = registry
        .get_profile(browser, profile)
        .map(|e| e.display_name.clone())
        .unwrap_or_else(|| profile.to_string());
    println!("{} {} profile '{}' is shown as '{}'", style("✅").green(), browser.display_name(), profile, shown);
    Ok(())
}

pub fn move_up(browser: BrowserId, profile: &str) -> Result<()> {
    let mut registry = registry_with_profile(browser, profile)?;
    let moved = registry.move_up(browser, profile)?;
    report_move(&registry, browser, profile, moved, "up", "top")
}

pub fn move_down(browser: BrowserId, profile: &str) -> Result<()> {
    let mut registry = registry_with_profile(browser, profile)?;
    let moved = registry.move_down(browser, profile)?;
    report_move(&registry, browser, profile, moved, "down", "bottom")
}

fn report_move(
    registry: &ProfileRegistry,
    browser: BrowserId,
    profile: &str,
    moved: bool,
    direction: &str,
    edge: &str,
) -> Result<()> {
    if !moved {
        println!("Profile '{}' is already at the {}", profile, edge);
        return Ok(());
    }

    let order = registry
        .get_profile(browser, profile)
        .map(|e| e.order)
        .ok_or_else(|| anyhow!("Profile '{}' disappeared while moving", profile))?;
    println!(
        "{} Moved {} profile '{}' {} (order {})",
        style("✅").green(),
        browser.display_name(),
        profile,
        direction,
        order
    );
    Ok(())
}
