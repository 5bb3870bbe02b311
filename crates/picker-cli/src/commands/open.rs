//! Open a URL: either directly in a named profile, or through the numbered
//! picker with an auto-select countdown.

use super::list::print_entries;
use super::open_registry;
use crate::autoselect::{self, Choice};
use crate::url_arg::{MAX_URL_DISPLAY_LENGTH, normalize_url, truncate_url};
use anyhow::{Result, bail};
use console::{Term, style};
use picker_browser::{ProfileEntry, ProfileRegistry};
use picker_core::BrowserId;
use std::time::Duration;

pub fn execute(
    url: &str,
    browser: Option<BrowserId>,
    profile: Option<String>,
    timeout: Option<u32>,
) -> Result<()> {
    let url = normalize_url(url);
    let mut registry = open_registry()?;

    if let (Some(browser), Some(profile)) = (browser, profile) {
        return launch(&mut registry, browser, &profile, &url);
    }

    let entries: Vec<ProfileEntry> = registry.all_profiles(true).into_iter().cloned().collect();
    if entries.is_empty() {
        bail!("No enabled browser profiles found. Run 'browser-picker list --all' to see disabled ones.");
    }

    let preselected = registry.default_profile().and_then(|default| {
        entries
            .iter()
            .position(|e| e.browser == default.browser && e.profile_id == default.profile_id)
    });

    let seconds = timeout.unwrap_or_else(|| registry.store().default_timeout());
    let timeout = (seconds > 0).then(|| Duration::from_secs(seconds.into()));

    println!(
        "\n{} {}",
        style("Open").bold().cyan(),
        truncate_url(&url, MAX_URL_DISPLAY_LENGTH)
    );
    println!();
    let listed: Vec<&ProfileEntry> = entries.iter().collect();
    print_entries(&listed, preselected);
    println!();
    println!("Enter a number, press Enter for the default (*), or q to cancel.");

    let selected = match prompt(entries.len(), timeout)? {
        Choice::Entry(index) => &entries[index],
        Choice::Default | Choice::TimedOut => match preselected {
            Some(index) => &entries[index],
            None => bail!("No default profile to open"),
        },
        Choice::Abort => {
            println!("Cancelled.");
            return Ok(());
        }
    };

    launch(&mut registry, selected.browser, &selected.profile_id, &url)
}

/// Run the countdown prompt on a single-threaded runtime
fn prompt(count: usize, timeout: Option<Duration>) -> Result<Choice> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let term = Term::stdout();
    let interactive = term.is_term();

    if let (true, Some(timeout)) = (interactive, timeout) {
        let _ = term.write_str(&format!("Opening default in {}s", timeout.as_secs()));
    }

    let choice = runtime.block_on(async {
        let input = autoselect::stdin_lines();
        autoselect::run(
            input,
            count,
            timeout,
            |left| {
                if interactive {
                    let _ = term.clear_line();
                    let _ = term.write_str(&format!("Opening default in {}s", left));
                }
            },
            |line| println!("'{}' is not one of the listed profiles", line.trim()),
        )
        .await
    });

    // The stdin reader may still be blocked on a read; don't wait for it
    runtime.shutdown_background();

    if interactive && timeout.is_some() {
        let _ = term.clear_line();
    }
    if choice == Choice::TimedOut {
        println!("Timed out, opening the default profile");
    }
    Ok(choice)
}

fn launch(registry: &mut ProfileRegistry, browser: BrowserId, profile: &str, url: &str) -> Result<()> {
    let pid = registry.try_launch(browser, profile, url)?;

    let name = registry
        .get_profile(browser, profile)
        .map(|e| e.display_name.clone())
        .unwrap_or_else(|| profile.to_string());
    println!(
        "{} Opened {} in {} ({})",
        style("✅").green(),
        url,
        browser.display_name(),
        name
    );
    tracing::debug!("Browser started with pid {}", pid);
    Ok(())
}
