use super::register;
use crate::OutputFormat;
use anyhow::Result;
use console::style;
use picker_core::config::{self, MAX_TIMEOUT, MIN_TIMEOUT};
use picker_core::{BrowserOverrides, ConfigStore};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct ConfigReport {
    preferences_path: PathBuf,
    overrides_path: PathBuf,
    overrides_present: bool,
    default_timeout: u32,
    remember_last_used: bool,
    show_tray_icon: bool,
    last_used: Option<String>,
    registered_default: Option<bool>,
}

pub fn show(format: OutputFormat) -> Result<()> {
    let store = ConfigStore::read(config::preferences_path()?)?;
    let overrides_path = config::overrides_path()?;

    let report = ConfigReport {
        preferences_path: store.path().to_path_buf(),
        overrides_present: overrides_path.exists(),
        overrides_path,
        default_timeout: store.default_timeout(),
        remember_last_used: store.remember_last_used(),
        show_tray_icon: store.show_tray_icon(),
        last_used: store
            .last_used()
            .map(|(browser, profile)| format!("{}/{}", browser, profile)),
        registered_default: register::is_registered(),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => output_table(&report),
        OutputFormat::Pretty => output_pretty(&report),
    }
    Ok(())
}

fn output_table(report: &ConfigReport) {
    println!("Setting,Value");
    println!("preferences_path,{}", report.preferences_path.display());
    println!("overrides_path,{}", report.overrides_path.display());
    println!("overrides_present,{}", report.overrides_present);
    println!("default_timeout,{}", report.default_timeout);
    println!("remember_last_used,{}", report.remember_last_used);
    println!("show_tray_icon,{}", report.show_tray_icon);
    println!("last_used,{}", report.last_used.as_deref().unwrap_or(""));
    println!(
        "registered_default,{}",
        report.registered_default.map(|r| r.to_string()).unwrap_or_default()
    );
}

fn output_pretty(report: &ConfigReport) {
    println!("\n{}", style("browser-picker configuration").bold().cyan());
    println!();
    println!("  Preferences:        {}", report.preferences_path.display());

    let overrides_note = if report.overrides_present {
        String::new()
    } else {
        style(" (not present)").dim().to_string()
    };
    println!("  Overrides:          {}{}", report.overrides_path.display(), overrides_note);
    println!();
    println!("  Auto-select after:  {}s", report.default_timeout);
    println!("  Remember last used: {}", yes_no(report.remember_last_used));
    println!("  Show tray icon:     {}", yes_no(report.show_tray_icon));
    println!(
        "  Last used:          {}",
        report.last_used.as_deref().unwrap_or("-")
    );

    let registered = match report.registered_default {
        Some(true) => style("yes").green().to_string(),
        Some(false) => "no".to_string(),
        None => style("unknown").dim().to_string(),
    };
    println!("  Default browser:    {}", registered);

    if report.overrides_present && BrowserOverrides::load(&report.overrides_path).is_empty() {
        println!("\n  {}", style("Override file declares no browsers").dim());
    }
    println!();
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

pub fn set_timeout(seconds: u32) -> Result<()> {
    let mut store = ConfigStore::open_default()?;
    store.set_default_timeout(seconds)?;

    let stored = store.default_timeout();
    if stored != seconds {
        println!(
            "{} Timeout must be between {} and {} seconds, using {}",
            style("⚠️").yellow(),
            MIN_TIMEOUT,
            MAX_TIMEOUT,
            stored
        );
    }
    println!("{} Auto-select timeout set to {}s", style("✅").green(), stored);
    Ok(())
}

pub fn set_remember_last_used(remember: bool) -> Result<()> {
    let mut store = ConfigStore::open_default()?;
    store.set_remember_last_used(remember)?;
    println!("{} Remember last used: {}", style("✅").green(), yes_no(remember));
    Ok(())
}

pub fn set_tray_icon(show: bool) -> Result<()> {
    let mut store = ConfigStore::open_default()?;
    store.set_show_tray_icon(show)?;
    println!("{} Show tray icon: {}", style("✅").green(), yes_no(show));
    Ok(())
}
