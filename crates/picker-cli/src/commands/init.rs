use anyhow::Result;
use console::style;
use picker_core::config;

/// Deploy the default preferences file and override template
pub fn execute(force: bool) -> Result<()> {
    let preferences = config::preferences_path()?;
    let overrides = config::overrides_path()?;

    if config::deploy_defaults_at(&preferences, &overrides, force)? {
        println!("{} Default config deployed", style("✅").green());
    } else {
        println!("Nothing to do (defaults already present)");
    }

    println!("   Preferences: {}", preferences.display());
    println!("   Overrides:   {}", overrides.display());
    Ok(())
}
