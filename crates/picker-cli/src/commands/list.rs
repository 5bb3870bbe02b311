use super::open_registry;
use crate::OutputFormat;
use anyhow::Result;
use console::style;
use picker_browser::ProfileEntry;

pub fn execute(all: bool, format: OutputFormat) -> Result<()> {
    let registry = open_registry()?;
    let entries = registry.all_profiles(!all);

    match format {
        OutputFormat::Json => output_json(&entries)?,
        OutputFormat::Table => output_table(&entries),
        OutputFormat::Pretty => {
            let preselected = registry
                .default_profile()
                .and_then(|d| entries.iter().position(|e| std::ptr::eq(*e, d)));
            output_pretty(&entries, preselected, all);
        }
    }

    Ok(())
}

fn output_json(entries: &[&ProfileEntry]) -> Result<()> {
    let json_str = serde_json::to_string_pretty(entries)?;
    println!("{}", json_str);
    Ok(())
}

fn output_table(entries: &[&ProfileEntry]) {
    println!("Browser,Profile,Display Name,Enabled,Default,Order,Last Used");
    for entry in entries {
        let last_used = entry
            .last_used
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        println!(
            "{},\"{}\",\"{}\",{},{},{},{}",
            entry.browser,
            entry.profile_id,
            entry.display_name,
            entry.enabled,
            entry.is_default,
            entry.order,
            last_used
        );
    }
}

fn output_pretty(entries: &[&ProfileEntry], preselected: Option<usize>, all: bool) {
    if entries.is_empty() {
        println!("No browser profiles found.");
        if !all {
            println!("Use --all to include disabled profiles.");
        }
        return;
    }

    println!("\n{}", style("Browser profiles").bold().cyan());
    println!();
    print_entries(entries, preselected);
    println!();
}

/// Numbered profile list shared by `list` and the picker prompt
pub fn print_entries(entries: &[&ProfileEntry], preselected: Option<usize>) {
    for (index, entry) in entries.iter().enumerate() {
        let marker = if preselected == Some(index) { "* " } else { "  " };

        let mut notes = Vec::new();
        if entry.is_default {
            notes.push(style("default").green().to_string());
        }
        if !entry.enabled {
            notes.push(style("disabled").dim().to_string());
        }
        if let Some(last_used) = entry.last_used {
            notes.push(style(format!("used {}", last_used.format("%Y-%m-%d"))).dim().to_string());
        }

        println!(
            "{}{:>2}) {:<16} {:<24} {}",
            marker,
            index + 1,
            entry.browser_name,
            entry.display_name,
            notes.join(", ")
        );
    }
}
