use anyhow::Result;
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use clap::builder::BoolishValueParser;
use clap_complete::Shell;
use picker_cli::{OutputFormat, commands};
use picker_core::BrowserId;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "browser-picker")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Pick which browser and profile should open a link",
    long_about = "browser-picker finds the installed Firefox, Chrome and Chromium browsers and their \
                  profiles, lets you choose one for the given URL and opens it there. Without a choice \
                  the default profile is opened when the countdown runs out."
)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    open: OpenArgs,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct OpenArgs {
    /// URL to open; bare hosts get an https:// prefix
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Open directly in this browser (firefox, chrome, chromium)
    #[arg(long, requires = "profile", value_parser = BrowserId::from_str)]
    browser: Option<BrowserId>,

    /// Open directly in this profile of --browser
    #[arg(long, requires = "browser")]
    profile: Option<String>,

    /// Seconds before the default profile is opened (0 waits indefinitely)
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u32>,

    /// Register browser-picker as the default web browser
    #[arg(long, conflicts_with_all = ["url", "init_defaults"])]
    register_default: bool,

    /// Deploy default config files to ~/.config/browser-picker
    #[arg(long, conflicts_with = "url")]
    init_defaults: bool,

    /// Overwrite the override template when used with --init-defaults
    #[arg(long, requires = "init_defaults")]
    force: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List discovered browser profiles in picker order
    List {
        /// Include disabled profiles
        #[arg(long)]
        all: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },

    /// Enable, disable, rename or reorder a profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Show or change preferences
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    #[command(
        long_about = "Generate shell completion scripts for browser-picker.\n\n\
                      SUPPORTED SHELLS: bash, zsh, fish, powershell, elvish\n\n\
                      INSTALLATION:\n  \
                      bash: browser-picker completion --shell bash >> ~/.bashrc\n  \
                      zsh:  browser-picker completion --shell zsh > ~/.zfunc/_browser-picker\n  \
                      fish: browser-picker completion --shell fish > ~/.config/fish/completions/browser-picker.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
struct ProfileTarget {
    /// Browser id (firefox, chrome, chromium)
    #[arg(value_parser = BrowserId::from_str)]
    browser: BrowserId,

    /// Profile id as listed by `browser-picker list --all`
    profile: String,
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show the profile in the picker
    Enable(ProfileTarget),

    /// Hide the profile from the picker
    Disable(ProfileTarget),

    /// Set the name shown in the picker; omit NAME to restore the browser's own
    Rename {
        #[command(flatten)]
        target: ProfileTarget,

        /// New display name
        name: Option<String>,
    },

    /// Swap position with the profile listed above
    MoveUp(ProfileTarget),

    /// Swap position with the profile listed below
    MoveDown(ProfileTarget),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current preferences and file locations
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },

    /// Set the auto-select timeout in seconds (5-60)
    SetTimeout {
        #[arg(value_name = "SECS")]
        seconds: u32,
    },

    /// Remember the last opened profile as the default (on/off)
    RememberLastUsed {
        #[arg(action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        value: bool,
    },

    /// Show a tray icon (on/off)
    TrayIcon {
        #[arg(action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        value: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::List { all, format }) => commands::list::execute(all, format),
        Some(Commands::Profile { command }) => match command {
            ProfileCommands::Enable(t) => commands::profile::set_enabled(t.browser, &t.profile, true),
            ProfileCommands::Disable(t) => commands::profile::set_enabled(t.browser, &t.profile, false),
            ProfileCommands::Rename { target, name } => {
                commands::profile::rename(target.browser, &target.profile, name.as_deref())
            }
            ProfileCommands::MoveUp(t) => commands::profile::move_up(t.browser, &t.profile),
            ProfileCommands::MoveDown(t) => commands::profile::move_down(t.browser, &t.profile),
        },
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show { format } => commands::config::show(format),
            ConfigCommands::SetTimeout { seconds } => commands::config::set_timeout(seconds),
            ConfigCommands::RememberLastUsed { value } => commands::config::set_remember_last_used(value),
            ConfigCommands::TrayIcon { value } => commands::config::set_tray_icon(value),
        },
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            commands::completion::execute(shell, &mut cmd, &mut std::io::stdout())
        }
        None => run_open(cli.open),
    }
}

fn run_open(args: OpenArgs) -> Result<()> {
    if args.register_default {
        return commands::register::execute();
    }
    if args.init_defaults {
        return commands::init::execute(args.force);
    }

    let Some(url) = args.url else {
        Cli::command().print_help()?;
        std::process::exit(1);
    };

    commands::open::execute(&url, args.browser, args.profile, args.timeout)
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("browser_picker=debug,picker_cli=debug,picker_core=debug,picker_browser=debug")
    } else {
        EnvFilter::new("browser_picker=info,picker_cli=info,picker_core=info,picker_browser=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
