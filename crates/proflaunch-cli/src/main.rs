use anyhow::{Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use proflaunch_browser::Channel;
use proflaunch_cli::OutputFormat;
use proflaunch_cli::commands;
use proflaunch_cli::commands::open::OpenOptions;
use proflaunch_cli::context::{AppContext, default_config_path, log_path_for};
use proflaunch_cli::logging::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "proflaunch")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Open Chrome profiles by email",
    long_about = "proflaunch lists the Chrome profiles signed in on this machine, finds them by \
                  number or email, and opens Chrome with the right profile and target URLs.\n\n\
                  Run without arguments for an overview of favorites, recent and most-used profiles. \
                  Pass --email to launch a single profile non-interactively."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Launch the profile for this email and exit
    #[arg(short, long, value_name = "EMAIL")]
    email: Option<String>,

    /// Target for --email: preset number, custom URL name or URL (repeatable)
    #[arg(short, long, value_name = "URL", requires = "email")]
    url: Vec<String>,

    /// Open --email in incognito mode
    #[arg(short, long, requires = "email")]
    incognito: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, table, pretty)
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,

    /// Settings file
    #[arg(long, global = true, env = "PROFLAUNCH_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Chrome "Local State" file to read profiles from
    #[arg(long, global = true, env = "PROFLAUNCH_LOCAL_STATE", value_name = "PATH")]
    local_state: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List Chrome profiles found in Local State
    List,

    /// Search profiles by number, email text or regex
    #[command(
        long_about = "Search profiles by number, email text or regex.\n\n\
                      A query containing '@' matches emails case-insensitively (an exact match \
                      wins). Otherwise the digits of the query are matched, with and without \
                      leading zeros, so '07' finds both user7@ and user07@."
    )]
    Search {
        /// Number, email fragment or pattern
        query: String,

        /// Treat the query as a regular expression
        #[arg(long)]
        regex: bool,
    },

    /// Show detailed information about a profile
    Info {
        /// Profile email
        email: String,
    },

    /// Open Chrome with the profile for an email
    Open {
        /// Profile email
        #[arg(required_unless_present = "last")]
        email: Option<String>,

        /// Preset number, custom URL name or URL; opens one window each (repeatable)
        #[arg(short, long, value_name = "URL")]
        url: Vec<String>,

        /// Open in incognito mode
        #[arg(short, long)]
        incognito: bool,

        /// Reopen the last launched email
        #[arg(long, conflicts_with = "email")]
        last: bool,

        /// Chrome channel for this launch (stable, beta, dev, canary)
        #[arg(long)]
        channel: Option<Channel>,
    },

    /// Add or remove a favorite
    Favorite {
        /// Profile email
        email: String,
    },

    /// Show favorites, recent and most-used profiles
    Overview,

    /// Manage target URLs
    Url {
        #[command(subcommand)]
        command: UrlCommands,
    },

    /// Show or clear search history
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },

    /// Inspect and edit settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Check for and install updates
    Update {
        #[command(subcommand)]
        command: UpdateCommands,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts for proflaunch.

SUPPORTED SHELLS:
    bash, zsh, fish, powershell, elvish

INSTALLATION:
    Bash:
        proflaunch completion --shell bash > ~/.local/share/bash-completion/completions/proflaunch
        # or add to ~/.bashrc:
        eval \"$(proflaunch completion --shell bash)\"

    Zsh:
        proflaunch completion --shell zsh > \"${fpath[1]}/_proflaunch\"
        # or add to ~/.zshrc:
        eval \"$(proflaunch completion --shell zsh)\"

    Fish:
        proflaunch completion --shell fish > ~/.config/fish/completions/proflaunch.fish

    PowerShell:
        proflaunch completion --shell powershell | Out-String | Invoke-Expression")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum UrlCommands {
    /// List preset, custom and per-email URLs
    List,

    /// Save a named custom URL
    Add { name: String, url: String },

    /// Delete a custom URL
    Remove { name: String },

    /// Set the default preset (1-7)
    Default { choice: String },

    /// Open a preset for one email instead of the default
    Assign { email: String, choice: String },

    /// Drop an email's preset assignment
    Unassign { email: String },

    /// Turn per-email presets on or off
    PerEmail {
        #[arg(value_parser = ["on", "off"])]
        state: String,
    },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// List recent search queries
    List,

    /// Forget all search queries
    Clear,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the settings file
    Show,

    /// Print settings, log and Local State locations
    Path,

    /// Set a settings key
    Set { key: String, value: String },

    /// Write the current settings to a file
    Export { dest: PathBuf },

    /// Replace the settings with a file's content
    Import { src: PathBuf },
}

#[derive(Subcommand)]
enum UpdateCommands {
    /// Check whether a newer version is published
    Check,

    /// Download and install the newer version
    Install {
        /// Install without asking
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    init_logging(cli.verbose, Some(&log_path_for(&config_path)));

    let mut ctx = AppContext::load(Some(config_path), cli.local_state.clone())?;
    let format = cli.format;

    if let Some(email) = cli.email {
        if cli.command.is_some() {
            bail!("--email cannot be combined with a subcommand");
        }
        let options = OpenOptions {
            urls: cli.url,
            incognito: cli.incognito,
            channel: None,
        };
        return commands::open::execute(&mut ctx, Some(&email), false, &options);
    }

    match cli.command.unwrap_or(Commands::Overview) {
        Commands::List => commands::list::execute(&ctx, format),
        Commands::Search { query, regex } => {
            commands::search::execute(&mut ctx, &query, regex, format)
        }
        Commands::Info { email } => commands::info::execute(&ctx, &email, format),
        Commands::Open {
            email,
            url,
            incognito,
            last,
            channel,
        } => {
            let options = OpenOptions {
                urls: url,
                incognito,
                channel,
            };
            commands::open::execute(&mut ctx, email.as_deref(), last, &options)
        }
        Commands::Favorite { email } => commands::favorite::execute(&mut ctx, &email),
        Commands::Overview => commands::overview::execute(&mut ctx, format),
        Commands::Url { command } => match command {
            UrlCommands::List => commands::url::list(&ctx, format),
            UrlCommands::Add { name, url } => commands::url::add(&mut ctx, &name, &url),
            UrlCommands::Remove { name } => commands::url::remove(&mut ctx, &name),
            UrlCommands::Default { choice } => commands::url::set_default(&mut ctx, &choice),
            UrlCommands::Assign { email, choice } => {
                commands::url::assign(&mut ctx, &email, &choice)
            }
            UrlCommands::Unassign { email } => commands::url::unassign(&mut ctx, &email),
            UrlCommands::PerEmail { state } => commands::url::per_email(&mut ctx, state == "on"),
        },
        Commands::History { command } => match command {
            HistoryCommands::List => commands::history::list(&ctx, format),
            HistoryCommands::Clear => commands::history::clear(&mut ctx),
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config::show(&ctx),
            ConfigCommands::Path => commands::config::path(&ctx),
            ConfigCommands::Set { key, value } => commands::config::set(&mut ctx, &key, &value),
            ConfigCommands::Export { dest } => commands::config::export(&ctx, &dest),
            ConfigCommands::Import { src } => commands::config::import(&mut ctx, &src),
        },
        Commands::Update { command } => match command {
            UpdateCommands::Check => commands::update::check(&mut ctx),
            UpdateCommands::Install { yes } => commands::update::install(&mut ctx, yes),
        },
        Commands::Completion { shell } => {
            commands::completion::execute(shell, &mut Cli::command())
        }
    }
}
