//! HobbyHub CLI - browse, join and manage hobby groups from the terminal.

mod app;
mod commands;
mod output;

use app::App;
use clap::{Parser, Subcommand};
use hub_config_and_utils::{init_logging, Config, Paths};
use hub_storage::{PreferencesManager, Theme};
use identity_engine::FederatedProvider;
use page_controllers::PageError;
use session_propagation::SessionError;
use tracing::debug;

/// HobbyHub CLI - find people who share your hobbies.
#[derive(Parser)]
#[command(name = "hobbyhub")]
#[command(about = "HobbyHub CLI for hobby groups and your account")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error); defaults to the config file
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        /// Profile photo URL (a default avatar is used otherwise)
        #[arg(long)]
        photo_url: Option<String>,
    },

    /// Login with email and password, or with a provider
    Login {
        /// Sign in through a third-party provider (google)
        #[arg(long)]
        provider: Option<FederatedProvider>,

        /// Path to continue to after signing in
        #[arg(long)]
        redirect: Option<String>,
    },

    /// Logout and clear session
    Logout,

    /// Check authentication status
    Status,

    /// Browse and manage groups
    Groups {
        #[command(subcommand)]
        command: GroupCommands,
    },

    /// Groups you created
    MyGroups,

    /// Catalog statistics and your recent groups
    Dashboard,

    /// Light or dark theme preference
    Theme {
        #[command(subcommand)]
        command: Option<ThemeCommands>,
    },
}

#[derive(Subcommand)]
enum GroupCommands {
    /// List groups
    List {
        #[command(flatten)]
        args: commands::ListArgs,
    },
    /// Show group details
    Show {
        /// Group ID
        id: String,
    },
    /// Join a group
    Join {
        /// Group ID
        id: String,
    },
    /// Leave a group
    Leave {
        /// Group ID
        id: String,
    },
    /// Create a group
    Create {
        #[command(flatten)]
        draft: commands::DraftArgs,
    },
    /// Update a group you created
    Update {
        /// Group ID
        id: String,
        #[command(flatten)]
        draft: commands::DraftArgs,
    },
    /// Delete a group you created
    Delete {
        /// Group ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ThemeCommands {
    /// Show the current theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Set the theme
    Set {
        /// light or dark
        theme: Theme,
    },
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let config = Config::load(&paths)?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    init_logging(level, &paths, false);
    debug!(api_url = %config.api_url, "Starting HobbyHub CLI");

    // Theme only touches local storage.
    if let Commands::Theme { command } = cli.command {
        paths.ensure_dirs()?;
        let prefs = PreferencesManager::new(hub_storage::create_storage(&paths)?);
        return match command.unwrap_or(ThemeCommands::Show) {
            ThemeCommands::Show => commands::theme_show(&prefs, cli.format),
            ThemeCommands::Toggle => commands::theme_toggle(&prefs, cli.format),
            ThemeCommands::Set { theme } => commands::theme_set(&prefs, theme, cli.format),
        };
    }

    let app = App::start(&config, &paths, cli.format).await?;

    match cli.command {
        Commands::Register { photo_url } => commands::register(&app, photo_url).await,
        Commands::Login { provider, redirect } => {
            commands::login(&app, provider, redirect.as_deref()).await
        }
        Commands::Logout => commands::logout(&app).await,
        Commands::Status => commands::status(&app).await,
        Commands::Groups { command } => match command {
            GroupCommands::List { args } => commands::groups_list(&app, args).await,
            GroupCommands::Show { id } => commands::groups_show(&app, &id).await,
            GroupCommands::Join { id } => commands::groups_join(&app, &id).await,
            GroupCommands::Leave { id } => commands::groups_leave(&app, &id).await,
            GroupCommands::Create { draft } => commands::groups_create(&app, draft).await,
            GroupCommands::Update { id, draft } => {
                commands::groups_update(&app, &id, draft).await
            }
            GroupCommands::Delete { id, yes } => commands::groups_delete(&app, &id, yes).await,
        },
        Commands::MyGroups => commands::my_groups(&app).await,
        Commands::Dashboard => commands::dashboard(&app).await,
        Commands::Theme { .. } => Ok(()),
    }
}

/// Page and session failures have already been shown as notices.
fn already_reported(error: &anyhow::Error) -> bool {
    match error.downcast_ref::<PageError>() {
        Some(PageError::SignInRequired { .. }) => false,
        Some(_) => true,
        None => error.downcast_ref::<SessionError>().is_some(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let format = cli.format;

    if let Err(e) = run(cli).await {
        if !already_reported(&e) {
            let message = match e.downcast_ref::<PageError>() {
                Some(PageError::SignInRequired { .. }) => {
                    "You need to log in first. Run 'hobbyhub login'.".to_string()
                }
                _ => format!("{:#}", e),
            };
            output::print_error(&message, format);
        }
        std::process::exit(1);
    }
}
