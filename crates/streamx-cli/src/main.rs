use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::eyre;
use commands::{browse, clear, config, library, profile, refresh};
use streamx_catalog::SortBy;
use streamx_config::PathManager;
use streamx_models::DownloadQuality;
use tracing::warn;

mod commands;
mod context;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "streamx")]
#[command(about = "StreamX - browse movies and keep your watchlist, downloads and progress")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Movies trending this week
    Trending {
        /// Sort order: popularity, rating, year or title
        #[arg(long, default_value = "popularity", value_parser = parse_sort)]
        sort: SortBy,
    },
    /// Popular movies in a category (genre)
    #[command(long_about = "Show popular movies in a category such as 'action', 'comedy' or 'scifi'. Unknown categories fall back to action.")]
    Category {
        name: String,

        /// Sort order: popularity, rating, year or title
        #[arg(long, default_value = "popularity", value_parser = parse_sort)]
        sort: SortBy,
    },
    /// Search movies by title
    Search {
        query: String,
    },
    /// Show details, trailer and similar titles for one movie
    Movie {
        id: u64,
    },
    /// Manage your watchlist
    Watchlist {
        #[command(subcommand)]
        cmd: Option<WatchlistCommands>,
    },
    /// Manage downloaded movies
    Downloads {
        #[command(subcommand)]
        cmd: Option<DownloadsCommands>,
    },
    /// Manage partially watched movies
    Continue {
        #[command(subcommand)]
        cmd: Option<ContinueCommands>,
    },
    /// Manage recently watched movies
    History {
        #[command(subcommand)]
        cmd: Option<HistoryCommands>,
    },
    /// Re-fetch catalog metadata for every stored movie
    #[command(long_about = "Fetch fresh catalog details for every movie in any collection and merge them into the stored entries. Progress, timestamps and download attributes are kept. Titles that fail to fetch are skipped.")]
    Refresh,
    /// Collection counts and settings summary
    Profile,
    /// Show or change playback settings
    Settings {
        #[command(subcommand)]
        cmd: Option<SettingsCommands>,
    },
    /// Sign out: wipe all stored collections and settings
    #[command(long_about = "Remove every stored collection and your settings. Use --credentials to also remove the stored catalog API key.")]
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,

        /// Also remove stored credentials
        #[arg(long, action = ArgAction::SetTrue)]
        credentials: bool,
    },
    /// Configure the catalog API key and settings
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum WatchlistCommands {
    /// List the watchlist
    List,
    /// Add a movie by catalog id
    Add { id: u64 },
    /// Remove a movie by catalog id
    Remove { id: u64 },
    /// Add the movie if missing, remove it otherwise
    Toggle { id: u64 },
}

#[derive(Subcommand)]
enum DownloadsCommands {
    /// List downloads
    List,
    /// Record a download by catalog id
    Add {
        id: u64,

        /// 480p, 720p, 1080p or 4K
        #[arg(long, default_value = "1080p", value_parser = parse_quality)]
        quality: DownloadQuality,

        /// Size label, defaults to the typical size for the quality
        #[arg(long)]
        size: Option<String>,
    },
    /// Remove a download by catalog id
    Remove { id: u64 },
}

#[derive(Subcommand)]
enum ContinueCommands {
    /// List partially watched movies
    List,
    /// Record playback progress (0-100)
    Progress { id: u64, percent: f64 },
    /// Remove a movie by catalog id
    Remove { id: u64 },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// List recently watched movies
    List,
    /// Mark a movie as watched now
    Add { id: u64 },
    /// Remove a movie by catalog id
    Remove { id: u64 },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show current settings
    Show,
    /// Change one or more settings
    Set {
        #[arg(long)]
        notifications: Option<bool>,

        #[arg(long)]
        autoplay: Option<bool>,

        #[arg(long)]
        language: Option<String>,

        #[arg(long)]
        quality: Option<String>,

        /// 0-100
        #[arg(long)]
        volume: Option<u8>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Store the catalog API key
    #[command(long_about = "Store the catalog (TMDB) API key in the credentials file. The STREAMX_API_KEY environment variable takes precedence over the stored key.")]
    ApiKey {
        /// API key (if not provided, will prompt)
        #[arg(long)]
        key: Option<String>,
    },
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

fn parse_sort(s: &str) -> Result<SortBy, String> {
    s.parse()
}

fn parse_quality(s: &str) -> Result<DownloadQuality, String> {
    s.parse()
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let paths = PathManager::default();
    let (config, config_error) = context::load_config(&paths);

    logging::init_logging(cli.verbose, cli.quiet, &config.logging)
        .map_err(|e| eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    let command = match cli.command {
        Commands::Config { cmd } => {
            if let Some(e) = &config_error {
                warn!("Ignoring unreadable config {}: {}", paths.config_file().display(), e);
                output.warn(format!(
                    "Could not read {}: {}. Using defaults.",
                    paths.config_file().display(),
                    e
                ));
            }
            let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
            return config::run_config(cmd, &paths, &config, &output);
        }
        command => command,
    };

    if let Some(e) = config_error {
        return Err(eyre!(
            "Failed to load config from {}: {}. Run 'streamx config init --force' to reset it.",
            paths.config_file().display(),
            e
        ));
    }
    let ctx = context::AppContext::open(paths, config)?;

    match command {
        Commands::Trending { sort } => browse::run_trending(&ctx, sort, &output).await,
        Commands::Category { name, sort } => browse::run_category(&ctx, &name, sort, &output).await,
        Commands::Search { query } => browse::run_search(&ctx, &query, &output).await,
        Commands::Movie { id } => browse::run_movie(&ctx, id, &output).await,
        Commands::Watchlist { cmd } => {
            library::run_watchlist(&ctx, cmd.unwrap_or(WatchlistCommands::List), &output).await
        }
        Commands::Downloads { cmd } => {
            library::run_downloads(&ctx, cmd.unwrap_or(DownloadsCommands::List), &output).await
        }
        Commands::Continue { cmd } => {
            library::run_continue(&ctx, cmd.unwrap_or(ContinueCommands::List), &output).await
        }
        Commands::History { cmd } => {
            library::run_history(&ctx, cmd.unwrap_or(HistoryCommands::List), &output).await
        }
        Commands::Refresh => refresh::run_refresh(&ctx, &output).await,
        Commands::Profile => profile::run_profile(&ctx, &output),
        Commands::Settings { cmd } => {
            profile::run_settings(&ctx, cmd.unwrap_or(SettingsCommands::Show), &output)
        }
        Commands::Clear { yes, credentials } => clear::run_clear(&ctx, yes, credentials, &output),
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
            config::run_config(cmd, &ctx.paths, &ctx.config, &output)
        }
    }
}
