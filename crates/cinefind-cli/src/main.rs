//! cinefind - OMDb movie search with a local favorites list.

/// Application configuration (TOML).
mod config;
/// Config and data directory layout.
mod paths;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{API_KEY_ENV, AppConfig};
use crate::paths::AppDirs;
use cinefind_api::omdb::{
    DetailsResult, LocalOmdbApi, MovieDetails, MovieSummary, OmdbClient, OmdbResponse,
    SearchParams,
};
use cinefind_store::{FavoritesStore, SqliteKvStore};
use cinefind_tui::state::{AppState, DETAILS_FAILED_MESSAGE};
use cinefind_tui::{detail_fields, run_browser};

/// CLI argument parser.
#[derive(Parser)]
#[command(name = "cinefind", about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Search movies by title keywords.
    Search(SearchArgs),
    /// Show full details for an IMDb ID.
    Details(DetailsArgs),
    /// Show full details for an exact title.
    Title(TitleArgs),
    /// Manage the local favorites list.
    Favorites(FavoritesCommand),
    /// Browse search results and favorites interactively.
    Tui,
    /// Generate shell completion scripts.
    Completions(CompletionsArgs),
    /// Edit the configuration file.
    Config(ConfigCommand),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query.
    #[arg(long, value_parser = non_blank)]
    query: String,

    /// Result page (10 results per page).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// IMDb ID (e.g. tt0133093).
    #[arg(long, value_parser = non_blank)]
    id: String,
}

/// Arguments for the `title` subcommand.
#[derive(clap::Args)]
struct TitleArgs {
    /// Exact title.
    #[arg(long, value_parser = non_blank)]
    title: String,

    /// Release year.
    #[arg(long)]
    year: Option<String>,
}

/// Arguments for the `favorites` subcommand.
#[derive(clap::Args)]
struct FavoritesCommand {
    /// Favorites subcommand to run.
    #[command(subcommand)]
    command: FavoritesSubcommands,
}

/// Available favorites subcommands.
#[derive(Subcommand)]
enum FavoritesSubcommands {
    /// List favorites in the order they were added.
    List,
    /// Add a movie by IMDb ID.
    Add(FavoriteIdArgs),
    /// Remove a movie by IMDb ID.
    Remove(FavoriteIdArgs),
    /// Add the movie if missing, remove it otherwise.
    Toggle(FavoriteIdArgs),
}

/// IMDb ID argument for favorites subcommands.
#[derive(clap::Args)]
struct FavoriteIdArgs {
    /// IMDb ID (e.g. tt0133093).
    #[arg(long, value_parser = non_blank)]
    id: String,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    shell: Shell,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Store the OMDb API key in the config file.
    SetKey(SetKeyArgs),
}

/// Arguments for the `config set-key` subcommand.
#[derive(clap::Args)]
struct SetKeyArgs {
    /// OMDb API key.
    #[arg(value_parser = non_blank)]
    key: String,
}

/// Rejects blank values and trims surrounding whitespace.
fn non_blank(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(String::from("must not be blank"));
    }
    Ok(String::from(trimmed))
}

/// Builds an `OmdbClient` from the config file and `OMDB_API_KEY`.
///
/// # Errors
///
/// Returns an error if no API key is configured, the base URL is invalid,
/// or the client fails to build.
#[instrument(skip_all)]
fn build_omdb_client(dirs: &AppDirs) -> Result<OmdbClient> {
    let config = AppConfig::load(&dirs.config_file())?;

    let api_key = config
        .api_key(std::env::var(API_KEY_ENV).ok())
        .with_context(|| {
            format!(
                "OMDb API key is not configured; set {API_KEY_ENV} or run `cinefind config set-key`"
            )
        })?;

    let mut builder = OmdbClient::builder().api_key(api_key).user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(base_url) = &config.omdb.base_url {
        let url =
            Url::parse(base_url).with_context(|| format!("invalid OMDb base URL: {base_url}"))?;
        builder = builder.base_url(url);
    }

    builder.build().context("failed to build OMDb client")
}

/// Opens the favorites list stored in the data directory.
fn load_favorites(dirs: &AppDirs) -> Result<FavoritesStore<SqliteKvStore>> {
    let backend = SqliteKvStore::open(dirs.data_dir()).with_context(|| {
        format!("failed to open favorites database {}", dirs.db_file().display())
    })?;
    Ok(FavoritesStore::load(backend))
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the request fails or OMDb reports no results.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dirs: &AppDirs) -> Result<()> {
    let client = build_omdb_client(dirs)?;
    let favorites = load_favorites(dirs)?;

    let params = SearchParams::new(args.query.as_str()).page(args.page);
    let result = client
        .search_movies(&params)
        .await
        .context("OMDb search request failed")?;

    let page = match result {
        OmdbResponse::Success(page) => page,
        OmdbResponse::Failure { error } => {
            bail!(error.unwrap_or_else(|| format!("No movies found for \"{}\"", args.query)))
        }
    };

    tracing::info!(
        "Found {} results for \"{}\" (page {} / {})",
        page.total_results_count(),
        args.query,
        args.page,
        page.total_pages()
    );
    tracing::info!("Fav\tIMDb ID\t\tYear\tType\tTitle");
    for movie in &page.movies {
        let marker = if favorites.contains(&movie.imdb_id) {
            "\u{2665}"
        } else {
            ""
        };
        tracing::info!(
            "{marker}\t{}\t{}\t{}\t{}",
            movie.imdb_id,
            movie.year,
            movie.media_type,
            movie.title
        );
    }

    Ok(())
}

/// Unwraps a details answer, turning a vendor failure into an error.
fn expect_details(result: DetailsResult) -> Result<MovieDetails> {
    match result {
        OmdbResponse::Success(details) => Ok(details),
        OmdbResponse::Failure { error } => {
            bail!(error.unwrap_or_else(|| String::from(DETAILS_FAILED_MESSAGE)))
        }
    }
}

/// Logs every available detail field.
fn log_details(details: &MovieDetails) {
    tracing::info!("{} ({})  {}", details.title, details.year, details.imdb_id);
    for (label, value) in detail_fields(details) {
        tracing::info!("{label}: {value}");
    }
    tracing::info!("{}", details.summary().imdb_url());
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the request fails or OMDb reports an error.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, dirs: &AppDirs) -> Result<()> {
    let client = build_omdb_client(dirs)?;
    let result = client
        .movie_details(&args.id)
        .await
        .context("OMDb details request failed")?;

    log_details(&expect_details(result)?);
    Ok(())
}

/// Runs the `title` subcommand.
///
/// # Errors
///
/// Returns an error if the request fails or OMDb reports an error.
#[instrument(skip_all)]
async fn run_title(args: &TitleArgs, dirs: &AppDirs) -> Result<()> {
    let client = build_omdb_client(dirs)?;
    let result = client
        .search_by_title(&args.title, args.year.as_deref())
        .await
        .context("OMDb title request failed")?;

    log_details(&expect_details(result)?);
    Ok(())
}

/// Fetches the summary record for an IMDb ID.
async fn fetch_summary(id: &str, dirs: &AppDirs) -> Result<MovieSummary> {
    let client = build_omdb_client(dirs)?;
    let result = client
        .movie_details(id)
        .await
        .context("OMDb details request failed")?;
    Ok(expect_details(result)?.summary())
}

/// Runs the `favorites list` subcommand.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
fn run_favorites_list(dirs: &AppDirs) -> Result<()> {
    let favorites = load_favorites(dirs)?;

    if favorites.is_empty() {
        tracing::info!("No favorites yet");
        return Ok(());
    }

    tracing::info!("Favorites: {}", favorites.len());
    tracing::info!("IMDb ID\t\tYear\tType\tTitle");
    for movie in favorites.list() {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            movie.imdb_id,
            movie.year,
            movie.media_type,
            movie.title
        );
    }
    Ok(())
}

/// Runs the `favorites add` subcommand.
///
/// # Errors
///
/// Returns an error if the lookup fails or the list cannot be saved.
#[instrument(skip_all)]
async fn run_favorites_add(args: &FavoriteIdArgs, dirs: &AppDirs) -> Result<()> {
    let mut favorites = load_favorites(dirs)?;
    if favorites.contains(&args.id) {
        tracing::info!("{} is already a favorite", args.id);
        return Ok(());
    }

    let movie = fetch_summary(&args.id, dirs).await?;
    let label = format!("{} ({})", movie.title, movie.year);
    favorites.add(movie)?;
    tracing::info!("Added {label} to favorites ({} total)", favorites.len());
    Ok(())
}

/// Runs the `favorites remove` subcommand.
///
/// # Errors
///
/// Returns an error if the list cannot be saved.
fn run_favorites_remove(args: &FavoriteIdArgs, dirs: &AppDirs) -> Result<()> {
    let mut favorites = load_favorites(dirs)?;
    if favorites.remove(&args.id)? {
        tracing::info!("Removed {} from favorites ({} total)", args.id, favorites.len());
    } else {
        tracing::info!("{} is not a favorite", args.id);
    }
    Ok(())
}

/// Runs the `favorites toggle` subcommand.
///
/// # Errors
///
/// Returns an error if the lookup fails or the list cannot be saved.
async fn run_favorites_toggle(args: &FavoriteIdArgs, dirs: &AppDirs) -> Result<()> {
    let is_favorite = load_favorites(dirs)?.contains(&args.id);
    if is_favorite {
        run_favorites_remove(args, dirs)
    } else {
        run_favorites_add(args, dirs).await
    }
}

/// Runs the interactive browser.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the TUI fails.
async fn run_tui(dirs: &AppDirs) -> Result<()> {
    let client = build_omdb_client(dirs)?;
    let mut state = AppState::new(load_favorites(dirs)?);
    run_browser(&client, &mut state).await
}

/// Runs the `config set-key` subcommand.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or written.
fn run_config_set_key(args: &SetKeyArgs, dirs: &AppDirs) -> Result<()> {
    let config_path = dirs.config_file();
    let mut config = AppConfig::load(&config_path)?;
    config.omdb.api_key = Some(args.key.clone());
    config.save(&config_path)?;

    tracing::info!("API key saved to {}", config_path.display());
    Ok(())
}

/// Picks where log output goes: the data directory's log file in TUI mode, stdout otherwise.
///
/// Returns the writer and whether ANSI colours should be used.
fn log_writer(command: &Commands, dirs: &AppDirs) -> Result<(BoxMakeWriter, bool)> {
    if !matches!(command, Commands::Tui) {
        return Ok((BoxMakeWriter::new(std::io::stdout), true));
    }

    std::fs::create_dir_all(dirs.data_dir()).with_context(|| {
        format!("failed to create data directory {}", dirs.data_dir().display())
    })?;
    let log_path = dirs.log_file();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    Ok((BoxMakeWriter::new(Mutex::new(file)), false))
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dirs = AppDirs::resolve(cli.dir.as_deref())?;
    let (writer, ansi) = log_writer(&cli.command, &dirs)?;

    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let dirs = &dirs;
    match &cli.command {
        Commands::Search(args) => run_search(args, dirs).await,
        Commands::Details(args) => run_details(args, dirs).await,
        Commands::Title(args) => run_title(args, dirs).await,
        Commands::Favorites(fav) => match &fav.command {
            FavoritesSubcommands::List => run_favorites_list(dirs),
            FavoritesSubcommands::Add(args) => run_favorites_add(args, dirs).await,
            FavoritesSubcommands::Remove(args) => run_favorites_remove(args, dirs),
            FavoritesSubcommands::Toggle(args) => run_favorites_toggle(args, dirs).await,
        },
        Commands::Tui => run_tui(dirs).await,
        Commands::Completions(args) => {
            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                "cinefind",
                &mut std::io::stdout(),
            );
            Ok(())
        }
        Commands::Config(cfg) => match &cfg.command {
            ConfigSubcommands::SetKey(args) => run_config_set_key(args, dirs),
        },
    }
}
