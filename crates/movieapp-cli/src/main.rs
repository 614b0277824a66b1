//! movieapp - browse, search and favorite movies from TMDB.

/// Application configuration (TOML).
mod config;
/// Terminal rendering of movie records.
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::sync::mpsc;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::AppConfig;
use crate::output::{MOVIE_HEADER, movie_row, overview_lines};
use movieapp_api::tmdb::{MovieApi, MovieCategory, MoviePage, SearchMovieParams, TmdbClient};
use movieapp_core::{
    FavoritesAggregator, FavoritesStore, RuntimeCache, SearchDebouncer, SearchPhase, SearchState,
    fetch_movie_overview,
};
use movieapp_db::{AppDirs, SqlitePreferenceStore};

/// Line that triggers an immediate search in interactive mode.
const SUBMIT_COMMAND: &str = ":go";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
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
    /// List movies of a category.
    Movies(MoviesArgs),
    /// Search movies by title.
    Search(SearchArgs),
    /// Show details, trailers and cast of a movie.
    Details(DetailsArgs),
    /// Manage favorite movies.
    Favorites(FavoritesCommand),
    /// Manage the config file.
    Config(ConfigCommand),
}

/// Listing categories.
#[derive(Clone, Copy, ValueEnum)]
enum Category {
    /// Popular right now.
    Popular,
    /// Highest rated of all time.
    TopRated,
    /// In theaters.
    NowPlaying,
    /// Coming soon.
    Upcoming,
}

impl From<Category> for MovieCategory {
    fn from(category: Category) -> Self {
        match category {
            Category::Popular => Self::Popular,
            Category::TopRated => Self::TopRated,
            Category::NowPlaying => Self::NowPlaying,
            Category::Upcoming => Self::Upcoming,
        }
    }
}

/// Arguments for the `movies` subcommand.
#[derive(clap::Args)]
struct MoviesArgs {
    /// Listing to fetch.
    #[arg(value_enum)]
    category: Category,
    /// Page number (1-based).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,
    /// Look up missing runtimes (one detail request per movie, cached).
    #[arg(long)]
    with_runtime: bool,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "the matrix").
    #[arg(long, required_unless_present = "interactive", conflicts_with = "interactive")]
    query: Option<String>,
    /// Page number (1-based).
    #[arg(
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..),
        conflicts_with = "interactive"
    )]
    page: u32,
    /// Read queries line by line from stdin as you type; `:go` searches immediately.
    #[arg(long)]
    interactive: bool,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: u64,
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
    /// List favorites with their current details.
    List,
    /// Add a movie to favorites, or remove it if already there.
    Toggle(FavoriteIdArgs),
    /// Tell whether a movie is a favorite.
    Check(FavoriteIdArgs),
}

/// Movie ID argument of favorites subcommands.
#[derive(clap::Args)]
struct FavoriteIdArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: u64,
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
    /// Print the effective configuration.
    Show,
    /// Write a config file with default values.
    Init,
}

/// Loads the config file of `dirs`.
fn load_config(dirs: &AppDirs) -> Result<AppConfig> {
    AppConfig::load(&dirs.config_file()).context("failed to load config")
}

/// Builds a `TmdbClient` from config and the `TMDB_API_KEY` environment variable.
///
/// # Errors
///
/// Returns an error if the API key is missing, the base URL override is
/// invalid, or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let api_key =
        std::env::var("TMDB_API_KEY").context("TMDB_API_KEY environment variable is required")?;

    let mut builder = TmdbClient::builder()
        .api_key(api_key)
        .timeout(config.timeout())
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
    if let Some(base_url) = config.api.base_url.as_deref() {
        let url = Url::parse(base_url)
            .with_context(|| format!("invalid api.base_url in config: {base_url}"))?;
        builder = builder.base_url(url);
    }
    builder.build().context("failed to build TMDB client")
}

/// Opens the favorites store backed by the local database.
fn open_favorites(dirs: &AppDirs) -> Result<FavoritesStore<SqlitePreferenceStore>> {
    let storage = SqlitePreferenceStore::open(dirs).context("failed to open database")?;
    FavoritesStore::open(storage).context("failed to load favorites")
}

/// Logs a page of movies as a table.
fn log_page(page: &MoviePage) {
    tracing::info!("{MOVIE_HEADER}");
    for movie in &page.results {
        tracing::info!("{}", movie_row(movie));
    }
    tracing::info!(
        "Page {} of {} ({} results)",
        page.page,
        page.total_pages,
        page.total_results
    );
}

/// Runs the `movies` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_movies(args: &MoviesArgs, dirs: &AppDirs) -> Result<()> {
    let config = load_config(dirs)?;
    let client = Arc::new(build_tmdb_client(&config)?);
    let category = MovieCategory::from(args.category);

    let mut page = client
        .movie_list(category, args.page)
        .await
        .with_context(|| format!("TMDB {} request failed", category.path()))?;

    if args.with_runtime {
        let cache = RuntimeCache::new(Arc::clone(&client), config.runtime_ttl());
        cache.backfill(&mut page.results).await;
    }

    log_page(&page);
    Ok(())
}

/// Runs the `search --query` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_search(query: &str, page: u32, dirs: &AppDirs) -> Result<()> {
    let config = load_config(dirs)?;
    let client = build_tmdb_client(&config)?;

    let params = SearchMovieParams::new(query.trim()).page(page);
    let response = client
        .search_movies(&params)
        .await
        .context("TMDB search/movie request failed")?;

    if response.results.is_empty() {
        tracing::info!("No movies found for '{}'", params.query);
        return Ok(());
    }
    log_page(&response);
    Ok(())
}

/// Runs the `search --interactive` subcommand.
///
/// Every stdin line replaces the current search text; searches fire after
/// the configured debounce delay. Ends at EOF once the last search settled.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build.
#[instrument(skip_all)]
async fn run_interactive_search(dirs: &AppDirs) -> Result<()> {
    let config = load_config(dirs)?;
    let client = Arc::new(build_tmdb_client(&config)?);
    let debouncer = SearchDebouncer::with_delay(client, config.debounce());
    let mut updates = debouncer.subscribe();

    let (tx, mut lines) = mpsc::channel::<String>(16);
    let reader = tokio::task::spawn_blocking(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    tracing::info!("Type to search, `{SUBMIT_COMMAND}` to search now, Ctrl-D to quit.");
    let mut last_phase = SearchPhase::Idle;
    loop {
        tokio::select! {
            line = lines.recv() => match line {
                Some(line) if line.trim() == SUBMIT_COMMAND => debouncer.submit(),
                Some(line) => debouncer.on_query_changed(&line),
                None => break,
            },
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                report_search_state(&state, &last_phase);
                last_phase = state.phase;
            }
        }
    }

    // Let a search started before EOF settle.
    loop {
        let state = updates.borrow_and_update().clone();
        if state.phase != last_phase {
            report_search_state(&state, &last_phase);
            last_phase = state.phase;
        }
        if last_phase == SearchPhase::Idle || updates.changed().await.is_err() {
            break;
        }
    }
    debouncer.shutdown();
    reader.await.context("stdin reader task failed")?;
    Ok(())
}

/// Logs the transitions of interest to the user.
fn report_search_state(state: &SearchState, previous: &SearchPhase) {
    match &state.phase {
        SearchPhase::InFlight { query } => tracing::info!("Searching for '{query}'..."),
        SearchPhase::Pending { query } => tracing::debug!(%query, "search pending"),
        SearchPhase::Idle => {
            if *previous == SearchPhase::Idle || !state.has_searched {
                return;
            }
            if let Some(message) = state.error_message() {
                tracing::warn!("{message}");
            } else if state.is_empty_result() {
                tracing::info!("No movies found for '{}'", state.query.trim());
            } else {
                tracing::info!("{MOVIE_HEADER}");
                for movie in &state.results {
                    tracing::info!("{}", movie_row(movie));
                }
            }
        }
    }
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build, the favorites store
/// cannot be opened, or any of the requests fails.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, dirs: &AppDirs) -> Result<()> {
    let config = load_config(dirs)?;
    let client = build_tmdb_client(&config)?;
    let favorites = open_favorites(dirs)?;

    let overview = fetch_movie_overview(&client, args.id)
        .await
        .with_context(|| format!("failed to load movie {}", args.id))?;

    for line in overview_lines(&overview, favorites.is_favorite(args.id)) {
        tracing::info!("{line}");
    }
    Ok(())
}

/// Runs the `favorites list` subcommand.
///
/// # Errors
///
/// Returns an error if the favorites store cannot be opened or any detail
/// request fails.
#[instrument(skip_all)]
async fn run_favorites_list(dirs: &AppDirs) -> Result<()> {
    let favorites = open_favorites(dirs)?;
    let snapshot = favorites.snapshot();
    if snapshot.is_empty() {
        tracing::info!("No favorites yet. Add one with `favorites toggle --id <ID>`.");
        return Ok(());
    }

    let config = load_config(dirs)?;
    let aggregator = FavoritesAggregator::new(Arc::new(build_tmdb_client(&config)?));
    let movies = aggregator
        .resolve(&snapshot)
        .await
        .context("failed to load favorites")?;

    tracing::info!("{MOVIE_HEADER}");
    for movie in &movies {
        tracing::info!("{}", movie_row(movie));
    }
    tracing::info!("Total: {} favorites", movies.len());
    Ok(())
}

/// Runs the `favorites toggle` subcommand.
///
/// # Errors
///
/// Returns an error if the favorites store cannot be opened or written.
#[instrument(skip_all)]
fn run_favorites_toggle(args: &FavoriteIdArgs, dirs: &AppDirs) -> Result<()> {
    let favorites = open_favorites(dirs)?;
    if favorites.toggle(args.id)? {
        tracing::info!("Movie {} added to favorites", args.id);
    } else {
        tracing::info!("Movie {} removed from favorites", args.id);
    }
    Ok(())
}

/// Runs the `favorites check` subcommand.
///
/// # Errors
///
/// Returns an error if the favorites store cannot be opened.
#[instrument(skip_all)]
fn run_favorites_check(args: &FavoriteIdArgs, dirs: &AppDirs) -> Result<()> {
    let favorites = open_favorites(dirs)?;
    if favorites.is_favorite(args.id) {
        tracing::info!("Movie {} is a favorite", args.id);
    } else {
        tracing::info!("Movie {} is not a favorite", args.id);
    }
    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or rendered.
#[instrument(skip_all)]
fn run_config_show(dirs: &AppDirs) -> Result<()> {
    let config_path = dirs.config_file();
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    tracing::info!("# {}", config_path.display());
    for line in config.to_toml()?.lines() {
        tracing::info!("{line}");
    }
    Ok(())
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the config file cannot be written.
#[instrument(skip_all)]
fn run_config_init(dirs: &AppDirs) -> Result<()> {
    let config_path = dirs.config_file();
    if config_path.exists() {
        tracing::info!("Config already exists at {}", config_path.display());
        return Ok(());
    }
    AppConfig::default()
        .save(&config_path)
        .context("failed to save config")?;
    tracing::info!("Wrote default config to {}", config_path.display());
    Ok(())
}

/// Installs the global tracing subscriber.
///
/// With the `otel` feature, spans are also exported over OTLP/HTTP when
/// `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
fn init_tracing() {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

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
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let dirs =
        AppDirs::resolve(cli.dir.as_deref()).context("failed to resolve app directories")?;
    match cli.command {
        Commands::Movies(args) => run_movies(&args, &dirs).await,
        Commands::Search(args) => match args.query.as_deref() {
            Some(query) => run_search(query, args.page, &dirs).await,
            None => run_interactive_search(&dirs).await,
        },
        Commands::Details(args) => run_details(&args, &dirs).await,
        Commands::Favorites(cmd) => match cmd.command {
            FavoritesSubcommands::List => run_favorites_list(&dirs).await,
            FavoritesSubcommands::Toggle(args) => run_favorites_toggle(&args, &dirs),
            FavoritesSubcommands::Check(args) => run_favorites_check(&args, &dirs),
        },
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Show => run_config_show(&dirs),
            ConfigSubcommands::Init => run_config_init(&dirs),
        },
    }
}
