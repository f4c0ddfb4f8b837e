// ABOUTME: Command-line entry point for the Wildvogelhilfe client
// ABOUTME: Lists, searches and exports stations and drives the region backfill job

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use wildvogelhilfe_client::backfill::PollerState;
use wildvogelhilfe_client::context::AppContext;
use wildvogelhilfe_client::geo::LatLng;
use wildvogelhilfe_client::geolocation::LocationFix;
use wildvogelhilfe_client::map::HeadlessMap;
use wildvogelhilfe_client::search::{entry_label, SearchMode};
use wildvogelhilfe_client::widget::{self, WidgetConfig};
use wildvogelhilfe_client::{logging, ClientConfig, RemoteClient};

type CliContext = AppContext<RemoteClient, RemoteClient, HeadlessMap>;

#[derive(Parser)]
#[command(name = "wvh-client")]
#[command(version, about = "Client for the Wildvogelhilfe station map and backfill job", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides the config file)
    #[arg(long, env = "WVH_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Debug logging for this client
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load all stations and list them
    Stations,
    /// Search stations by name, address or postal code prefix
    Search {
        query: String,
        /// Incremental search: highlight only, keep the viewport
        #[arg(long)]
        live: bool,
    },
    /// List the stations closest to a location
    Nearest {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Accuracy of the fix in metres
        #[arg(long, default_value_t = 0.0)]
        accuracy: f64,
    },
    /// Write the station snapshot as pretty JSON
    Export {
        /// Output file (default: wildvogelhilfen-<date>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the iframe snippet for embedding the map
    Widget {
        #[arg(long, default_value = "800")]
        width: String,
        #[arg(long, default_value = "600")]
        height: String,
        /// Hide the search box in the embedded map
        #[arg(long)]
        no_search: bool,
        /// Origin the map is served from (default: the backend base URL)
        #[arg(long)]
        origin: Option<String>,
        /// Path of the map page on that origin
        #[arg(long, default_value = "/")]
        path: String,
    },
    /// Region backfill job control
    Backfill {
        #[command(subcommand)]
        action: BackfillCommand,
    },
}

#[derive(Subcommand)]
enum BackfillCommand {
    /// Show the current job status once
    Status,
    /// Start the job and follow its progress
    Start,
    /// Abort the running job
    Abort,
    /// Follow the running job until it finishes
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = ClientConfig::resolve(cli.config.as_deref(), cli.base_url.clone())
        .context("Failed to load configuration")?;
    info!("Using backend {}", config.base_url);

    match cli.command {
        Commands::Widget {
            width,
            height,
            no_search,
            origin,
            path,
        } => {
            let widget = WidgetConfig {
                width,
                height,
                include_search: !no_search,
            };
            let origin =
                origin.unwrap_or_else(|| config.base_url.trim_end_matches('/').to_string());
            println!("{}", widget.embed_code(&widget::base_url(&origin, &path)));
            Ok(())
        }
        Commands::Backfill { action } => {
            let mut ctx = build_context(config)?;
            run_backfill(&mut ctx, action).await
        }
        command => {
            let mut ctx = build_context(config)?;
            ctx.refresh()
                .await
                .context("Failed to load station data")?;
            run_station_command(&mut ctx, command)
        }
    }
}

fn build_context(config: ClientConfig) -> Result<CliContext> {
    let client = RemoteClient::new(&config).context("Failed to create HTTP client")?;
    Ok(AppContext::new(config, client.clone(), client, HeadlessMap::new()))
}

fn run_station_command(ctx: &mut CliContext, command: Commands) -> Result<()> {
    match command {
        Commands::Stations => {
            for station in ctx.stations() {
                let marker = if station.is_mapped() { " " } else { "?" };
                println!("{} {} [{}]", marker, entry_label(station), station.status.as_str());
            }
            println!("{}", ctx.stats());
        }
        Commands::Search { query, live } => {
            let mode = if live {
                SearchMode::Live
            } else {
                SearchMode::Explicit
            };
            let outcome = ctx.search(&query, mode);
            for line in ctx.search_index().render_lines(ctx.stations()) {
                println!("{}", line);
            }
            println!("{} matches, {} mappable", outcome.total, outcome.focus.len());
        }
        Commands::Nearest { lat, lng, accuracy } => {
            let fix = LocationFix {
                position: LatLng::new(lat, lng),
                accuracy_m: accuracy,
            };
            match ctx.on_location_found(fix) {
                Some(panel) => {
                    println!("Accuracy: {}m", panel.accuracy_m);
                    for (i, entry) in panel.entries.iter().enumerate() {
                        println!(
                            "{}. {} ({}) {}",
                            i + 1,
                            entry.name,
                            entry.distance_label(),
                            entry.address
                        );
                    }
                }
                None => println!("No stations with coordinates available"),
            }
        }
        Commands::Export { output } => {
            let export = ctx.export().context("Failed to serialise stations")?;
            let path = output.unwrap_or_else(|| PathBuf::from(&export.filename));
            std::fs::write(&path, export.body)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {} ({})", path.display(), ctx.stats());
        }
        Commands::Widget { .. } | Commands::Backfill { .. } => {}
    }
    Ok(())
}

async fn run_backfill(ctx: &mut CliContext, action: BackfillCommand) -> Result<()> {
    match action {
        BackfillCommand::Status => {
            let state = ctx
                .check_backfill()
                .await
                .with_context(|| ctx.poller().view().label.clone())?;
            print_view(ctx, state);
        }
        BackfillCommand::Start => {
            let state = ctx
                .start_backfill()
                .await
                .with_context(|| ctx.poller().view().label.clone())?;
            println!("{}", ctx.poller().view().label);
            if state.is_polling() {
                watch(ctx).await?;
            }
        }
        BackfillCommand::Abort => {
            ctx.check_backfill()
                .await
                .with_context(|| ctx.poller().view().label.clone())?;
            let state = ctx
                .abort_backfill()
                .await
                .with_context(|| format!("Abort failed: {}", ctx.poller().view().label))?;
            println!("{}", ctx.poller().view().label);
            if state.is_polling() {
                watch(ctx).await?;
            }
        }
        BackfillCommand::Watch => {
            let state = ctx
                .check_backfill()
                .await
                .with_context(|| ctx.poller().view().label.clone())?;
            if state.is_polling() {
                watch(ctx).await?;
            } else {
                print_view(ctx, state);
            }
        }
    }
    Ok(())
}

async fn watch(ctx: &mut CliContext) -> Result<()> {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos:>3}% {msg}")?
            .progress_chars("#>-"),
    );

    let state = ctx
        .follow_backfill(|_, view| {
            bar.set_position(view.percent.round() as u64);
            bar.set_message(view.label.clone());
        })
        .await;

    let label = ctx.poller().view().label.clone();
    if state.is_terminal() {
        bar.finish_with_message(label);
    } else {
        bar.abandon_with_message(label);
    }
    print_view(ctx, state);
    Ok(())
}

fn print_view(ctx: &CliContext, state: PollerState) {
    let view = ctx.poller().view();
    println!("{:?}: {}", state, view.label);
    if let Some(report) = &view.report {
        println!("{}", report);
    }
}
