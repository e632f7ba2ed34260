pub(crate) mod airport;
pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod http;
pub(crate) mod metar;
pub(crate) mod report;
pub(crate) mod util;

use std::path::{Path, PathBuf};

use airport::{Airport, fetch_airport, load_airport_file};
use clap::Parser;
use error::ApplicationResult;
use metar::{DecodedMetar, fetch_decoded_metar};
use reqwest::Client;
use report::{InfoReport, airport_not_found, generated_at};
use runway_wind::resolve;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::BotConfig;

#[derive(clap::Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[clap(long, short)]
    /// Resets the config file (but keeps the API tokens)
    clean_config: bool,
    #[clap(long)]
    /// Log as JSON lines on stderr
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Weather and runway wind information for an airport
    Info(InfoArgs),
    /// Prints where the config lives and what is in effect
    Config,
}

#[derive(clap::Args, Debug)]
struct InfoArgs {
    /// ICAO code of the airport, e.g. EPKK
    icao: String,
    #[clap(long)]
    /// Raw METAR to use instead of asking CheckWX
    metar: Option<String>,
    #[clap(long)]
    /// AirportDB style JSON file to use instead of asking AirportDB
    airport_file: Option<PathBuf>,
    #[clap(long)]
    /// Print the runway classifications as JSON
    json: bool,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn load_metar(
    client: &Client,
    config: &BotConfig,
    icao: &str,
    raw: Option<&str>,
) -> ApplicationResult<Option<DecodedMetar>> {
    match raw {
        Some(raw) => Ok(Some(DecodedMetar::from_raw(raw))),
        None => fetch_decoded_metar(client, config, icao).await,
    }
}

async fn load_airport(
    client: &Client,
    config: &BotConfig,
    icao: &str,
    path: Option<&Path>,
) -> ApplicationResult<Option<Airport>> {
    match path {
        Some(path) => load_airport_file(path),
        None => fetch_airport(client, config, icao).await,
    }
}

async fn info(config: &BotConfig, args: InfoArgs) -> ApplicationResult<()> {
    let icao = args.icao.trim().to_uppercase();
    let client = http::build_client(config)?;

    let (metar, airport) = futures::try_join!(
        load_metar(&client, config, &icao, args.metar.as_deref()),
        load_airport(&client, config, &icao, args.airport_file.as_deref()),
    )?;

    let (Some(metar), Some(airport)) = (metar, airport) else {
        warn!(icao, "No airport or no METAR");
        println!("{}", airport_not_found(&icao));
        return Ok(());
    };

    let wind = metar.wind_observation(config.speed_basis())?;
    let strips = airport.strips();
    let resolution = resolve(wind.as_ref(), Some(strips.as_slice()))?;
    if let Some(resolution) = &resolution {
        debug!(icao, runways = resolution.classifications.len(), "Resolved runway winds");
        for skipped in &resolution.skipped {
            info!(icao, runway = %skipped.identifier, reason = ?skipped.reason, "Runway end skipped");
        }
    }

    let report = InfoReport {
        icao: &icao,
        airport: &airport,
        metar: &metar,
        resolution: resolution.as_ref(),
        thresholds: config.safety(),
        generated: generated_at(config.timezone())?,
    };
    if args.json {
        println!("{}", report.render_json()?);
    } else {
        println!("{}", report.render_text());
    }
    Ok(())
}

async fn run(cli: Cli) -> ApplicationResult<()> {
    let config = BotConfig::load(cli.clean_config)?;
    match cli.command {
        Command::Info(args) => info(&config, args).await,
        Command::Config => {
            println!("{}", config.config_file_path().display());
            println!("{}", config.describe()?);
            Ok(())
        }
    }
}

fn main() -> ApplicationResult<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))?;
    Ok(())
}
