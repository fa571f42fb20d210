use std::fmt;
use std::time::Duration;

use crate::app::StartupError;
use crate::catalog::{import_catalog, CatalogError, HeartRailsClient};
use crate::config::{AppConfig, ConfigError};
use crate::db::connection::{init_db, Database};
use crate::errors::ServerError;
use crate::server;
use crate::services::stations::refresh_from_catalog;
use crate::telemetry::{self, TelemetryError};
use clap::{Args, Parser, Subcommand};

const IMPORT_PAUSE: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(
    name = "couple-map",
    about = "Shared apartment-hunting map for couples",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server (default command)
    Serve(ServeArgs),
    /// Replace the station catalog with a prefecture's lines and stations, then move
    /// stations with a catalog name onto the catalog position
    ImportStations(ImportArgs),
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Prefecture whose railway lines are imported
    #[arg(long, default_value = "東京都")]
    pub prefecture: String,
}

#[derive(Debug)]
pub enum RunError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Database(ServerError),
    Startup(StartupError),
    Catalog(CatalogError),
    Server(std::io::Error),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Config(e) => write!(f, "configuration error: {e}"),
            RunError::Telemetry(e) => write!(f, "{e}"),
            RunError::Database(e) => write!(f, "database error: {e}"),
            RunError::Startup(e) => write!(f, "startup failed: {e}"),
            RunError::Catalog(e) => write!(f, "station import failed: {e}"),
            RunError::Server(e) => write!(f, "server ended with error: {e}"),
        }
    }
}

impl std::error::Error for RunError {}

pub fn run() -> Result<(), RunError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    let config = AppConfig::load().map_err(RunError::Config)?;
    telemetry::init(&config.telemetry).map_err(RunError::Telemetry)?;

    let db = Database::new(config.database.path.clone());
    init_db(&db, &config.database.schema_path).map_err(RunError::Database)?;

    match command {
        Command::Serve(args) => server::run(config, db, args),
        Command::ImportStations(args) => import_stations(&config, &db, &args),
    }
}

fn import_stations(config: &AppConfig, db: &Database, args: &ImportArgs) -> Result<(), RunError> {
    let source = HeartRailsClient::new(config.catalog_url.clone(), config.geocoder.timeout)
        .map_err(RunError::Catalog)?;
    let summary =
        import_catalog(db, &source, &args.prefecture, IMPORT_PAUSE).map_err(RunError::Catalog)?;

    tracing::info!(
        prefecture = %args.prefecture,
        lines = summary.lines,
        stations = summary.stations,
        skipped = summary.skipped_lines.len(),
        "station catalog imported"
    );
    for line in &summary.skipped_lines {
        tracing::warn!(line = %line, "line was skipped");
    }

    let moved = refresh_from_catalog(db, &config.station_suffix).map_err(RunError::Database)?;
    tracing::info!(moved, "stations aligned with the catalog");
    Ok(())
}
