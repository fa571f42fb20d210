// src/app.rs
use crate::config::AppConfig;
use crate::db::connection::Database;
use crate::domain::MatchPolicy;
use crate::geocoding::{GeocodeError, Geocoder, NominatimGeocoder};
use crate::isochrone::{
    IsochroneCache, IsochroneError, IsochronePolicy, IsochroneProvider, IsochroneService,
    OpenRouteServiceClient,
};

/// Everything a request handler needs, shared across server workers.
pub struct App {
    pub db: Database,
    pub geocoder: Box<dyn Geocoder>,
    pub isochrones: IsochroneService,
    pub match_policy: MatchPolicy,
    pub station_suffix: String,
    pub identity_header: String,
}

impl App {
    pub fn new(
        db: Database,
        geocoder: Box<dyn Geocoder>,
        isochrone_provider: Box<dyn IsochroneProvider>,
        isochrone_policy: IsochronePolicy,
        match_policy: MatchPolicy,
        station_suffix: String,
        identity_header: String,
    ) -> Self {
        let isochrones = IsochroneService::new(
            isochrone_provider,
            IsochroneCache::new(db.clone()),
            isochrone_policy,
        );
        Self {
            db,
            geocoder,
            isochrones,
            match_policy,
            station_suffix,
            identity_header,
        }
    }

    /// Wire the real HTTP providers from configuration.
    pub fn from_config(cfg: &AppConfig, db: Database) -> Result<Self, StartupError> {
        let geocoder = NominatimGeocoder::new(&cfg.geocoder).map_err(StartupError::Geocoder)?;
        let isochrone_client =
            OpenRouteServiceClient::new(&cfg.isochrone).map_err(StartupError::Isochrone)?;

        if cfg.isochrone.api_key.is_none() {
            tracing::warn!("ISOCHRONE_API_KEY is not set; walk-time overlays will be missing");
        }

        Ok(Self::new(
            db,
            Box::new(geocoder),
            Box::new(isochrone_client),
            cfg.isochrone_policy.clone(),
            cfg.match_policy,
            cfg.station_suffix.clone(),
            cfg.identity_header.clone(),
        ))
    }
}

#[derive(Debug)]
pub enum StartupError {
    Geocoder(GeocodeError),
    Isochrone(IsochroneError),
}

impl std::fmt::Display for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartupError::Geocoder(e) => write!(f, "geocoder client: {e}"),
            StartupError::Isochrone(e) => write!(f, "isochrone client: {e}"),
        }
    }
}

impl std::error::Error for StartupError {}
