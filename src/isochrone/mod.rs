mod cache;
mod client;
mod isochrone_error;
mod models;

pub use cache::IsochroneCache;
pub use client::OpenRouteServiceClient;
pub use isochrone_error::IsochroneError;
pub use models::PolygonSet;

#[cfg(test)]
pub(crate) use models::fixtures;

use std::time::Duration;

use crate::domain::models::{Coordinates, Station};

pub const DEFAULT_BANDS: [u32; 3] = [300, 600, 900];
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Walk-time polygons around a point.
pub trait IsochroneProvider: Send + Sync {
    fn fetch(&self, origin: Coordinates, bands: &[u32]) -> Result<PolygonSet, IsochroneError>;
}

/// Which bands to request and how long a fetched set stays valid.
#[derive(Debug, Clone, PartialEq)]
pub struct IsochronePolicy {
    pub bands: Vec<u32>,
    pub ttl: Duration,
}

impl Default for IsochronePolicy {
    fn default() -> Self {
        Self {
            bands: DEFAULT_BANDS.to_vec(),
            ttl: DEFAULT_TTL,
        }
    }
}

/// Cache-aside reads of station isochrones.
///
/// Nothing here fails the caller: provider or cache trouble is logged and
/// reported as "no polygons".
pub struct IsochroneService {
    provider: Box<dyn IsochroneProvider>,
    cache: IsochroneCache,
    policy: IsochronePolicy,
}

impl IsochroneService {
    pub fn new(
        provider: Box<dyn IsochroneProvider>,
        cache: IsochroneCache,
        policy: IsochronePolicy,
    ) -> Self {
        Self {
            provider,
            cache,
            policy,
        }
    }

    pub fn policy(&self) -> &IsochronePolicy {
        &self.policy
    }

    pub fn cache(&self) -> &IsochroneCache {
        &self.cache
    }

    /// Cached polygons for the station, fetching and storing them on a miss.
    pub fn polygons_for(&self, station: &Station, now: i64) -> Option<PolygonSet> {
        match self.cache.get(station.id, now) {
            Ok(Some(set)) => return Some(set),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(station_id = station.id, error = %e, "isochrone cache read failed");
            }
        }

        let set = match self.provider.fetch(station.location, &self.policy.bands) {
            Ok(set) => set,
            Err(e) => {
                tracing::warn!(
                    station_id = station.id,
                    station = %station.name,
                    error = %e,
                    "isochrone fetch failed; map renders without overlay"
                );
                return None;
            }
        };

        match self.cache.put(station.id, &set, self.policy.ttl, now) {
            Ok(true) => tracing::debug!(station_id = station.id, "cached isochrone"),
            Ok(false) => {
                // Another request stored polygons first; theirs stay authoritative.
                if let Ok(Some(existing)) = self.cache.get(station.id, now) {
                    return Some(existing);
                }
            }
            Err(e) => {
                tracing::warn!(station_id = station.id, error = %e, "isochrone cache write failed");
            }
        }

        Some(set)
    }

    /// Fill the cache for a newly added station. Failure is only logged.
    pub fn prewarm(&self, station: &Station, now: i64) {
        if self.polygons_for(station, now).is_none() {
            tracing::info!(station_id = station.id, "isochrone pre-warm skipped");
        }
    }
}
