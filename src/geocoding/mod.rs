mod geocode_error;
mod nominatim;

pub use geocode_error::GeocodeError;
pub use nominatim::NominatimGeocoder;

use crate::domain::models::Coordinates;

/// Free-text location lookup. `Ok(None)` means the provider answered but
/// found nothing.
pub trait Geocoder: Send + Sync {
    fn lookup(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError>;
}
