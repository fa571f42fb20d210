// isochrone/client.rs
use reqwest::blocking::Client;
use serde::Serialize;
use url::Url;

use crate::config::ProviderConfig;
use crate::domain::models::Coordinates;
use crate::isochrone::{IsochroneError, IsochroneProvider, PolygonSet};

pub const WALKING_PROFILE: &str = "foot-walking";

/// openrouteservice isochrones endpoint:
/// `POST {base}/v2/isochrones/{profile}` with the token in `Authorization`.
pub struct OpenRouteServiceClient {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct IsochroneRequest<'a> {
    /// One origin, as [lon, lat].
    locations: [[f64; 2]; 1],
    /// Band limits in seconds.
    range: &'a [u32],
    range_type: &'static str,
}

impl OpenRouteServiceClient {
    pub fn new(cfg: &ProviderConfig) -> Result<Self, IsochroneError> {
        let client = Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| IsochroneError::Network(e.to_string()))?;

        let endpoint = cfg
            .base_url
            .join(&format!("v2/isochrones/{WALKING_PROFILE}"))
            .map_err(|e| IsochroneError::Parse(format!("bad base url: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            api_key: cfg.api_key.clone(),
        })
    }
}

impl IsochroneProvider for OpenRouteServiceClient {
    fn fetch(&self, origin: Coordinates, bands: &[u32]) -> Result<PolygonSet, IsochroneError> {
        let payload = IsochroneRequest {
            locations: [origin.lon_lat()],
            range: bands,
            range_type: "time",
        };

        let mut req = self
            .client
            .post(self.endpoint.clone())
            .header("Accept", "application/geo+json, application/json")
            .json(&payload);
        if let Some(key) = &self.api_key {
            req = req.header("Authorization", key);
        }

        let resp = req
            .send()
            .map_err(|e| IsochroneError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(IsochroneError::Status(status.as_u16(), text));
        }

        let body = resp
            .text()
            .map_err(|e| IsochroneError::Network(e.to_string()))?;
        let set = PolygonSet::from_json(&body)?;
        set.check_bands(bands)?;
        Ok(set)
    }
}
