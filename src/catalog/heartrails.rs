// catalog/heartrails.rs
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use url::Url;

use crate::catalog::{CatalogError, CatalogStation, StationSource};
use crate::domain::models::Coordinates;

/// HeartRails Express station API (`?method=getLines` / `?method=getStations`).
pub struct HeartRailsClient {
    client: Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct Envelope<T> {
    response: T,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LinesResponse {
    Lines { line: Vec<String> },
    Error { error: String },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StationsResponse {
    Stations { station: Vec<RawStation> },
    Error { error: String },
}

#[derive(Deserialize)]
struct RawStation {
    name: String,
    #[serde(deserialize_with = "number_or_string")]
    x: f64,
    #[serde(deserialize_with = "number_or_string")]
    y: f64,
}

/// Coordinates arrive as numbers or numeric strings depending on endpoint.
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

impl HeartRailsClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    fn url(&self, method: &str, key: &str, value: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("method", method)
            .append_pair(key, value);
        url
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(CatalogError::Network(format!("HTTP {}", resp.status())));
        }

        let body = resp
            .text()
            .map_err(|e| CatalogError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| CatalogError::JsonParse(e.to_string()))
    }
}

impl StationSource for HeartRailsClient {
    fn lines(&self, prefecture: &str) -> Result<Vec<String>, CatalogError> {
        let env: Envelope<LinesResponse> =
            self.get_json(self.url("getLines", "prefecture", prefecture))?;
        lines_from(env.response)
    }

    fn stations(&self, line: &str) -> Result<Vec<CatalogStation>, CatalogError> {
        let env: Envelope<StationsResponse> =
            self.get_json(self.url("getStations", "line", line))?;
        stations_from(env.response)
    }
}

fn lines_from(resp: LinesResponse) -> Result<Vec<String>, CatalogError> {
    match resp {
        LinesResponse::Lines { line } => Ok(line),
        LinesResponse::Error { error } => Err(CatalogError::Api(error)),
    }
}

fn stations_from(resp: StationsResponse) -> Result<Vec<CatalogStation>, CatalogError> {
    match resp {
        StationsResponse::Stations { station } => Ok(station
            .into_iter()
            .map(|s| CatalogStation {
                name: s.name,
                // x is longitude, y is latitude
                location: Coordinates::new(s.y, s.x),
            })
            .collect()),
        StationsResponse::Error { error } => Err(CatalogError::Api(error)),
    }
}
