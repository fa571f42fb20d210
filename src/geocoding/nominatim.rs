// geocoding/nominatim.rs
use reqwest::blocking::Client;
use serde::Deserialize;
use url::Url;

use crate::config::ProviderConfig;
use crate::domain::models::Coordinates;
use crate::geocoding::{GeocodeError, Geocoder};

const USER_AGENT: &str = concat!("couple_map/", env!("CARGO_PKG_VERSION"));

/// Nominatim-style search endpoint: `GET {base}/search?q=..&format=jsonv2&limit=1`.
pub struct NominatimGeocoder {
    client: Client,
    search_url: Url,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(cfg: &ProviderConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        let search_url = cfg
            .base_url
            .join("search")
            .map_err(|e| GeocodeError::Parse(format!("bad base url: {e}")))?;

        Ok(Self {
            client,
            search_url,
            api_key: cfg.api_key.clone(),
        })
    }

    fn request_url(&self, query: &str) -> Url {
        let mut url = self.search_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("q", query)
                .append_pair("format", "jsonv2")
                .append_pair("limit", "1");
            if let Some(key) = &self.api_key {
                pairs.append_pair("key", key);
            }
        }
        url
    }
}

impl Geocoder for NominatimGeocoder {
    fn lookup(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let resp = self
            .client
            .get(self.request_url(query))
            .send()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(GeocodeError::Status(resp.status().as_u16()));
        }

        let body = resp
            .text()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;
        parse_first_hit(&body)
    }
}

fn parse_first_hit(body: &str) -> Result<Option<Coordinates>, GeocodeError> {
    let hits: Vec<SearchHit> =
        serde_json::from_str(body).map_err(|e| GeocodeError::Parse(e.to_string()))?;

    let Some(hit) = hits.into_iter().next() else {
        return Ok(None);
    };

    let lat: f64 = hit
        .lat
        .parse()
        .map_err(|_| GeocodeError::Parse(format!("lat {:?}", hit.lat)))?;
    let lon: f64 = hit
        .lon
        .parse()
        .map_err(|_| GeocodeError::Parse(format!("lon {:?}", hit.lon)))?;

    Ok(Some(Coordinates::new(lat, lon)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn geocoder(key: Option<&str>) -> NominatimGeocoder {
        NominatimGeocoder::new(&ProviderConfig {
            base_url: Url::parse("https://geo.example.com/").unwrap(),
            api_key: key.map(str::to_string),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn first_hit_wins() {
        let body = r#"[{"lat":"35.6909","lon":"139.7005","display_name":"Shinjuku"},
                       {"lat":"1","lon":"2"}]"#;
        assert_eq!(
            parse_first_hit(body).unwrap(),
            Some(Coordinates::new(35.6909, 139.7005))
        );
    }

    #[test]
    fn empty_result_is_not_found() {
        assert_eq!(parse_first_hit("[]").unwrap(), None);
    }

    #[test]
    fn malformed_coordinates_are_errors() {
        assert!(matches!(
            parse_first_hit(r#"[{"lat":"north","lon":"1"}]"#),
            Err(GeocodeError::Parse(_))
        ));
        assert!(matches!(parse_first_hit("<html>"), Err(GeocodeError::Parse(_))));
    }

    #[test]
    fn request_url_encodes_query_and_key() {
        let url = geocoder(Some("k1")).request_url("新宿駅");
        assert_eq!(url.path(), "/search");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("q".into(), "新宿駅".into())));
        assert!(pairs.contains(&("limit".into(), "1".into())));
        assert!(pairs.contains(&("key".into(), "k1".into())));

        let anon = geocoder(None).request_url("x");
        assert!(!anon.query_pairs().any(|(k, _)| k == "key"));
    }
}
